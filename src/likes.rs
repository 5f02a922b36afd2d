//! Like/unlike state transitions on videos.
//!
//! Each (video, user) pair is either liked or not. `Like` and `Unlike` move
//! between the two states and are rejected when the pair is already in the
//! target state. All transitions go through [`LikeCoordinator::apply`].

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::models::{Transition, Video, VideoId};
use crate::store::{StoreError, VideoStore};

#[derive(Debug, thiserror::Error)]
pub enum LikeError {
    #[error("Video {0} not found")]
    NotFound(VideoId),

    #[error("Cannot {transition} video {video_id} for user {user}")]
    InvalidTransition {
        video_id: VideoId,
        user: String,
        transition: Transition,
    },

    /// Text that is neither `like` nor `unlike`. Only [`Transition`]'s
    /// `FromStr` produces it; the HTTP routes bind both kinds statically.
    #[error("Unknown transition kind: {0}")]
    UnknownTransitionKind(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Applies like/unlike transitions and keeps each video's count and
/// liked-by set consistent in the store.
///
/// The read, mutate and save steps for one video run under a per-video
/// lock, so concurrent transitions on the same video never lose updates.
#[derive(Clone)]
pub struct LikeCoordinator {
    store: Arc<dyn VideoStore>,
    locks: Arc<Mutex<HashMap<VideoId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl LikeCoordinator {
    pub fn new(store: Arc<dyn VideoStore>) -> Self {
        Self {
            store,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn like_video(&self, video_id: VideoId, user: &str) -> Result<Video, LikeError> {
        self.apply(video_id, user, Transition::Like).await
    }

    pub async fn unlike_video(&self, video_id: VideoId, user: &str) -> Result<Video, LikeError> {
        self.apply(video_id, user, Transition::Unlike).await
    }

    pub async fn get_likers(&self, video_id: VideoId) -> Result<BTreeSet<String>, LikeError> {
        let video = self.load(video_id).await?;
        Ok(video.liked_by().clone())
    }

    /// Move `user`'s like state on `video_id` and persist the result.
    ///
    /// Nothing is written when the video is missing or the transition is
    /// not allowed.
    pub async fn apply(
        &self,
        video_id: VideoId,
        user: &str,
        transition: Transition,
    ) -> Result<Video, LikeError> {
        // Only existing videos get a lock entry.
        self.load(video_id).await?;

        let lock = self.lock_for(video_id);
        let _guard = lock.lock().await;

        let mut video = match self.load(video_id).await {
            Ok(video) => video,
            Err(e) => {
                self.release(video_id);
                return Err(e);
            }
        };
        if let Err(e) = video.apply(transition, user) {
            warn!("[likes] ❌ Rejected {} on video {} by {}", transition, video_id, user);
            return Err(e);
        }

        let saved = self.store.save(video).await?;
        debug!(
            "[likes] {} on video {} by {} (likes: {})",
            transition,
            video_id,
            user,
            saved.likes()
        );
        Ok(saved)
    }

    async fn load(&self, video_id: VideoId) -> Result<Video, LikeError> {
        self.store
            .find_by_id(video_id)
            .await?
            .ok_or(LikeError::NotFound(video_id))
    }

    fn lock_for(&self, video_id: VideoId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(video_id).or_default().clone()
    }

    fn release(&self, video_id: VideoId) {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&video_id);
    }

    #[cfg(test)]
    fn lock_entries(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
