//! Video persistence port and the in-memory store the service runs on.
//!
//! The store offers per-call atomicity only. Callers that read, modify and
//! save a record must serialize that sequence themselves (see
//! [`crate::likes::LikeCoordinator`]).

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{NewVideo, Video, VideoId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Video {0} does not exist")]
    Missing(VideoId),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn find_by_id(&self, id: VideoId) -> Result<Option<Video>, StoreError>;

    /// Persist a new video and return it with its assigned id.
    async fn create(&self, new_video: NewVideo) -> Result<Video, StoreError>;

    /// Overwrite an existing video.
    ///
    /// Returns `Err(StoreError::Missing)` if the id was never created.
    async fn save(&self, video: Video) -> Result<Video, StoreError>;

    async fn find_all(&self) -> Result<Vec<Video>, StoreError>;

    /// Videos whose name equals `name` exactly.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Video>, StoreError>;

    /// Videos strictly shorter than `duration`.
    async fn find_by_duration_less_than(&self, duration: u64) -> Result<Vec<Video>, StoreError>;
}

#[derive(Default)]
struct Records {
    next_id: VideoId,
    videos: BTreeMap<VideoId, Video>,
}

#[derive(Default)]
pub struct InMemoryVideoStore {
    records: RwLock<Records>,
}

impl InMemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter<F>(&self, predicate: F) -> Vec<Video>
    where
        F: Fn(&Video) -> bool,
    {
        self.records
            .read()
            .await
            .videos
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoStore {
    async fn find_by_id(&self, id: VideoId) -> Result<Option<Video>, StoreError> {
        Ok(self.records.read().await.videos.get(&id).cloned())
    }

    async fn create(&self, new_video: NewVideo) -> Result<Video, StoreError> {
        let mut records = self.records.write().await;
        records.next_id += 1;
        let video = Video::new(records.next_id, new_video);
        records.videos.insert(video.id, video.clone());
        Ok(video)
    }

    async fn save(&self, video: Video) -> Result<Video, StoreError> {
        let mut records = self.records.write().await;
        match records.videos.get_mut(&video.id) {
            Some(slot) => {
                slot.clone_from(&video);
                Ok(video)
            }
            None => Err(StoreError::Missing(video.id)),
        }
    }

    async fn find_all(&self) -> Result<Vec<Video>, StoreError> {
        Ok(self.filter(|_| true).await)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Video>, StoreError> {
        Ok(self.filter(|v| v.name == name).await)
    }

    async fn find_by_duration_less_than(&self, duration: u64) -> Result<Vec<Video>, StoreError> {
        Ok(self.filter(|v| v.duration < duration).await)
    }
}
