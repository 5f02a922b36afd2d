use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::likes::{LikeCoordinator, LikeError};
use crate::store::VideoStore;

pub type VideoId = u64;

/// A stored video plus its aggregate like state.
///
/// `likes` is always the size of `liked_by`. Both only change through
/// [`Video::apply`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub name: String,
    pub url: String,
    pub duration: u64,
    likes: u64,
    #[serde(skip)]
    liked_by: BTreeSet<String>,
}

impl Video {
    /// Build a freshly created video. Like state always starts empty.
    pub fn new(id: VideoId, new_video: NewVideo) -> Self {
        Self {
            id,
            name: new_video.name,
            url: new_video.url,
            duration: new_video.duration,
            likes: 0,
            liked_by: BTreeSet::new(),
        }
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn liked_by(&self) -> &BTreeSet<String> {
        &self.liked_by
    }

    pub fn is_liked_by(&self, user: &str) -> bool {
        self.liked_by.contains(user)
    }

    /// Apply a like/unlike for `user`, keeping the count in step with the set.
    ///
    /// Leaves the video untouched when the transition is not allowed from
    /// the user's current state.
    pub fn apply(&mut self, transition: Transition, user: &str) -> Result<(), LikeError> {
        match transition {
            Transition::Like => {
                if !self.liked_by.insert(user.to_string()) {
                    return Err(LikeError::InvalidTransition {
                        video_id: self.id,
                        user: user.to_string(),
                        transition,
                    });
                }
            }
            Transition::Unlike => {
                if !self.liked_by.remove(user) {
                    return Err(LikeError::InvalidTransition {
                        video_id: self.id,
                        user: user.to_string(),
                        transition,
                    });
                }
            }
        }
        self.likes = self.liked_by.len() as u64;
        Ok(())
    }
}

/// Request body for `POST /video`. Any client-supplied id or like state is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct NewVideo {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub duration: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Like,
    Unlike,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Like => f.write_str("like"),
            Transition::Unlike => f.write_str("unlike"),
        }
    }
}

impl FromStr for Transition {
    type Err = LikeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Transition::Like),
            "unlike" => Ok(Transition::Unlike),
            other => Err(LikeError::UnknownTransitionKind(other.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VideoStore>,
    pub likes: LikeCoordinator,
    pub config: crate::config::Config,
}

impl AppState {
    pub fn new(store: Arc<dyn VideoStore>, config: crate::config::Config) -> Self {
        Self {
            likes: LikeCoordinator::new(store.clone()),
            store,
            config,
        }
    }
}

#[derive(Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

#[derive(Deserialize)]
pub struct DurationQuery {
    pub duration: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample() -> Video {
        Video::new(
            7,
            NewVideo {
                name: "intro".to_string(),
                url: "http://example.com/intro.mp4".to_string(),
                duration: 90,
            },
        )
    }

    #[test]
    fn new_video_starts_with_no_likes() {
        let video = sample();
        assert_eq!(video.likes(), 0);
        assert!(video.liked_by().is_empty());
    }

    #[test]
    fn like_then_unlike_keeps_count_in_step() {
        let mut video = sample();
        video.apply(Transition::Like, "alice").unwrap();
        video.apply(Transition::Like, "bob").unwrap();
        assert_eq!(video.likes(), 2);

        video.apply(Transition::Unlike, "alice").unwrap();
        assert_eq!(video.likes(), 1);
        assert!(video.is_liked_by("bob"));
        assert!(!video.is_liked_by("alice"));
    }

    #[test]
    fn rejected_transition_leaves_video_unchanged() {
        let mut video = sample();
        video.apply(Transition::Like, "alice").unwrap();
        let before = video.clone();

        assert_matches!(
            video.apply(Transition::Like, "alice"),
            Err(LikeError::InvalidTransition { video_id: 7, .. })
        );
        assert_matches!(
            video.apply(Transition::Unlike, "carol"),
            Err(LikeError::InvalidTransition { .. })
        );
        assert_eq!(video, before);
    }

    #[test]
    fn transition_parses_known_kinds_only() {
        assert_eq!("like".parse::<Transition>().unwrap(), Transition::Like);
        assert_eq!("unlike".parse::<Transition>().unwrap(), Transition::Unlike);
        assert_matches!(
            "dislike".parse::<Transition>(),
            Err(LikeError::UnknownTransitionKind(kind)) if kind == "dislike"
        );
    }

    #[test]
    fn video_json_hides_liked_by_set() {
        let mut video = sample();
        video.apply(Transition::Like, "alice").unwrap();

        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["likes"], 1);
        assert_eq!(json["duration"], 90);
        assert!(json.get("likedBy").is_none());
    }

    #[test]
    fn new_video_ignores_client_like_state() {
        let body = r#"{"id":99,"name":"a","url":"u","duration":5,"likes":100}"#;
        let new_video: NewVideo = serde_json::from_str(body).unwrap();
        let video = Video::new(1, new_video);
        assert_eq!(video.id, 1);
        assert_eq!(video.likes(), 0);
    }
}
