use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod likes;
pub mod models;
pub mod principal;
pub mod store;

use handlers::{
    add_video_handler, find_by_duration_handler, find_by_name_handler, get_video_handler,
    go_handler, like_handler, liked_by_handler, list_videos_handler, unlike_handler,
};
use models::AppState;

pub const VIDEO_SVC_PATH: &str = "/video";

/// Build the application router. Shared by `main` and the integration tests.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/go", get(go_handler))
        .route(
            VIDEO_SVC_PATH,
            post(add_video_handler).get(list_videos_handler),
        )
        .route("/video/search/findByName", get(find_by_name_handler))
        .route(
            "/video/search/findByDurationLessThan",
            get(find_by_duration_handler),
        )
        .route("/video/:id", get(get_video_handler))
        .route("/video/:id/like", post(like_handler))
        .route("/video/:id/unlike", post(unlike_handler))
        .route("/video/:id/likedby", get(liked_by_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
