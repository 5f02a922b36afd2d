use crate::{
    error::AppResult,
    likes::LikeError,
    models::{DurationQuery, NewVideo, TitleQuery, Video, VideoId},
    principal::Principal,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::info;

use crate::models::AppState;

pub async fn go_handler() -> &'static str {
    "Good Luck!"
}

/// Add a video. Like state in the request body is ignored.
pub async fn add_video_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewVideo>, JsonRejection>,
) -> AppResult<Json<Video>> {
    let Json(new_video) = body?;
    let video = state.store.create(new_video).await?;
    info!(
        "[POST /video] ✅ Created video {} ({}, {}s)",
        video.id, video.name, video.duration
    );
    Ok(Json(video))
}

pub async fn list_videos_handler(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Video>>> {
    let videos = state.store.find_all().await?;
    info!("[GET /video] {} videos", videos.len());
    Ok(Json(videos))
}

pub async fn get_video_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<VideoId>, PathRejection>,
) -> AppResult<Json<Video>> {
    let Path(id) = path?;
    let video = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(LikeError::NotFound(id))?;
    Ok(Json(video))
}

pub async fn find_by_name_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TitleQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Video>>> {
    let Query(query) = query?;
    let videos = state.store.find_by_name(&query.title).await?;
    info!(
        "[GET /video/search/findByName] title={:?} -> {} videos",
        query.title,
        videos.len()
    );
    Ok(Json(videos))
}

pub async fn find_by_duration_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DurationQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Video>>> {
    let Query(query) = query?;
    let videos = state.store.find_by_duration_less_than(query.duration).await?;
    info!(
        "[GET /video/search/findByDurationLessThan] duration<{} -> {} videos",
        query.duration,
        videos.len()
    );
    Ok(Json(videos))
}

pub async fn like_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<VideoId>, PathRejection>,
    principal: Principal,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    let video = state.likes.like_video(id, principal.name()).await?;
    info!(
        "[POST /video/{}/like] ✅ {} (likes: {})",
        id,
        principal.name(),
        video.likes()
    );
    Ok(StatusCode::OK)
}

pub async fn unlike_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<VideoId>, PathRejection>,
    principal: Principal,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    let video = state.likes.unlike_video(id, principal.name()).await?;
    info!(
        "[POST /video/{}/unlike] ✅ {} (likes: {})",
        id,
        principal.name(),
        video.likes()
    );
    Ok(StatusCode::OK)
}

pub async fn liked_by_handler(
    State(state): State<Arc<AppState>>,
    path: Result<Path<VideoId>, PathRejection>,
) -> AppResult<Json<Vec<String>>> {
    let Path(id) = path?;
    let likers = state.likes.get_likers(id).await?;
    Ok(Json(likers.into_iter().collect()))
}
