//! Audio Handlers - 下载最终音频

use axum::{
    body::Body,
    extract::{Path as UrlPath, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::application::ArtifactStorePort;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// GET /api/podcast/audio/{file_name}
///
/// 只允许访问工作目录里 UUID 命名的 mp3 文件，路径片段不允许分隔符。
pub async fn download_audio(
    State(state): State<Arc<AppState>>,
    UrlPath(file_name): UrlPath<String>,
) -> Result<Response, ApiError> {
    if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
        return Err(ApiError::BadRequest("invalid file name".to_string()));
    }
    if !file_name.ends_with(".mp3") {
        return Err(ApiError::BadRequest("only mp3 artifacts are served".to_string()));
    }

    let path = state.artifact_store.working_dir().join(&file_name);
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ApiError::NotFound(format!("audio not found: {}", file_name)))?;

    let stream = ReaderStream::new(file);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
