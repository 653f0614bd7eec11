//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                       GET   健康检查
//! - /api/templates                  GET   列出指令模板
//! - /api/podcast/generate           POST  上传文档并生成播客 (multipart)
//! - /api/podcast/audio/{file_name}  GET   下载最终音频

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/templates", get(handlers::list_templates))
        .nest("/podcast", podcast_routes())
}

fn podcast_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(handlers::generate_podcast))
        .route("/audio/:file_name", get(handlers::download_audio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    use crate::application::ports::{DialogueGeneratorPort, GenerationError, GenerationRequest};
    use crate::application::{DialoguePipeline, PipelineConfig, PodcastService, RetryPolicy};
    use crate::domain::{Dialogue, DialogueTurn, Speaker};
    use crate::infrastructure::adapters::{
        FakeSpeechClient, FakeSpeechClientConfig, FfmpegConcatenator,
    };
    use crate::infrastructure::artifacts::FileArtifactStore;

    struct StubGenerator;

    #[async_trait]
    impl DialogueGeneratorPort for StubGenerator {
        async fn generate(&self, _request: GenerationRequest) -> Result<Dialogue, GenerationError> {
            Ok(Dialogue::new(vec![
                DialogueTurn::new(Speaker::Primary, "Hello"),
                DialogueTurn::new(Speaker::Secondary, "Hi there"),
            ])
            .unwrap())
        }
    }

    async fn test_router(working_dir: &std::path::Path) -> Router {
        let store = Arc::new(FileArtifactStore::new(working_dir).await.unwrap());
        let pipeline = Arc::new(DialoguePipeline::new(
            Arc::new(FakeSpeechClient::new(FakeSpeechClientConfig { latency_ms: 0 })),
            Arc::new(FfmpegConcatenator::with_defaults(store.clone())),
            store.clone(),
            PipelineConfig::default(),
        ));
        let service = Arc::new(PodcastService::new(
            Arc::new(StubGenerator),
            pipeline,
            RetryPolicy::dialogue_default(),
        ));
        let state = Arc::new(AppState::new(service, store, "gpt-4o", "tts-1"));
        create_routes().with_state(state)
    }

    #[tokio::test]
    async fn test_ping() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(dir.path()).await;

        let response = app
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("ok"));
    }

    #[tokio::test]
    async fn test_list_templates() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(dir.path()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/templates")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("podcast"));
        assert!(text.contains("short_summary"));
    }

    #[tokio::test]
    async fn test_download_rejects_non_audio_names() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(dir.path()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/podcast/audio/secrets.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("\"errno\":400"));
    }

    #[tokio::test]
    async fn test_download_missing_audio_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(dir.path()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/podcast/audio/00000000-0000-0000-0000-000000000000.mp3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("\"errno\":404"));
    }
}
