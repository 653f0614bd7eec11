//! Application State

use std::sync::Arc;

use crate::application::{ArtifactStorePort, PodcastService};

/// 应用状态
pub struct AppState {
    pub podcast_service: Arc<PodcastService>,
    pub artifact_store: Arc<dyn ArtifactStorePort>,
    /// 未显式指定时使用的默认模型
    pub default_text_model: String,
    pub default_audio_model: String,
}

impl AppState {
    pub fn new(
        podcast_service: Arc<PodcastService>,
        artifact_store: Arc<dyn ArtifactStorePort>,
        default_text_model: impl Into<String>,
        default_audio_model: impl Into<String>,
    ) -> Self {
        Self {
            podcast_service,
            artifact_store,
            default_text_model: default_text_model.into(),
            default_audio_model: default_audio_model.into(),
        }
    }
}
