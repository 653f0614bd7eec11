//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechSynthesizer、DialogueGenerator、
//!   MediaConcatenator、ArtifactStore）
//! - pipeline: 并行音频合成管道（核心）
//! - podcast_service: 端到端播客生成用例
//! - retry: 显式重试策略
//! - error: 应用层错误定义

pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod podcast_service;
pub mod ports;
pub mod retry;

pub use error::{PipelineError, PodcastError};
pub use extractor::{extract_text, ExtractError};
pub use pipeline::{DialoguePipeline, PipelineConfig, AUDIO_SUFFIX};
pub use podcast_service::{PodcastRequest, PodcastResponse, PodcastService, UploadedDocument};
pub use retry::RetryPolicy;

pub use ports::{
    ArtifactError, ArtifactStorePort, ConcatenationError, DialogueGeneratorPort, GenerationError,
    GenerationRequest, MediaConcatenatorPort, SpeechRequest, SpeechSynthesizerPort, SynthesisError,
};
