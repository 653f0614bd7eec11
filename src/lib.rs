//! Papercast - 文档转播客合成系统
//!
//! 把上传的文档（文本 / Markdown）转成两人对话播客：
//! LLM 生成有序对话，逐轮并发调用语音合成，按轮次下标重排后
//! 经 ffmpeg 拼接为单个音频文件。
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Dialogue Context: 说话人、轮次、音色分配
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechSynthesizer, DialogueGenerator, MediaConcatenator, ArtifactStore）
//! - Pipeline: 并行音频合成管道（核心）
//! - PodcastService: 端到端用例
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Artifacts: 工作目录临时产物存储
//! - Adapters: TTS / LLM 客户端、ffmpeg 拼接器、文本抽取

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod templates;

pub use config::{load_config, AppConfig};
