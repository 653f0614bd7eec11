//! Speech Synthesizer Port - 单句语音合成抽象
//!
//! 一次调用合成一行文本的完整音频。服务商可能分块返回，
//! 适配器必须在全部分块接收完之后才返回，不允许部分结果。

use async_trait::async_trait;
use thiserror::Error;

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 单句合成请求
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// 要合成的文本（非空，上游已校验）
    pub text: String,
    /// 服务商音色 ID
    pub voice: String,
    /// 语音模型
    pub model: String,
}

/// Speech Synthesizer Port
///
/// 本层不重试、不落盘；重试策略属于调用方。
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// 合成一行文本，返回完整编码后的音频字节
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>, SynthesisError>;
}
