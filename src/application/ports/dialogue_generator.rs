//! Dialogue Generator Port - 对话生成抽象
//!
//! 给定源文本与指令模板，返回有序的两角色对话。
//! 调用方负责重试策略（RetryPolicy），本层单次调用。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Dialogue;
use crate::templates::InstructionTemplate;

/// 对话生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid dialogue in response: {0}")]
    InvalidDialogue(String),
}

/// 对话生成请求
///
/// 显式命名字段，替代按位置传递的参数包。
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// 从上传文档抽取合并后的源文本
    pub source_text: String,
    /// 语言模型
    pub model: String,
    /// 指令模板（intro / text / scratch pad / prelude / dialogue）
    pub template: InstructionTemplate,
    /// 用户编辑过的文字稿（含 `<edited_transcript>` 包装），可为空
    pub edited_transcript: String,
    /// 用户整体反馈（含 `<requested_improvements>` 包装），可为空
    pub user_feedback: String,
}

/// Dialogue Generator Port
#[async_trait]
pub trait DialogueGeneratorPort: Send + Sync {
    /// 生成一段有序对话；空对话视为无效响应
    async fn generate(&self, request: GenerationRequest) -> Result<Dialogue, GenerationError>;
}
