//! 应用层错误定义
//!
//! 一次运行只对外暴露一个终态：成功的文件路径，或一条指明失败阶段
//! （合成 / 拼接，含失败轮次下标）的错误。清理失败只记日志，永远不会
//! 覆盖运行的主结果。

use thiserror::Error;

use super::ports::{ArtifactError, ConcatenationError, GenerationError, SynthesisError};
use crate::domain::{DialogueError, VoiceError};

/// 合成管道错误（一次运行的终态失败）
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 配置/输入校验失败，发生在任何网络或子进程工作之前
    #[error("Validation error: {0}")]
    Validation(String),

    /// 某一轮合成失败，整次运行中止
    #[error("Synthesis failed for turn {turn_index}: {source}")]
    Synthesis {
        turn_index: usize,
        #[source]
        source: SynthesisError,
    },

    /// 外部媒体工具失败或未产出文件
    #[error("Concatenation failed: {0}")]
    Concatenation(#[from] ConcatenationError),

    /// 临时产物分配/写入失败
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// 合成任务 panic 等内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Podcast 用例错误（HTTP 层据此生成用户可见消息）
#[derive(Debug, Error)]
pub enum PodcastError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Dialogue generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl From<DialogueError> for PodcastError {
    fn from(err: DialogueError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<VoiceError> for PodcastError {
    fn from(err: VoiceError) -> Self {
        Self::Validation(err.to_string())
    }
}
