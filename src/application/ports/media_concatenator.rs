//! Media Concatenator Port - 音频拼接抽象
//!
//! 按给定顺序把一组音频文件无缝合并为一个输出文件。
//! 拼接器不删除输入文件，清理是编排器的职责。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 拼接错误
#[derive(Debug, Error)]
pub enum ConcatenationError {
    #[error("Failed to write manifest: {0}")]
    ManifestError(String),

    #[error("Media tool failed: {0}")]
    ToolFailed(String),

    #[error("Media tool produced no output file: {0}")]
    NoOutput(String),
}

/// Media Concatenator Port
#[async_trait]
pub trait MediaConcatenatorPort: Send + Sync {
    /// 把 `inputs` 按顺序合并写入 `output`
    ///
    /// 输入路径总是本进程自己创建的文件，按可信处理。
    async fn concatenate(
        &self,
        inputs: &[PathBuf],
        output: &Path,
    ) -> Result<(), ConcatenationError>;
}
