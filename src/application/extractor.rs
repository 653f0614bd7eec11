//! Text Extractor - 把上传文档转成单个文本块
//!
//! 支持纯文本与 Markdown。PDF 需要专门的解析依赖，当前直接拒绝并
//! 给出明确错误，而不是静默产出空文本。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("{file}: not valid UTF-8 text: {reason}")]
    InvalidText { file: String, reason: String },
}

/// 按扩展名抽取文档文本
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "md" | "markdown" => {
            let text = String::from_utf8(bytes.to_vec()).map_err(|e| ExtractError::InvalidText {
                file: file_name.to_string(),
                reason: e.to_string(),
            })?;
            tracing::debug!(file = %file_name, chars = text.len(), "Extracted text document");
            Ok(text)
        }
        "pdf" => Err(ExtractError::Unsupported(format!(
            "{}: PDF extraction is not available, please convert to text or markdown",
            file_name
        ))),
        other => Err(ExtractError::Unsupported(format!(
            "{}: unknown extension '{}'",
            file_name, other
        ))),
    }
}
