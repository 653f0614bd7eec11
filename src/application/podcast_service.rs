//! Podcast Service - 端到端用例编排
//!
//! 上传文档 -> 抽取文本 -> 生成对话（带重试） -> 并行合成 -> 最终音频。
//! HTTP 层只负责字段绑定，所有编排都在这里。

use std::path::PathBuf;
use std::sync::Arc;

use super::error::PodcastError;
use super::extractor::extract_text;
use super::pipeline::DialoguePipeline;
use super::ports::{DialogueGeneratorPort, GenerationRequest};
use super::retry::RetryPolicy;
use crate::domain::{Dialogue, VoiceAssignment};
use crate::templates::TemplateKind;

/// 一份上传的文档（文件名 + 原始字节）
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 播客生成请求
///
/// 显式命名字段，替代历史上按位置传递的参数包。
#[derive(Debug, Clone)]
pub struct PodcastRequest {
    pub documents: Vec<UploadedDocument>,
    pub template: TemplateKind,
    pub text_model: String,
    pub audio_model: String,
    pub voices: VoiceAssignment,
    /// 用户编辑过的文字稿（原样文本，包装在本服务完成）
    pub edited_transcript: Option<String>,
    /// 用户整体反馈
    pub user_feedback: Option<String>,
}

/// 播客生成结果
#[derive(Debug, Clone)]
pub struct PodcastResponse {
    /// 最终音频文件路径
    pub audio_path: PathBuf,
    /// 渲染后的文字稿（供编辑后再生成）
    pub transcript: String,
    /// 抽取合并后的源文本
    pub combined_text: String,
}

/// Podcast Service
pub struct PodcastService {
    generator: Arc<dyn DialogueGeneratorPort>,
    pipeline: Arc<DialoguePipeline>,
    retry: RetryPolicy,
}

impl PodcastService {
    pub fn new(
        generator: Arc<dyn DialogueGeneratorPort>,
        pipeline: Arc<DialoguePipeline>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            generator,
            pipeline,
            retry,
        }
    }

    /// 生成一期播客
    pub async fn generate(&self, request: PodcastRequest) -> Result<PodcastResponse, PodcastError> {
        if request.documents.is_empty() {
            return Err(PodcastError::Validation(
                "please upload at least one document".to_string(),
            ));
        }
        if request.text_model.trim().is_empty() {
            return Err(PodcastError::Validation(
                "text model cannot be empty".to_string(),
            ));
        }

        // 1. 抽取并合并全部文档文本
        let mut combined_text = String::new();
        for document in &request.documents {
            let text = extract_text(&document.file_name, &document.bytes)
                .map_err(|e| PodcastError::Extraction(e.to_string()))?;
            combined_text.push_str(&text);
            combined_text.push_str("\n\n");
        }
        if combined_text.trim().is_empty() {
            return Err(PodcastError::Extraction(
                "uploaded documents contain no text".to_string(),
            ));
        }

        // 2. 生成对话（显式重试策略，仅套在生成调用外面）
        let generation = GenerationRequest {
            source_text: combined_text.clone(),
            model: request.text_model.clone(),
            template: request.template.template(),
            edited_transcript: wrap_edited_transcript(request.edited_transcript.as_deref()),
            user_feedback: wrap_user_feedback(
                request.user_feedback.as_deref(),
                request.edited_transcript.as_deref(),
            ),
        };
        let dialogue: Dialogue = self
            .retry
            .run(|attempt| {
                let generation = generation.clone();
                async move {
                    tracing::info!(attempt, model = %generation.model, "Generating dialogue");
                    self.generator.generate(generation).await
                }
            })
            .await?;

        tracing::info!(turns = dialogue.len(), "Dialogue generated");

        // 3. 并行合成 + 拼接
        let audio_path = self
            .pipeline
            .synthesize_dialogue(&dialogue, &request.voices, &request.audio_model)
            .await?;

        Ok(PodcastResponse {
            audio_path,
            transcript: dialogue.render_transcript(),
            combined_text,
        })
    }
}

/// 把编辑稿包进 `<edited_transcript>` 块，空输入返回空串
fn wrap_edited_transcript(edited: Option<&str>) -> String {
    match edited {
        Some(text) if !text.trim().is_empty() => format!(
            "\nPreviously generated edited transcript, with specific edits and comments \
             that I want you to carefully address:\n<edited_transcript>\n{}\n</edited_transcript>",
            text
        ),
        _ => String::new(),
    }
}

/// 把反馈包进 `<requested_improvements>` 块
///
/// 只要编辑稿或反馈任一非空，就附加改进指令。
fn wrap_user_feedback(feedback: Option<&str>, edited: Option<&str>) -> String {
    const INSTRUCTION_IMPROVE: &str = "Based on the original text, please generate an improved \
        version of the dialogue by incorporating the edits, comments and feedback.";

    let feedback_block = match feedback {
        Some(text) if !text.trim().is_empty() => {
            format!("\nOverall user feedback:\n\n{}", text)
        }
        _ => String::new(),
    };

    let has_edits = edited.map(|t| !t.trim().is_empty()).unwrap_or(false);
    if feedback_block.is_empty() && !has_edits {
        return String::new();
    }

    format!(
        "<requested_improvements>{}\n\n{}</requested_improvements>",
        feedback_block, INSTRUCTION_IMPROVE
    )
}
