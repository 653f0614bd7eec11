//! Podcast Handlers - 上传文档并生成播客
//!
//! multipart 字段:
//! - `file`               上传文档，可重复（txt / md）
//! - `template`           指令模板 key（默认 podcast）
//! - `primary_voice`      主讲音色（必填）
//! - `secondary_voice`    嘉宾音色（必填）
//! - `text_model`         语言模型（默认取配置）
//! - `audio_model`        语音模型（默认取配置）
//! - `edited_transcript`  编辑过的文字稿（可选，用于再生成）
//! - `feedback`           用户整体反馈（可选）

use axum::extract::{Multipart, State};
use axum::Json;
use std::str::FromStr;
use std::sync::Arc;

use crate::application::{PodcastRequest, UploadedDocument};
use crate::domain::VoiceAssignment;
use crate::infrastructure::http::dto::{ApiResponse, PodcastDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;
use crate::templates::TemplateKind;

/// 从 multipart 表单收集到的字段
#[derive(Debug, Default)]
struct PodcastForm {
    documents: Vec<UploadedDocument>,
    template: Option<String>,
    primary_voice: Option<String>,
    secondary_voice: Option<String>,
    text_model: Option<String>,
    audio_model: Option<String>,
    edited_transcript: Option<String>,
    feedback: Option<String>,
}

pub async fn generate_podcast(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<PodcastDto>>, ApiError> {
    let form = read_form(multipart).await?;
    let request = build_request(&state, form)?;

    let response = state.podcast_service.generate(request).await?;

    // 只暴露文件名，下载经由 /api/podcast/audio/{file_name}
    let file_name = response
        .audio_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ApiError::Internal("final audio path has no file name".to_string()))?;

    Ok(Json(ApiResponse::success(PodcastDto {
        audio_url: format!("/api/podcast/audio/{}", file_name),
        transcript: response.transcript,
        combined_text: response.combined_text,
    })))
}

async fn read_form(mut multipart: Multipart) -> Result<PodcastForm, ApiError> {
    let mut form = PodcastForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload.txt").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e)))?;
                form.documents.push(UploadedDocument {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "template" => form.template = Some(read_text_field(field).await?),
            "primary_voice" => form.primary_voice = Some(read_text_field(field).await?),
            "secondary_voice" => form.secondary_voice = Some(read_text_field(field).await?),
            "text_model" => form.text_model = Some(read_text_field(field).await?),
            "audio_model" => form.audio_model = Some(read_text_field(field).await?),
            "edited_transcript" => form.edited_transcript = Some(read_text_field(field).await?),
            "feedback" => form.feedback = Some(read_text_field(field).await?),
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read field: {}", e)))
}

fn build_request(state: &AppState, form: PodcastForm) -> Result<PodcastRequest, ApiError> {
    let template = match form.template.as_deref() {
        Some(key) => {
            TemplateKind::from_str(key).map_err(ApiError::BadRequest)?
        }
        None => TemplateKind::Podcast,
    };

    let primary_voice = form
        .primary_voice
        .ok_or_else(|| ApiError::BadRequest("primary_voice is required".to_string()))?;
    let secondary_voice = form
        .secondary_voice
        .ok_or_else(|| ApiError::BadRequest("secondary_voice is required".to_string()))?;
    let voices = VoiceAssignment::new(primary_voice, secondary_voice)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(PodcastRequest {
        documents: form.documents,
        template,
        text_model: form
            .text_model
            .unwrap_or_else(|| state.default_text_model.clone()),
        audio_model: form
            .audio_model
            .unwrap_or_else(|| state.default_audio_model.clone()),
        voices,
        edited_transcript: form.edited_transcript,
        user_feedback: form.feedback,
    })
}
