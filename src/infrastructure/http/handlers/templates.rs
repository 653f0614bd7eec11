//! Template Handlers - 列出可选指令模板

use axum::Json;

use crate::infrastructure::http::dto::{ApiResponse, TemplateDto};
use crate::templates::TemplateKind;

pub async fn list_templates() -> Json<ApiResponse<Vec<TemplateDto>>> {
    let templates = TemplateKind::all()
        .iter()
        .map(|kind| TemplateDto { key: kind.key() })
        .collect();
    Json(ApiResponse::success(templates))
}
