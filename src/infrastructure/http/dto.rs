//! Data Transfer Objects

use serde::Serialize;

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 播客生成结果
#[derive(Debug, Serialize)]
pub struct PodcastDto {
    /// 最终音频的下载地址
    pub audio_url: String,
    /// 可编辑的文字稿
    pub transcript: String,
    /// 抽取合并后的源文本
    pub combined_text: String,
}

/// 模板条目
#[derive(Debug, Serialize)]
pub struct TemplateDto {
    pub key: &'static str,
}
