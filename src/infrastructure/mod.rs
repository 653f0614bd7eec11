//! 基础设施层
//!
//! - artifacts: 工作目录临时产物存储
//! - adapters: TTS / LLM / 拼接适配器
//! - http: Axum API 层

pub mod adapters;
pub mod artifacts;
pub mod http;
