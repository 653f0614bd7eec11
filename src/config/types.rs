//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerSettings,

    /// 语音合成服务商配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 对话生成（LLM）配置
    #[serde(default)]
    pub llm: LlmConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 合成管道配置
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// 按年龄清扫配置
    #[serde(default)]
    pub sweep: SweepConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 请求体大小上限（字节）
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024 // 50 MB
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSettings {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 语音合成服务商配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 服务商基础 URL
    #[serde(default = "default_provider_url")]
    pub base_url: String,

    /// API Key（通常经环境变量 PAPERCAST_TTS__API_KEY 注入）
    #[serde(default)]
    pub api_key: Option<String>,

    /// 默认语音模型
    #[serde(default = "default_audio_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_provider_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_audio_model() -> String {
    "tts-1".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_url(),
            api_key: None,
            model: default_audio_model(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

/// 对话生成（LLM）配置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// 服务商基础 URL
    #[serde(default = "default_provider_url")]
    pub base_url: String,

    /// API Key
    #[serde(default)]
    pub api_key: Option<String>,

    /// 默认语言模型
    #[serde(default = "default_text_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_text_model() -> String {
    "gpt-4o".to_string()
}

fn default_llm_timeout() -> u64 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_url(),
            api_key: None,
            model: default_text_model(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 工作目录：单轮临时音频、manifest、最终输出都在这里
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("data/audio")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
        }
    }
}

/// 合成管道配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// 最大并发合成数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_max_concurrent() -> usize {
    8
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// 按年龄清扫配置
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    /// 是否启用后台定时清扫（每次运行结束时的清扫不受此开关影响）
    #[serde(default = "default_sweep_enabled")]
    pub enabled: bool,

    /// 后台清扫间隔（秒）
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,

    /// 文件保留年龄阈值（秒）
    #[serde(default = "default_sweep_max_age")]
    pub max_age_secs: u64,
}

fn default_sweep_enabled() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    3600 // 1 小时
}

fn default_sweep_max_age() -> u64 {
    86400 // 24 小时
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: default_sweep_enabled(),
            interval_secs: default_sweep_interval(),
            max_age_secs: default_sweep_max_age(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5080);
        assert_eq!(config.tts.model, "tts-1");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.storage.working_dir, PathBuf::from("data/audio"));
        assert_eq!(config.sweep.max_age_secs, 86400);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerSettings::default();
        assert_eq!(config.addr(), "0.0.0.0:5080");
    }
}
