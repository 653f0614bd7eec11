//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `PAPERCAST_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `PAPERCAST_SERVER__PORT=8080`
/// - `PAPERCAST_TTS__API_KEY=sk-...`
/// - `PAPERCAST_TTS__BASE_URL=http://tts-proxy:8000`
/// - `PAPERCAST_STORAGE__WORKING_DIR=/data/audio`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("server.max_body_bytes", 50 * 1024 * 1024)?
        .set_default("tts.base_url", "https://api.openai.com")?
        .set_default("tts.model", "tts-1")?
        .set_default("tts.timeout_secs", 120)?
        .set_default("llm.base_url", "https://api.openai.com")?
        .set_default("llm.model", "gpt-4o")?
        .set_default("llm.timeout_secs", 300)?
        .set_default("storage.working_dir", "data/audio")?
        .set_default("pipeline.max_concurrent", 8)?
        .set_default("sweep.enabled", true)?
        .set_default("sweep.interval_secs", 3600)?
        .set_default("sweep.max_age_secs", 86400)?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    builder = builder.add_source(
        Environment::with_prefix("PAPERCAST")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS base URL cannot be empty".to_string(),
        ));
    }

    if config.llm.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM base URL cannot be empty".to_string(),
        ));
    }

    if config.pipeline.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "Pipeline max_concurrent cannot be 0".to_string(),
        ));
    }

    if config.sweep.enabled && config.sweep.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Sweep interval cannot be 0 when sweep is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志，不输出密钥）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("TTS URL: {}", config.tts.base_url);
    tracing::info!("TTS Model: {}", config.tts.model);
    tracing::info!("LLM URL: {}", config.llm.base_url);
    tracing::info!("LLM Model: {}", config.llm.model);
    tracing::info!("Working Directory: {:?}", config.storage.working_dir);
    tracing::info!("Pipeline Max Concurrent: {}", config.pipeline.max_concurrent);
    tracing::info!("Sweep Enabled: {}", config.sweep.enabled);
    if config.sweep.enabled {
        tracing::info!("Sweep Interval: {}s", config.sweep.interval_secs);
        tracing::info!("Sweep Max Age: {}s", config.sweep.max_age_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
