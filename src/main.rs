//! Papercast - 文档转播客合成系统

use std::sync::Arc;
use std::time::Duration;

use papercast::application::{
    ArtifactStorePort, DialoguePipeline, PipelineConfig, PodcastService, RetryPolicy,
};
use papercast::config::{load_config, print_config};
use papercast::infrastructure::adapters::{
    FfmpegConcatenator, FfmpegConcatenatorConfig, HttpDialogueClient, HttpDialogueClientConfig,
    HttpSpeechClient, HttpSpeechClientConfig,
};
use papercast::infrastructure::artifacts::FileArtifactStore;
use papercast::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志（进程启动时一次，显式生命周期）
    let log_filter = format!(
        "{},papercast={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Papercast - 文档转播客合成系统");
    print_config(&config);

    // 工作目录与产物存储
    let artifact_store = Arc::new(FileArtifactStore::new(&config.storage.working_dir).await?);

    // 语音合成客户端
    let mut tts_config = HttpSpeechClientConfig::new(&config.tts.base_url)
        .with_timeout(config.tts.timeout_secs);
    if let Some(api_key) = &config.tts.api_key {
        tts_config = tts_config.with_api_key(api_key);
    }
    let synthesizer = Arc::new(HttpSpeechClient::new(tts_config)?);

    // 对话生成客户端
    let llm_config = HttpDialogueClientConfig {
        base_url: config.llm.base_url.clone(),
        api_key: config.llm.api_key.clone(),
        timeout_secs: config.llm.timeout_secs,
    };
    let generator = Arc::new(HttpDialogueClient::new(llm_config)?);

    // ffmpeg 拼接器
    let concatenator = Arc::new(FfmpegConcatenator::new(
        FfmpegConcatenatorConfig::default(),
        artifact_store.clone(),
    ));

    // 合成管道
    let pipeline = Arc::new(DialoguePipeline::new(
        synthesizer,
        concatenator,
        artifact_store.clone(),
        PipelineConfig {
            max_concurrent: config.pipeline.max_concurrent,
            sweep_max_age: Duration::from_secs(config.sweep.max_age_secs),
        },
    ));

    // 端到端用例
    let podcast_service = Arc::new(PodcastService::new(
        generator,
        pipeline,
        RetryPolicy::dialogue_default(),
    ));

    // 后台定时清扫（运行结束时的清扫与此无关）
    if config.sweep.enabled {
        let store = artifact_store.clone();
        let interval = Duration::from_secs(config.sweep.interval_secs);
        let max_age = Duration::from_secs(config.sweep.max_age_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = store.sweep_older_than(max_age).await;
                if removed > 0 {
                    tracing::info!(removed, "Background sweep removed old artifacts");
                }
            }
        });
    }

    // HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    server_config.max_body_bytes = config.server.max_body_bytes;

    let state = AppState::new(
        podcast_service,
        artifact_store,
        &config.llm.model,
        &config.tts.model,
    );
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
