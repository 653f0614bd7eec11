//! Fake Speech Client - 用于测试/离线开发的合成客户端
//!
//! 不调用外部服务，返回由文本派生的确定性字节

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{SpeechRequest, SpeechSynthesizerPort, SynthesisError};

/// Fake Speech Client 配置
#[derive(Debug, Clone)]
pub struct FakeSpeechClientConfig {
    /// 模拟的合成延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeSpeechClientConfig {
    fn default() -> Self {
        Self { latency_ms: 50 }
    }
}

/// Fake Speech Client
pub struct FakeSpeechClient {
    config: FakeSpeechClientConfig,
}

impl FakeSpeechClient {
    pub fn new(config: FakeSpeechClientConfig) -> Self {
        tracing::info!(latency_ms = config.latency_ms, "FakeSpeechClient initialized");
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeSpeechClientConfig::default())
    }
}

#[async_trait]
impl SpeechSynthesizerPort for FakeSpeechClient {
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>, SynthesisError> {
        tracing::debug!(
            text_len = request.text.len(),
            voice = %request.voice,
            "FakeSpeechClient: returning derived bytes"
        );

        tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;

        // 负载编码音色与文本，便于在拼接产物里核对顺序
        Ok(format!("{}|{}\n", request.voice, request.text).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_payload_is_deterministic() {
        let client = FakeSpeechClient::new(FakeSpeechClientConfig { latency_ms: 0 });
        let request = SpeechRequest {
            text: "Hello".to_string(),
            voice: "v1".to_string(),
            model: "tts-1".to_string(),
        };
        let first = client.synthesize(request.clone()).await.unwrap();
        let second = client.synthesize(request).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, b"v1|Hello\n");
    }
}
