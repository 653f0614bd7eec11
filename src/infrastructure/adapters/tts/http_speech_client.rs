//! HTTP Speech Client - 调用外部语音合成服务
//!
//! 实现 SpeechSynthesizerPort trait，对接 OpenAI 风格的 speech API
//!
//! 外部 API:
//! POST {base_url}/v1/audio/speech
//! Request: {"model": "...", "voice": "...", "input": "..."}  (JSON, Bearer 认证)
//! Response: 二进制音频流，完整缓冲后返回

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{SpeechRequest, SpeechSynthesizerPort, SynthesisError};

/// 合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct SpeechHttpRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

/// HTTP Speech 客户端配置
#[derive(Debug, Clone)]
pub struct HttpSpeechClientConfig {
    /// 服务商基础 URL
    pub base_url: String,
    /// API Key（Bearer）
    pub api_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpSpeechClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl HttpSpeechClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP Speech 客户端
pub struct HttpSpeechClient {
    client: Client,
    config: HttpSpeechClientConfig,
}

impl HttpSpeechClient {
    pub fn new(config: HttpSpeechClientConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn speech_url(&self) -> String {
        format!("{}/v1/audio/speech", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SpeechSynthesizerPort for HttpSpeechClient {
    async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>, SynthesisError> {
        let body = SpeechHttpRequest {
            model: &request.model,
            voice: &request.voice,
            input: &request.text,
        };

        tracing::debug!(
            url = %self.speech_url(),
            text_len = request.text.len(),
            voice = %request.voice,
            model = %request.model,
            "Sending speech synthesis request"
        );

        let mut builder = self.client.post(self.speech_url()).json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                SynthesisError::Timeout
            } else if e.is_connect() {
                SynthesisError::NetworkError(format!("Cannot connect to speech service: {}", e))
            } else {
                SynthesisError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::ProviderError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        // 完整缓冲全部音频分块，不返回部分结果
        let audio_data = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        tracing::info!(
            voice = %request.voice,
            text_len = request.text.len(),
            audio_size = audio_data.len(),
            "Speech synthesis completed"
        );

        Ok(audio_data)
    }
}
