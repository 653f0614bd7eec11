//! HTTP Dialogue Client - 调用 OpenAI 风格 chat completions 生成对话
//!
//! 实现 DialogueGeneratorPort trait
//!
//! 模型被要求输出 JSON：
//! {"scratchpad": "...", "dialogue": [{"speaker": "speaker-1", "text": "..."}, ...]}
//!
//! 说话人标签经 Speaker::parse_label 归一化；历史上还存在把标签写进
//! 文本的 `speaker-1: ...` 冒号前缀形式，这里在归一化前剥掉。

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{DialogueGeneratorPort, GenerationError, GenerationRequest};
use crate::domain::{Dialogue, DialogueTurn, Speaker};

/// chat completions 请求体
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// chat completions 响应体（只取需要的字段）
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// 模型输出的对话 JSON
#[derive(Debug, Deserialize)]
struct GeneratedDialogue {
    #[serde(default)]
    #[allow(dead_code)]
    scratchpad: String,
    dialogue: Vec<GeneratedLine>,
}

#[derive(Debug, Deserialize)]
struct GeneratedLine {
    speaker: String,
    text: String,
}

/// HTTP Dialogue 客户端配置
#[derive(Debug, Clone)]
pub struct HttpDialogueClientConfig {
    /// 服务商基础 URL
    pub base_url: String,
    /// API Key（Bearer）
    pub api_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpDialogueClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            timeout_secs: 300,
        }
    }
}

/// HTTP Dialogue 客户端
pub struct HttpDialogueClient {
    client: Client,
    config: HttpDialogueClientConfig,
}

impl HttpDialogueClient {
    pub fn new(config: HttpDialogueClientConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// 拼装 system / user 消息
    fn build_messages(request: &GenerationRequest) -> Vec<ChatMessage> {
        let template = &request.template;
        let system = format!(
            "{}\n\n{}\n\n{}\n\n{}",
            template.intro, template.text_instructions, template.scratch_pad, template.dialogue
        );
        let user = format!(
            "{}\n\n<source_text>\n{}\n</source_text>{}{}",
            template.prelude, request.source_text, request.edited_transcript, request.user_feedback
        );
        vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ]
    }
}

#[async_trait]
impl DialogueGeneratorPort for HttpDialogueClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Dialogue, GenerationError> {
        let body = ChatRequest {
            model: &request.model,
            messages: Self::build_messages(&request),
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %request.model,
            source_len = request.source_text.len(),
            "Sending dialogue generation request"
        );

        let mut builder = self.client.post(self.completions_url()).json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::ProviderError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidDialogue(format!("malformed response: {}", e)))?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| GenerationError::InvalidDialogue("empty choices".to_string()))?;

        let dialogue = parse_dialogue(content)?;
        tracing::info!(turns = dialogue.len(), "Dialogue generation completed");
        Ok(dialogue)
    }
}

/// 把模型输出的 JSON 解析并归一化为领域对话
fn parse_dialogue(content: &str) -> Result<Dialogue, GenerationError> {
    let generated: GeneratedDialogue = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| GenerationError::InvalidDialogue(format!("invalid dialogue JSON: {}", e)))?;

    let mut turns = Vec::with_capacity(generated.dialogue.len());
    for line in generated.dialogue {
        let (speaker, text) = normalize_line(&line.speaker, &line.text)
            .map_err(|e| GenerationError::InvalidDialogue(e))?;
        turns.push(DialogueTurn::new(speaker, text));
    }

    Dialogue::new(turns).map_err(|e| GenerationError::InvalidDialogue(e.to_string()))
}

/// 剥掉模型偶尔加上的 ```json 代码围栏
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open.strip_suffix("```").unwrap_or(without_open).trim()
}

/// 归一化单行：解析标签，并剥掉文本里的冒号前缀（`speaker-1: ...`）
fn normalize_line(label: &str, text: &str) -> Result<(Speaker, String), String> {
    let speaker = Speaker::parse_label(label).map_err(|e| e.to_string())?;

    let text = text.trim();
    let text = match text.split_once(':') {
        Some((prefix, rest)) if Speaker::parse_label(prefix).is_ok() => rest.trim(),
        _ => text,
    };

    Ok((speaker, text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialogue_normalizes_labels() {
        let content = r#"{
            "scratchpad": "notes",
            "dialogue": [
                {"speaker": "ホスト", "text": "こんにちは"},
                {"speaker": "speaker-2", "text": "speaker-2: Hi there"}
            ]
        }"#;
        let dialogue = parse_dialogue(content).unwrap();
        assert_eq!(dialogue.turns()[0].speaker, Speaker::Primary);
        assert_eq!(dialogue.turns()[0].text, "こんにちは");
        assert_eq!(dialogue.turns()[1].speaker, Speaker::Secondary);
        // 冒号前缀被剥掉
        assert_eq!(dialogue.turns()[1].text, "Hi there");
    }

    #[test]
    fn test_parse_dialogue_keeps_plain_colons() {
        let content = r#"{
            "dialogue": [
                {"speaker": "host", "text": "Note: this matters"}
            ]
        }"#;
        let dialogue = parse_dialogue(content).unwrap();
        assert_eq!(dialogue.turns()[0].text, "Note: this matters");
    }

    #[test]
    fn test_parse_dialogue_strips_code_fence() {
        let content = "```json\n{\"dialogue\": [{\"speaker\": \"host\", \"text\": \"Hello\"}]}\n```";
        let dialogue = parse_dialogue(content).unwrap();
        assert_eq!(dialogue.len(), 1);
    }

    #[test]
    fn test_parse_dialogue_rejects_empty() {
        let err = parse_dialogue(r#"{"dialogue": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidDialogue(_)));
    }

    #[test]
    fn test_parse_dialogue_rejects_unknown_label() {
        let err =
            parse_dialogue(r#"{"dialogue": [{"speaker": "narrator", "text": "hi"}]}"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidDialogue(_)));
    }
}
