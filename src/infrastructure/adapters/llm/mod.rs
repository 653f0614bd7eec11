//! LLM Adapters - 对话生成客户端

mod http_dialogue_client;

pub use http_dialogue_client::{HttpDialogueClient, HttpDialogueClientConfig};
