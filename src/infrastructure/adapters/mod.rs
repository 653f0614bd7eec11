//! Infrastructure Adapters - 端口的具体实现

pub mod concat;
pub mod llm;
pub mod tts;

pub use concat::{FfmpegConcatenator, FfmpegConcatenatorConfig};
pub use llm::{HttpDialogueClient, HttpDialogueClientConfig};
pub use tts::{FakeSpeechClient, FakeSpeechClientConfig, HttpSpeechClient, HttpSpeechClientConfig};
