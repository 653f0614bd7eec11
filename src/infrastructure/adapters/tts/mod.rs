//! TTS Adapters - 语音合成客户端

mod fake_speech_client;
mod http_speech_client;

pub use fake_speech_client::{FakeSpeechClient, FakeSpeechClientConfig};
pub use http_speech_client::{HttpSpeechClient, HttpSpeechClientConfig};
