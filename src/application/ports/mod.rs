//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_store;
mod dialogue_generator;
mod media_concatenator;
mod speech_synthesizer;

pub use artifact_store::{ArtifactError, ArtifactStorePort};
pub use dialogue_generator::{DialogueGeneratorPort, GenerationError, GenerationRequest};
pub use media_concatenator::{ConcatenationError, MediaConcatenatorPort};
pub use speech_synthesizer::{SpeechRequest, SpeechSynthesizerPort, SynthesisError};
