//! Dialogue Context - 对话限界上下文
//!
//! 职责:
//! - 两角色对话模型（说话人、对话轮次）
//! - 历史说话人标签的归一化
//! - 音色分配的校验

mod dialogue;
mod voice;

pub use dialogue::{Dialogue, DialogueError, DialogueTurn, Speaker};
pub use voice::{VoiceAssignment, VoiceError};
