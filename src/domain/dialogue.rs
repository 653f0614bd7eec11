//! Dialogue Context - 对话模型
//!
//! 对话是一组有序的轮次（turn），轮次下标决定最终音频中的时间顺序。
//! 上游生成器历史上使用过多种说话人标签（`speaker-1`/`speaker-2`、
//! `ホスト`/`ゲスト`、自由文本），这里统一归一化为两角色枚举。

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("对话不能为空")]
    Empty,

    #[error("第 {0} 轮的文本为空")]
    EmptyTurnText(usize),

    #[error("无法识别的说话人标签: {0}")]
    UnknownSpeakerLabel(String),
}

/// 说话人角色
///
/// 规范约定为两角色枚举，历史标签通过 [`Speaker::parse_label`] 映射。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Speaker {
    /// 主讲（主持人）
    Primary,
    /// 嘉宾
    Secondary,
}

impl Speaker {
    /// 归一化历史说话人标签
    ///
    /// 映射表:
    /// - `speaker-1` / `host` / `ホスト` -> Primary
    /// - `speaker-2` / `guest` / `ゲスト` -> Secondary
    pub fn parse_label(label: &str) -> Result<Self, DialogueError> {
        match label.trim().to_lowercase().as_str() {
            "speaker-1" | "speaker1" | "host" | "primary" | "ホスト" | "話者1" => {
                Ok(Speaker::Primary)
            }
            "speaker-2" | "speaker2" | "guest" | "secondary" | "ゲスト" | "話者2" => {
                Ok(Speaker::Secondary)
            }
            _ => Err(DialogueError::UnknownSpeakerLabel(label.to_string())),
        }
    }

    /// 输出用的规范标签
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Primary => "speaker-1",
            Speaker::Secondary => "speaker-2",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 对话轮次
///
/// 生成后不可变；在对话中的下标即最终音频中的顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl DialogueTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// 有序、非空的对话
///
/// 构造时校验：空对话与空文本轮次在任何网络/子进程工作开始前被拒绝。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    turns: Vec<DialogueTurn>,
}

impl Dialogue {
    pub fn new(turns: Vec<DialogueTurn>) -> Result<Self, DialogueError> {
        if turns.is_empty() {
            return Err(DialogueError::Empty);
        }
        for (index, turn) in turns.iter().enumerate() {
            if turn.text.trim().is_empty() {
                return Err(DialogueError::EmptyTurnText(index));
            }
        }
        Ok(Self { turns })
    }

    pub fn turns(&self) -> &[DialogueTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// 渲染为可编辑的文字稿（`speaker-1: ...` 形式，轮次间空行分隔）
    pub fn render_transcript(&self) -> String {
        let mut transcript = String::new();
        for turn in &self.turns {
            transcript.push_str(turn.speaker.label());
            transcript.push_str(": ");
            transcript.push_str(&turn.text);
            transcript.push_str("\n\n");
        }
        transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_variants() {
        assert_eq!(Speaker::parse_label("speaker-1").unwrap(), Speaker::Primary);
        assert_eq!(Speaker::parse_label("Host").unwrap(), Speaker::Primary);
        assert_eq!(Speaker::parse_label("ホスト").unwrap(), Speaker::Primary);
        assert_eq!(Speaker::parse_label("speaker-2").unwrap(), Speaker::Secondary);
        assert_eq!(Speaker::parse_label("ゲスト").unwrap(), Speaker::Secondary);
        assert_eq!(Speaker::parse_label(" guest ").unwrap(), Speaker::Secondary);
    }

    #[test]
    fn test_parse_label_unknown() {
        assert!(matches!(
            Speaker::parse_label("narrator"),
            Err(DialogueError::UnknownSpeakerLabel(_))
        ));
    }

    #[test]
    fn test_empty_dialogue_rejected() {
        assert!(matches!(Dialogue::new(vec![]), Err(DialogueError::Empty)));
    }

    #[test]
    fn test_empty_turn_text_rejected() {
        let turns = vec![
            DialogueTurn::new(Speaker::Primary, "Hello"),
            DialogueTurn::new(Speaker::Secondary, "   "),
        ];
        assert!(matches!(
            Dialogue::new(turns),
            Err(DialogueError::EmptyTurnText(1))
        ));
    }

    #[test]
    fn test_render_transcript() {
        let dialogue = Dialogue::new(vec![
            DialogueTurn::new(Speaker::Primary, "Hello"),
            DialogueTurn::new(Speaker::Secondary, "Hi there"),
        ])
        .unwrap();
        assert_eq!(
            dialogue.render_transcript(),
            "speaker-1: Hello\n\nspeaker-2: Hi there\n\n"
        );
    }
}
