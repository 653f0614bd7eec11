//! Instruction Templates - 内置指令模板集
//!
//! 每个模板集包含五段指令（intro / text instructions / scratch pad /
//! prelude / dialogue），编译期通过 include_str! 嵌入，按 key 选择。

use serde::{Deserialize, Serialize};

/// 模板集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Podcast,
    Lecture,
    Summary,
    ShortSummary,
}

/// 一套指令模板
#[derive(Debug, Clone, Copy)]
pub struct InstructionTemplate {
    pub intro: &'static str,
    pub text_instructions: &'static str,
    pub scratch_pad: &'static str,
    pub prelude: &'static str,
    pub dialogue: &'static str,
}

impl TemplateKind {
    /// 全部可选模板
    pub fn all() -> &'static [TemplateKind] {
        &[
            TemplateKind::Podcast,
            TemplateKind::Lecture,
            TemplateKind::Summary,
            TemplateKind::ShortSummary,
        ]
    }

    /// 对外展示的 key
    pub fn key(&self) -> &'static str {
        match self {
            TemplateKind::Podcast => "podcast",
            TemplateKind::Lecture => "lecture",
            TemplateKind::Summary => "summary",
            TemplateKind::ShortSummary => "short_summary",
        }
    }

    /// 取出该模板集的指令
    pub fn template(&self) -> InstructionTemplate {
        match self {
            TemplateKind::Podcast => InstructionTemplate {
                intro: include_str!("../../prompts/podcast_intro.md"),
                text_instructions: include_str!("../../prompts/podcast_text_instructions.md"),
                scratch_pad: include_str!("../../prompts/podcast_scratch_pad.md"),
                prelude: include_str!("../../prompts/podcast_prelude.md"),
                dialogue: include_str!("../../prompts/podcast_dialog.md"),
            },
            TemplateKind::Lecture => InstructionTemplate {
                intro: include_str!("../../prompts/lecture_intro.md"),
                text_instructions: include_str!("../../prompts/lecture_text_instructions.md"),
                scratch_pad: include_str!("../../prompts/lecture_scratch_pad.md"),
                prelude: include_str!("../../prompts/lecture_prelude.md"),
                dialogue: include_str!("../../prompts/lecture_dialog.md"),
            },
            TemplateKind::Summary => InstructionTemplate {
                intro: include_str!("../../prompts/summary_intro.md"),
                text_instructions: include_str!("../../prompts/summary_text_instructions.md"),
                scratch_pad: include_str!("../../prompts/summary_scratch_pad.md"),
                prelude: include_str!("../../prompts/summary_prelude.md"),
                dialogue: include_str!("../../prompts/summary_dialog.md"),
            },
            TemplateKind::ShortSummary => InstructionTemplate {
                intro: include_str!("../../prompts/short_summary_intro.md"),
                text_instructions: include_str!("../../prompts/short_summary_text_instructions.md"),
                scratch_pad: include_str!("../../prompts/short_summary_scratch_pad.md"),
                prelude: include_str!("../../prompts/short_summary_prelude.md"),
                dialogue: include_str!("../../prompts/short_summary_dialog.md"),
            },
        }
    }
}

impl std::str::FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "podcast" => Ok(TemplateKind::Podcast),
            "lecture" => Ok(TemplateKind::Lecture),
            "summary" => Ok(TemplateKind::Summary),
            "short_summary" | "short summary" => Ok(TemplateKind::ShortSummary),
            other => Err(format!("unknown template: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_from_str_round_trips_keys() {
        for kind in TemplateKind::all() {
            assert_eq!(TemplateKind::from_str(kind.key()).unwrap(), *kind);
        }
    }

    #[test]
    fn test_unknown_template_rejected() {
        assert!(TemplateKind::from_str("opera").is_err());
    }

    #[test]
    fn test_templates_are_non_empty() {
        for kind in TemplateKind::all() {
            let template = kind.template();
            assert!(!template.intro.trim().is_empty());
            assert!(!template.text_instructions.trim().is_empty());
            assert!(!template.scratch_pad.trim().is_empty());
            assert!(!template.prelude.trim().is_empty());
            assert!(!template.dialogue.trim().is_empty());
        }
    }
}
