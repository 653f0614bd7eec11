//! Dialogue Context - 音色分配

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Speaker;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("缺少 {0} 角色的音色")]
    MissingVoice(&'static str),
}

/// 角色到服务商音色 ID 的映射
///
/// 两个角色都必须有非空音色，否则在任何网络工作开始前拒绝。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceAssignment {
    pub primary_voice: String,
    pub secondary_voice: String,
}

impl VoiceAssignment {
    pub fn new(
        primary_voice: impl Into<String>,
        secondary_voice: impl Into<String>,
    ) -> Result<Self, VoiceError> {
        let primary_voice = primary_voice.into();
        let secondary_voice = secondary_voice.into();
        if primary_voice.trim().is_empty() {
            return Err(VoiceError::MissingVoice("primary"));
        }
        if secondary_voice.trim().is_empty() {
            return Err(VoiceError::MissingVoice("secondary"));
        }
        Ok(Self {
            primary_voice,
            secondary_voice,
        })
    }

    /// 按角色选择音色
    pub fn voice_for(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Primary => &self.primary_voice,
            Speaker::Secondary => &self.secondary_voice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_for_role() {
        let voices = VoiceAssignment::new("v1", "v2").unwrap();
        assert_eq!(voices.voice_for(Speaker::Primary), "v1");
        assert_eq!(voices.voice_for(Speaker::Secondary), "v2");
    }

    #[test]
    fn test_missing_voice_rejected() {
        assert!(matches!(
            VoiceAssignment::new("", "v2"),
            Err(VoiceError::MissingVoice("primary"))
        ));
        assert!(matches!(
            VoiceAssignment::new("v1", "  "),
            Err(VoiceError::MissingVoice("secondary"))
        ));
    }
}
