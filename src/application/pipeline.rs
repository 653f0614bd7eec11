//! Dialogue Pipeline - 并行音频合成管道
//!
//! 编排一次运行：按轮次扇出并发合成任务，结果带轮次下标回收，
//! 按下标重排（完成顺序不确定，绝不能按完成顺序拼接），
//! 交给媒体拼接器产出单个音频文件。
//!
//! 失败纪律：任何一轮合成失败即中止整次运行（不产出半成品播客）；
//! 未完成的任务允许跑完，结果在清理时丢弃。无论成败，本次运行创建的
//! 全部临时文件都会被 best-effort 删除，随后触发一次与运行无关的
//! 按年龄清扫。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::error::PipelineError;
use super::ports::{
    ArtifactStorePort, MediaConcatenatorPort, SpeechRequest, SpeechSynthesizerPort,
    SynthesisError,
};
use crate::domain::{Dialogue, VoiceAssignment};

/// 受管音频后缀（工作目录中所有产物统一使用）
pub const AUDIO_SUFFIX: &str = ".mp3";

/// 管道配置
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 最大并发合成数（限制对服务商的并发出站连接）
    pub max_concurrent: usize,
    /// 按年龄清扫的阈值
    pub sweep_max_age: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 8,
            sweep_max_age: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// 单轮合成任务，仅存活于一次运行内
#[derive(Debug, Clone)]
struct SynthesisJob {
    turn_index: usize,
    text: String,
    voice: String,
}

/// 并行对话合成管道
pub struct DialoguePipeline {
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    concatenator: Arc<dyn MediaConcatenatorPort>,
    store: Arc<dyn ArtifactStorePort>,
    config: PipelineConfig,
}

impl DialoguePipeline {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        concatenator: Arc<dyn MediaConcatenatorPort>,
        store: Arc<dyn ArtifactStorePort>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            synthesizer,
            concatenator,
            store,
            config,
        }
    }

    /// 把一段对话合成为单个音频文件，返回最终文件路径
    ///
    /// 最终文件不属于本次运行的清理范围（交还调用方），
    /// 但与工作目录里的其他文件一样受按年龄清扫约束。
    pub async fn synthesize_dialogue(
        &self,
        dialogue: &Dialogue,
        voices: &VoiceAssignment,
        audio_model: &str,
    ) -> Result<PathBuf, PipelineError> {
        if audio_model.trim().is_empty() {
            return Err(PipelineError::Validation(
                "audio model cannot be empty".to_string(),
            ));
        }

        let turn_count = dialogue.len();
        tracing::info!(turns = turn_count, "Starting dialogue synthesis run");

        let mut scratch: Vec<PathBuf> = Vec::with_capacity(turn_count);
        let outcome = self
            .run_synthesis(dialogue, voices, audio_model, &mut scratch)
            .await;

        // 无论成败：删除本次运行的全部临时文件，再触发按年龄清扫。
        // 清理失败只记日志，不会覆盖主结果。
        self.store.delete(&scratch).await;
        let swept = self.store.sweep_older_than(self.config.sweep_max_age).await;
        if swept > 0 {
            tracing::info!(removed = swept, "Age sweep removed old artifacts");
        }

        match &outcome {
            Ok(path) => tracing::info!(
                turns = turn_count,
                output = %path.display(),
                "Dialogue synthesis run completed"
            ),
            Err(err) => tracing::error!(
                turns = turn_count,
                error = %err,
                "Dialogue synthesis run failed"
            ),
        }

        outcome
    }

    /// 扇出、回收、重排、拼接；创建的临时文件逐一记入 `scratch`
    async fn run_synthesis(
        &self,
        dialogue: &Dialogue,
        voices: &VoiceAssignment,
        audio_model: &str,
        scratch: &mut Vec<PathBuf>,
    ) -> Result<PathBuf, PipelineError> {
        let turn_count = dialogue.len();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut join_set: JoinSet<(usize, Result<Vec<u8>, SynthesisError>)> = JoinSet::new();

        for (turn_index, turn) in dialogue.turns().iter().enumerate() {
            let job = SynthesisJob {
                turn_index,
                text: turn.text.clone(),
                voice: voices.voice_for(turn.speaker).to_string(),
            };
            let synthesizer = self.synthesizer.clone();
            let model = audio_model.to_string();
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| PipelineError::Internal(format!("semaphore closed: {}", e)))?;

            tracing::debug!(
                turn_index = job.turn_index,
                voice = %job.voice,
                text_len = job.text.len(),
                "Submitting synthesis task"
            );

            join_set.spawn(async move {
                let _permit = permit; // 持有 permit 直到任务完成
                let request = SpeechRequest {
                    text: job.text,
                    voice: job.voice,
                    model,
                };
                (job.turn_index, synthesizer.synthesize(request).await)
            });
        }

        // 全量 join：完成顺序不确定，结果按轮次下标归位。
        // 出现失败后不强制取消其余任务，让它们跑完，产物进 scratch 等清理。
        let mut ordered: Vec<Option<PathBuf>> = vec![None; turn_count];
        let mut failure: Option<PipelineError> = None;
        let mut completed = 0usize;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((turn_index, Ok(bytes))) => {
                    completed += 1;
                    tracing::debug!(
                        turn_index,
                        completed,
                        total = turn_count,
                        audio_size = bytes.len(),
                        "Turn synthesized"
                    );
                    match self.write_temp_audio(&bytes, scratch).await {
                        Ok(path) => ordered[turn_index] = Some(path),
                        Err(err) => keep_first_failure(&mut failure, err),
                    }
                }
                Ok((turn_index, Err(err))) => {
                    tracing::error!(turn_index, error = %err, "Turn synthesis failed");
                    keep_first_failure(
                        &mut failure,
                        PipelineError::Synthesis {
                            turn_index,
                            source: err,
                        },
                    );
                }
                Err(join_err) => {
                    keep_first_failure(
                        &mut failure,
                        PipelineError::Internal(format!("synthesis task panicked: {}", join_err)),
                    );
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        // 按轮次下标排序后的路径序列（绝不是完成顺序）
        let inputs: Vec<PathBuf> = ordered
            .into_iter()
            .enumerate()
            .map(|(turn_index, path)| {
                path.ok_or_else(|| {
                    PipelineError::Internal(format!("missing temp file for turn {}", turn_index))
                })
            })
            .collect::<Result<_, _>>()?;

        let output = self.store.allocate_temp_file(AUDIO_SUFFIX).await?;
        if let Err(err) = self.concatenator.concatenate(&inputs, &output).await {
            // 失败的运行不能留下输出占位文件
            scratch.push(output);
            return Err(err.into());
        }

        Ok(output)
    }

    /// 把一轮合成结果写入新分配的临时文件并记入 scratch
    async fn write_temp_audio(
        &self,
        bytes: &[u8],
        scratch: &mut Vec<PathBuf>,
    ) -> Result<PathBuf, PipelineError> {
        let path = self.store.allocate_temp_file(AUDIO_SUFFIX).await?;
        scratch.push(path.clone());
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PipelineError::Internal(format!("failed to write temp audio: {}", e)))?;
        Ok(path)
    }
}

/// 聚合失败时保留轮次下标最小的那个（对外只暴露一个终态错误）
fn keep_first_failure(slot: &mut Option<PipelineError>, candidate: PipelineError) {
    let replace = match (slot.as_ref(), &candidate) {
        (None, _) => true,
        (
            Some(PipelineError::Synthesis {
                turn_index: kept, ..
            }),
            PipelineError::Synthesis {
                turn_index: new, ..
            },
        ) => new < kept,
        // 合成失败优先于内部错误
        (Some(PipelineError::Internal(_)), PipelineError::Synthesis { .. }) => true,
        _ => false,
    };
    if replace {
        *slot = Some(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::tempdir;

    use crate::application::ports::ConcatenationError;
    use crate::domain::{DialogueTurn, Speaker};
    use crate::infrastructure::artifacts::FileArtifactStore;

    /// 测试用合成器：负载编码文本本身，可注入延迟与失败
    struct ScriptedSynthesizer {
        /// 记录 (text, voice) 调用
        calls: Mutex<Vec<(String, String)>>,
        /// 这些文本的合成会失败
        fail_on: HashSet<String>,
        /// 轮次总数，用于反转完成顺序（靠前的轮次睡得更久）
        reverse_order_over: usize,
    }

    impl ScriptedSynthesizer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: HashSet::new(),
                reverse_order_over: 0,
            }
        }

        fn failing_on(texts: &[&str]) -> Self {
            Self {
                fail_on: texts.iter().map(|t| t.to_string()).collect(),
                ..Self::new()
            }
        }

        fn reversed(total: usize) -> Self {
            Self {
                reverse_order_over: total,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizerPort for ScriptedSynthesizer {
        async fn synthesize(&self, request: SpeechRequest) -> Result<Vec<u8>, SynthesisError> {
            let index: usize = request
                .text
                .trim_start_matches("turn-")
                .parse()
                .unwrap_or(0);
            self.calls
                .lock()
                .unwrap()
                .push((request.text.clone(), request.voice.clone()));

            if self.reverse_order_over > 0 {
                // 下标越小睡得越久 => 完成顺序与轮次顺序相反
                let delay = (self.reverse_order_over - index) as u64 * 10;
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            if self.fail_on.contains(&request.text) {
                return Err(SynthesisError::ProviderError(format!(
                    "scripted failure for {}",
                    request.text
                )));
            }
            Ok(format!("[{}]", request.text).into_bytes())
        }
    }

    /// 测试用拼接器：按顺序把输入字节串接写入输出
    struct ByteJoinConcatenator;

    #[async_trait]
    impl MediaConcatenatorPort for ByteJoinConcatenator {
        async fn concatenate(
            &self,
            inputs: &[PathBuf],
            output: &Path,
        ) -> Result<(), ConcatenationError> {
            let mut joined = Vec::new();
            for input in inputs {
                let bytes = tokio::fs::read(input)
                    .await
                    .map_err(|e| ConcatenationError::ToolFailed(e.to_string()))?;
                joined.extend_from_slice(&bytes);
            }
            tokio::fs::write(output, joined)
                .await
                .map_err(|e| ConcatenationError::ToolFailed(e.to_string()))?;
            Ok(())
        }
    }

    /// 测试用拼接器：总是失败，且不产出文件
    struct FailingConcatenator;

    #[async_trait]
    impl MediaConcatenatorPort for FailingConcatenator {
        async fn concatenate(
            &self,
            _inputs: &[PathBuf],
            _output: &Path,
        ) -> Result<(), ConcatenationError> {
            Err(ConcatenationError::ToolFailed(
                "ffmpeg: No such file or directory".to_string(),
            ))
        }
    }

    fn dialogue_of(n: usize) -> Dialogue {
        let turns = (0..n)
            .map(|i| {
                let speaker = if i % 2 == 0 {
                    Speaker::Primary
                } else {
                    Speaker::Secondary
                };
                DialogueTurn::new(speaker, format!("turn-{}", i))
            })
            .collect();
        Dialogue::new(turns).unwrap()
    }

    fn voices() -> VoiceAssignment {
        VoiceAssignment::new("v1", "v2").unwrap()
    }

    async fn pipeline_with(
        dir: &Path,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        concatenator: Arc<dyn MediaConcatenatorPort>,
    ) -> DialoguePipeline {
        let store = Arc::new(FileArtifactStore::new(dir).await.unwrap());
        DialoguePipeline::new(
            synthesizer,
            concatenator,
            store,
            PipelineConfig {
                max_concurrent: 4,
                sweep_max_age: Duration::from_secs(24 * 60 * 60),
            },
        )
    }

    async fn list_files(dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            files.push(entry.path());
        }
        files
    }

    #[tokio::test]
    async fn test_segment_order_matches_turn_order_despite_reversed_completion() {
        let dir = tempdir().unwrap();
        let n = 5;
        let pipeline = pipeline_with(
            dir.path(),
            Arc::new(ScriptedSynthesizer::reversed(n)),
            Arc::new(ByteJoinConcatenator),
        )
        .await;

        let output = pipeline
            .synthesize_dialogue(&dialogue_of(n), &voices(), "tts-1")
            .await
            .unwrap();

        let joined = tokio::fs::read(&output).await.unwrap();
        assert_eq!(
            String::from_utf8(joined).unwrap(),
            "[turn-0][turn-1][turn-2][turn-3][turn-4]"
        );
    }

    #[tokio::test]
    async fn test_two_turn_scenario_voices_and_cleanup() {
        let dir = tempdir().unwrap();
        let synthesizer = Arc::new(ScriptedSynthesizer::new());
        let dialogue = Dialogue::new(vec![
            DialogueTurn::new(Speaker::Primary, "Hello"),
            DialogueTurn::new(Speaker::Secondary, "Hi there"),
        ])
        .unwrap();

        let pipeline = pipeline_with(
            dir.path(),
            synthesizer.clone(),
            Arc::new(ByteJoinConcatenator),
        )
        .await;

        let output = pipeline
            .synthesize_dialogue(&dialogue, &voices(), "tts-1")
            .await
            .unwrap();

        // 每轮一次调用，按角色选择音色
        let mut calls = synthesizer.calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                ("Hello".to_string(), "v1".to_string()),
                ("Hi there".to_string(), "v2".to_string()),
            ]
        );

        // 最终文件内容按轮次顺序
        let joined = tokio::fs::read(&output).await.unwrap();
        assert_eq!(String::from_utf8(joined).unwrap(), "[Hello][Hi there]");

        // 工作目录中不残留任何单轮临时文件，只剩最终产物
        let files = list_files(dir.path()).await;
        assert_eq!(files, vec![output]);
    }

    #[tokio::test]
    async fn test_single_turn_failure_aborts_run_and_cleans_temp_files() {
        let dir = tempdir().unwrap();
        let pipeline = pipeline_with(
            dir.path(),
            Arc::new(ScriptedSynthesizer::failing_on(&["turn-1"])),
            Arc::new(ByteJoinConcatenator),
        )
        .await;

        let err = pipeline
            .synthesize_dialogue(&dialogue_of(3), &voices(), "tts-1")
            .await
            .unwrap_err();

        match err {
            PipelineError::Synthesis { turn_index, .. } => assert_eq!(turn_index, 1),
            other => panic!("unexpected error: {:?}", other),
        }

        // 失败后不产出最终文件，先写入的临时文件全部被删除
        assert!(list_files(dir.path()).await.is_empty());
    }

    #[tokio::test]
    async fn test_lowest_turn_index_failure_is_surfaced() {
        let dir = tempdir().unwrap();
        let pipeline = pipeline_with(
            dir.path(),
            Arc::new(ScriptedSynthesizer::failing_on(&["turn-1", "turn-3"])),
            Arc::new(ByteJoinConcatenator),
        )
        .await;

        let err = pipeline
            .synthesize_dialogue(&dialogue_of(4), &voices(), "tts-1")
            .await
            .unwrap_err();

        match err {
            PipelineError::Synthesis { turn_index, .. } => assert_eq!(turn_index, 1),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concatenation_failure_leaves_no_final_file() {
        let dir = tempdir().unwrap();
        let pipeline = pipeline_with(
            dir.path(),
            Arc::new(ScriptedSynthesizer::new()),
            Arc::new(FailingConcatenator),
        )
        .await;

        let err = pipeline
            .synthesize_dialogue(&dialogue_of(3), &voices(), "tts-1")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Concatenation(_)));
        // 拼接失败后临时文件与输出占位文件全部被清理
        assert!(list_files(dir.path()).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_audio_model_rejected_before_any_call() {
        let dir = tempdir().unwrap();
        let synthesizer = Arc::new(ScriptedSynthesizer::new());
        let pipeline = pipeline_with(dir.path(), synthesizer.clone(), Arc::new(ByteJoinConcatenator)).await;

        let err = pipeline
            .synthesize_dialogue(&dialogue_of(2), &voices(), "  ")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Validation(_)));
        assert!(synthesizer.calls.lock().unwrap().is_empty());
    }
}
