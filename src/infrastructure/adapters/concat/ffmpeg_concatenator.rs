//! FFmpeg Concatenator - 通过 ffmpeg concat demuxer 拼接音频
//!
//! 实现 MediaConcatenatorPort trait
//!
//! 流程：把输入路径按给定顺序写入 manifest（concat demuxer 语法），
//! 然后以子进程方式调用:
//! `ffmpeg -y -f concat -safe 0 -i <manifest> -acodec libmp3lame -q:a 2 <output>`
//!
//! 统一重编码到固定目标编码（而不是 stream copy），保证输出格式
//! 与各输入的原始编码无关。manifest 由本适配器分配并在用完后清理，
//! 进程崩溃遗留的 manifest 交给按年龄清扫兜底。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;

use crate::application::ports::{ArtifactStorePort, ConcatenationError, MediaConcatenatorPort};

/// manifest 的受管后缀
const MANIFEST_SUFFIX: &str = ".txt";

/// FFmpeg 拼接器配置
#[derive(Debug, Clone)]
pub struct FfmpegConcatenatorConfig {
    /// ffmpeg 可执行文件（默认依赖 PATH）
    pub ffmpeg_bin: String,
    /// 目标音频编码器
    pub codec: String,
    /// VBR 质量参数（0=最高，9=最低）
    pub quality: String,
}

impl Default for FfmpegConcatenatorConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            codec: "libmp3lame".to_string(),
            quality: "2".to_string(),
        }
    }
}

/// FFmpeg 拼接器
pub struct FfmpegConcatenator {
    config: FfmpegConcatenatorConfig,
    store: Arc<dyn ArtifactStorePort>,
}

impl FfmpegConcatenator {
    pub fn new(config: FfmpegConcatenatorConfig, store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { config, store }
    }

    pub fn with_defaults(store: Arc<dyn ArtifactStorePort>) -> Self {
        Self::new(FfmpegConcatenatorConfig::default(), store)
    }
}

#[async_trait]
impl MediaConcatenatorPort for FfmpegConcatenator {
    async fn concatenate(
        &self,
        inputs: &[PathBuf],
        output: &Path,
    ) -> Result<(), ConcatenationError> {
        if inputs.is_empty() {
            return Err(ConcatenationError::ManifestError(
                "no input files to concatenate".to_string(),
            ));
        }

        // 写 manifest（输入总是本进程创建的文件，按可信处理，-safe 0）
        let manifest_path = self
            .store
            .allocate_temp_file(MANIFEST_SUFFIX)
            .await
            .map_err(|e| ConcatenationError::ManifestError(e.to_string()))?;
        let manifest = render_manifest(inputs);
        tracing::debug!(manifest = %manifest_path.display(), "Writing concat manifest:\n{}", manifest);

        let write_result = tokio::fs::write(&manifest_path, &manifest)
            .await
            .map_err(|e| ConcatenationError::ManifestError(e.to_string()));
        if let Err(err) = write_result {
            self.store.delete(std::slice::from_ref(&manifest_path)).await;
            return Err(err);
        }

        let result = self.run_ffmpeg(&manifest_path, output).await;

        // manifest 只被消费一次，用完即清
        self.store.delete(std::slice::from_ref(&manifest_path)).await;

        result
    }
}

impl FfmpegConcatenator {
    async fn run_ffmpeg(
        &self,
        manifest_path: &Path,
        output: &Path,
    ) -> Result<(), ConcatenationError> {
        let mut command = Command::new(&self.config.ffmpeg_bin);
        command
            .arg("-y") // 覆盖已存在的输出
            .args(["-f", "concat", "-safe", "0"])
            .arg("-i")
            .arg(manifest_path)
            .args(["-acodec", &self.config.codec, "-q:a", &self.config.quality])
            .arg(output);

        tracing::info!(
            manifest = %manifest_path.display(),
            output = %output.display(),
            codec = %self.config.codec,
            "Running ffmpeg concat"
        );

        let result = command
            .output()
            .await
            .map_err(|e| ConcatenationError::ToolFailed(format!("failed to spawn ffmpeg: {}", e)))?;

        let stderr = String::from_utf8_lossy(&result.stderr);
        if !result.status.success() {
            tracing::error!(status = ?result.status.code(), "ffmpeg failed: {}", stderr);
            return Err(ConcatenationError::ToolFailed(format!(
                "ffmpeg exited with {:?}: {}",
                result.status.code(),
                stderr.trim()
            )));
        }

        // 退出码为零但没有产物同样算失败
        let produced = tokio::fs::metadata(output)
            .await
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if !produced {
            return Err(ConcatenationError::NoOutput(
                output.to_string_lossy().to_string(),
            ));
        }

        tracing::info!(output = %output.display(), "ffmpeg concat completed");
        Ok(())
    }
}

/// 渲染 concat demuxer 的 manifest：每个输入一行，保持给定顺序
fn render_manifest(inputs: &[PathBuf]) -> String {
    let mut manifest = String::new();
    for input in inputs {
        manifest.push_str("file '");
        manifest.push_str(&escape_manifest_path(&normalize_path(input)));
        manifest.push_str("'\n");
    }
    manifest
}

/// 统一路径分隔符为 `/`（concat demuxer 在各平台都接受）
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// concat demuxer 的单引号转义：`'` -> `'\''`
fn escape_manifest_path(path: &str) -> String {
    path.replace('\'', "'\\''")
}
