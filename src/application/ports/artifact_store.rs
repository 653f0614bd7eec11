//! Artifact Store Port - 工作目录临时产物管理抽象
//!
//! 工作目录被并发运行和历史运行共享，唯一命名保证不冲突（不加锁）。
//! 删除一律 best-effort：单个文件失败只记日志，绝不向上抛。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 产物存储错误
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(String),
}

/// Artifact Store Port
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 工作目录
    fn working_dir(&self) -> &Path;

    /// 在工作目录分配一个唯一命名的空文件并返回其路径
    ///
    /// `suffix` 形如 `.mp3` / `.txt`；并发分配不会产生路径冲突。
    async fn allocate_temp_file(&self, suffix: &str) -> Result<PathBuf, ArtifactError>;

    /// 逐个 best-effort 删除给定文件，失败记日志后继续
    async fn delete(&self, paths: &[PathBuf]);

    /// 删除工作目录中修改时间早于 `max_age` 的受管后缀文件
    ///
    /// 返回删除数量；单个文件的错误被记录并跳过，不会中止扫描。
    async fn sweep_older_than(&self, max_age: Duration) -> usize;
}
