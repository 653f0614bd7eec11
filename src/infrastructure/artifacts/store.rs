//! File Artifact Store - 文件系统临时产物存储
//!
//! 实现 ArtifactStorePort trait
//!
//! 工作目录是扁平的：单轮临时音频、manifest、最终输出都放在同一目录，
//! 靠 UUID 命名保证跨运行、跨并发轮次不冲突。按年龄清扫只认受管后缀，
//! 不碰目录里的其他文件。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{ArtifactError, ArtifactStorePort};

/// 按年龄清扫时认定为受管产物的后缀
const MANAGED_SUFFIXES: &[&str] = &["mp3", "txt"];

/// 文件系统产物存储
pub struct FileArtifactStore {
    working_dir: PathBuf,
}

impl FileArtifactStore {
    /// 创建存储，确保工作目录存在
    pub async fn new(working_dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let working_dir = working_dir.as_ref().to_path_buf();

        fs::create_dir_all(&working_dir)
            .await
            .map_err(|e| ArtifactError::Io(e.to_string()))?;

        Ok(Self { working_dir })
    }
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    async fn allocate_temp_file(&self, suffix: &str) -> Result<PathBuf, ArtifactError> {
        let path = self
            .working_dir
            .join(format!("{}{}", Uuid::new_v4(), suffix));

        // 立即创建空文件占位
        fs::write(&path, b"")
            .await
            .map_err(|e| ArtifactError::Io(e.to_string()))?;

        tracing::debug!(path = %path.display(), "Allocated temp file");
        Ok(path)
    }

    async fn delete(&self, paths: &[PathBuf]) {
        for path in paths {
            match fs::remove_file(path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "Deleted temp file"),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to delete temp file"
                ),
            }
        }
    }

    async fn sweep_older_than(&self, max_age: Duration) -> usize {
        let mut removed = 0usize;

        let mut entries = match fs::read_dir(&self.working_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    dir = %self.working_dir.display(),
                    error = %e,
                    "Age sweep could not read working dir"
                );
                return 0;
            }
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Age sweep skipped unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            let managed = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| MANAGED_SUFFIXES.contains(&ext))
                .unwrap_or(false);
            if !managed {
                continue;
            }

            let age = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified.elapsed().unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Age sweep skipped file");
                    continue;
                }
            };
            if age <= max_age {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "Age sweep removed file");
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Age sweep failed to remove file");
                }
            }
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_allocate_creates_unique_files() {
        let dir = tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path()).await.unwrap();

        let a = store.allocate_temp_file(".mp3").await.unwrap();
        let b = store.allocate_temp_file(".mp3").await.unwrap();
        assert_ne!(a, b);
        assert!(a.exists());
        assert!(b.exists());
    }

    #[tokio::test]
    async fn test_concurrent_allocation_yields_distinct_paths() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(FileArtifactStore::new(dir.path()).await.unwrap());

        let mut join_set = tokio::task::JoinSet::new();
        for _ in 0..1000 {
            let store = store.clone();
            join_set.spawn(async move { store.allocate_temp_file(".mp3").await.unwrap() });
        }

        let mut paths = std::collections::HashSet::new();
        while let Some(path) = join_set.join_next().await {
            paths.insert(path.unwrap());
        }
        assert_eq!(paths.len(), 1000);
    }

    #[tokio::test]
    async fn test_delete_is_best_effort() {
        let dir = tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path()).await.unwrap();

        let existing = store.allocate_temp_file(".mp3").await.unwrap();
        let missing = dir.path().join("never-created.mp3");

        // 不存在的文件不会让删除中断或报错
        store.delete(&[missing, existing.clone()]).await;
        assert!(!existing.exists());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_old_managed_files() {
        let dir = tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path()).await.unwrap();

        let fresh = store.allocate_temp_file(".mp3").await.unwrap();
        let unmanaged = dir.path().join("keep.wav");
        tokio::fs::write(&unmanaged, b"x").await.unwrap();

        // max_age 为零时所有受管文件都算过期
        tokio::time::sleep(Duration::from_millis(20)).await;
        let removed = store.sweep_older_than(Duration::from_secs(0)).await;
        assert_eq!(removed, 1);
        assert!(!fresh.exists());
        assert!(unmanaged.exists());

        // 新鲜文件在足够大的阈值下保留
        let kept = store.allocate_temp_file(".txt").await.unwrap();
        let removed = store.sweep_older_than(Duration::from_secs(3600)).await;
        assert_eq!(removed, 0);
        assert!(kept.exists());
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path()).await.unwrap();

        store.allocate_temp_file(".mp3").await.unwrap();
        store.allocate_temp_file(".txt").await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        let first = store.sweep_older_than(Duration::from_secs(0)).await;
        let second = store.sweep_older_than(Duration::from_secs(0)).await;
        assert_eq!(first, 2);
        assert_eq!(second, 0);
    }
}
