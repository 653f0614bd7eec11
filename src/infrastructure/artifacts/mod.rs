//! Artifacts - 工作目录临时产物管理

mod store;

pub use store::FileArtifactStore;
