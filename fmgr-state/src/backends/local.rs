//! Local file backend for state storage
//!
//! Stores state in a local JSON file (default: fmgr.state.json) and uses a
//! sibling .lock file for locking.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::backend::{StateBackend, StateError, StateResult};
use crate::lock::LockInfo;
use crate::state::StateFile;

pub struct LocalBackend {
    state_path: PathBuf,
    lock_path: PathBuf,
}

impl LocalBackend {
    pub const DEFAULT_STATE_FILE: &'static str = "fmgr.state.json";

    /// Backend on fmgr.state.json in the current directory
    pub fn new() -> Self {
        Self::with_path(PathBuf::from(Self::DEFAULT_STATE_FILE))
    }

    pub fn with_path(state_path: PathBuf) -> Self {
        let lock_path = state_path.with_extension("lock");
        Self {
            state_path,
            lock_path,
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    fn read_lock(&self) -> StateResult<Option<LockInfo>> {
        if !self.lock_path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.lock_path)
            .map_err(|e| StateError::Io(format!("Failed to read lock file: {}", e)))?;
        // An unreadable lock file is treated as stale
        Ok(serde_json::from_str(&content).ok())
    }

    fn remove_lock(&self) -> StateResult<()> {
        std::fs::remove_file(&self.lock_path)
            .map_err(|e| StateError::Io(format!("Failed to remove lock file: {}", e)))
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateBackend for LocalBackend {
    async fn read_state(&self) -> StateResult<Option<StateFile>> {
        if !self.state_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.state_path)
            .map_err(|e| StateError::Io(format!("Failed to read state file: {}", e)))?;

        let state: StateFile = serde_json::from_str(&content)
            .map_err(|e| StateError::InvalidState(format!("Failed to parse state file: {}", e)))?;
        state.check_version()?;

        log::debug!(
            "read state {} (serial {}, {} resources)",
            self.state_path.display(),
            state.serial,
            state.resources.len()
        );
        Ok(Some(state))
    }

    async fn write_state(&self, state: &StateFile) -> StateResult<()> {
        if let Some(existing) = self.read_state().await?
            && existing.lineage != state.lineage
        {
            return Err(StateError::LineageMismatch {
                expected: existing.lineage,
                actual: state.lineage.clone(),
            });
        }

        let content = serde_json::to_string_pretty(state)
            .map_err(|e| StateError::Serialization(format!("Failed to serialize state: {}", e)))?;

        std::fs::write(&self.state_path, content)
            .map_err(|e| StateError::Io(format!("Failed to write state file: {}", e)))?;

        log::debug!("wrote state {} (serial {})", self.state_path.display(), state.serial);
        Ok(())
    }

    async fn acquire_lock(&self, lock: LockInfo) -> StateResult<LockInfo> {
        if let Some(existing) = self.read_lock()? {
            if !existing.is_expired() {
                return Err(StateError::locked(&existing));
            }
            log::warn!("taking over expired state lock: {}", existing);
        }

        let content = serde_json::to_string_pretty(&lock)
            .map_err(|e| StateError::Serialization(format!("Failed to serialize lock: {}", e)))?;

        std::fs::write(&self.lock_path, content)
            .map_err(|e| StateError::Io(format!("Failed to write lock file: {}", e)))?;

        Ok(lock)
    }

    async fn release_lock(&self, lock: &LockInfo) -> StateResult<()> {
        if !self.lock_path.exists() {
            return Err(StateError::LockNotFound(lock.id.clone()));
        }

        if let Some(existing) = self.read_lock()?
            && existing.id != lock.id
        {
            return Err(StateError::LockMismatch {
                expected: lock.id.clone(),
                actual: existing.id,
            });
        }

        self.remove_lock()
    }

    async fn force_unlock(&self, lock_id: &str) -> StateResult<LockInfo> {
        let Some(existing) = self.read_lock()? else {
            return Err(StateError::LockNotFound(lock_id.to_string()));
        };

        if existing.id != lock_id {
            return Err(StateError::LockMismatch {
                expected: lock_id.to_string(),
                actual: existing.id,
            });
        }

        self.remove_lock()?;
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ResourceState;
    use tempfile::tempdir;

    #[tokio::test]
    async fn read_write() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::with_path(dir.path().join("test.state.json"));

        assert!(backend.read_state().await.unwrap().is_none());

        let mut state = StateFile::new();
        state.upsert_resource(ResourceState::new(
            "object_firewall_address",
            "lan",
            "lan",
            "fortimanager",
        ));
        state.increment_serial();
        backend.write_state(&state).await.unwrap();

        let read = backend.read_state().await.unwrap().unwrap();
        assert_eq!(read.serial, 1);
        assert_eq!(read.lineage, state.lineage);
        assert!(read.find_resource("object_firewall_address", "lan").is_some());
    }

    #[tokio::test]
    async fn unrelated_lineage_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::with_path(dir.path().join("test.state.json"));

        backend.write_state(&StateFile::new()).await.unwrap();
        let result = backend.write_state(&StateFile::new()).await;
        assert!(matches!(result, Err(StateError::LineageMismatch { .. })));
    }

    #[tokio::test]
    async fn corrupt_state_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let backend = LocalBackend::with_path(path);
        let result = backend.read_state().await;
        assert!(matches!(result, Err(StateError::InvalidState(_))));
    }

    #[tokio::test]
    async fn locking() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::with_path(dir.path().join("test.state.json"));

        let lock = backend.acquire_lock(LockInfo::new("apply")).await.unwrap();
        assert_eq!(lock.operation, "apply");

        let result = backend.acquire_lock(LockInfo::new("destroy")).await;
        assert!(matches!(result, Err(StateError::Locked { .. })));

        let other = LockInfo::new("import");
        let result = backend.release_lock(&other).await;
        assert!(matches!(result, Err(StateError::LockMismatch { .. })));

        backend.release_lock(&lock).await.unwrap();

        let lock = backend.acquire_lock(LockInfo::new("destroy")).await.unwrap();
        let released = backend.force_unlock(&lock.id).await.unwrap();
        assert_eq!(released.id, lock.id);
        assert_eq!(released.operation, "destroy");
        let result = backend.force_unlock(&lock.id).await;
        assert!(matches!(result, Err(StateError::LockNotFound(_))));
    }

    #[tokio::test]
    async fn expired_lock_is_taken_over() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::with_path(dir.path().join("test.state.json"));

        let stale = LockInfo::with_timeout("apply", -1);
        std::fs::write(
            dir.path().join("test.state.lock"),
            serde_json::to_string(&stale).unwrap(),
        )
        .unwrap();

        let lock = backend.acquire_lock(LockInfo::new("apply")).await.unwrap();
        assert_ne!(lock.id, stale.id);
    }

    #[tokio::test]
    async fn held_lock_names_the_resource_command() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend::with_path(dir.path().join("test.state.json"));

        let held = backend
            .acquire_lock(LockInfo::new("import").for_resource("object_firewall_addrgrp.servers"))
            .await
            .unwrap();

        match backend.acquire_lock(LockInfo::new("apply")).await {
            Err(StateError::Locked { lock_id, holder }) => {
                assert_eq!(lock_id, held.id);
                assert!(holder.starts_with("import object_firewall_addrgrp.servers by "));
            }
            other => panic!("Expected Locked error, got {:?}", other.map(|l| l.id)),
        }

        let released = backend.force_unlock(&held.id).await.unwrap();
        assert_eq!(released.target.as_deref(), Some("object_firewall_addrgrp.servers"));
    }

    #[test]
    fn default_path() {
        let backend = LocalBackend::new();
        assert_eq!(backend.state_path(), Path::new("fmgr.state.json"));
    }
}
