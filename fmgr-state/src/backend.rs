//! State backend trait and error types

use async_trait::async_trait;
use thiserror::Error;

use crate::lock::LockInfo;
use crate::state::StateFile;

/// Errors that can occur when interacting with a state backend
#[derive(Debug, Error)]
pub enum StateError {
    /// The state is locked by another command
    #[error("State is locked: {holder} (lock ID: {lock_id})")]
    Locked { lock_id: String, holder: String },

    #[error("Lock not found: {0}")]
    LockNotFound(String),

    /// Lock ID mismatch when trying to release
    #[error("Lock ID mismatch: expected {expected}, got {actual}")]
    LockMismatch { expected: String, actual: String },

    /// State file is corrupted or written by an incompatible version
    #[error("Invalid state file: {0}")]
    InvalidState(String),

    /// State lineage mismatch (prevents overwriting an unrelated state)
    #[error("State lineage mismatch: expected {expected}, got {actual}")]
    LineageMismatch { expected: String, actual: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StateError {
    /// Create a Locked error from a LockInfo
    pub fn locked(lock: &LockInfo) -> Self {
        Self::Locked {
            lock_id: lock.id.clone(),
            holder: lock.to_string(),
        }
    }
}

/// Result type for backend operations
pub type StateResult<T> = Result<T, StateError>;

/// Trait for state storage backends
#[async_trait]
pub trait StateBackend: Send + Sync {
    /// Read the current state; `None` when nothing was written yet
    async fn read_state(&self) -> StateResult<Option<StateFile>>;

    /// Write the state
    ///
    /// The caller increments the serial before writing. A state whose lineage
    /// differs from the stored one is rejected.
    async fn write_state(&self, state: &StateFile) -> StateResult<()>;

    /// Take the given lock
    ///
    /// Fails while another unexpired lock is held.
    async fn acquire_lock(&self, lock: LockInfo) -> StateResult<LockInfo>;

    /// Release a previously acquired lock
    async fn release_lock(&self, lock: &LockInfo) -> StateResult<()>;

    /// Force release a lock by its ID, returning the lock that was removed
    async fn force_unlock(&self, lock_id: &str) -> StateResult<LockInfo>;
}
