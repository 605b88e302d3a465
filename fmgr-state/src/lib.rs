//! fmgr State Management
//!
//! Records which remote objects the `fmgr` tool manages, together with the
//! attributes last read back from the device.
//!
//! - **StateFile**: all managed resources, keyed by type and local name
//! - **StateBackend**: storage for the state file, with locking
//! - **LockInfo**: who holds the state lock and until when
//!
//! # Example
//!
//! ```ignore
//! use fmgr_state::{LocalBackend, LockInfo, StateBackend, StateFile};
//!
//! let backend = LocalBackend::new();
//! let lock = backend.acquire_lock(LockInfo::new("apply")).await?;
//! let mut state = backend.read_state().await?.unwrap_or_default();
//!
//! // ... create / update resources, upsert them into the state ...
//!
//! state.increment_serial();
//! backend.write_state(&state).await?;
//! backend.release_lock(&lock).await?;
//! ```

pub mod backend;
pub mod backends;
pub mod lock;
pub mod state;

pub use backend::{StateBackend, StateError, StateResult};
pub use backends::LocalBackend;
pub use lock::LockInfo;
pub use state::{ResourceState, StateFile};
