//! State lock held while a command changes the device and the state

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default lock timeout in seconds (10 minutes)
pub const DEFAULT_LOCK_TIMEOUT_SECS: i64 = 600;

/// Who holds the state lock, for what, and until when
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    pub id: String,
    /// The command holding the lock (e.g., "apply", "destroy", "import")
    pub operation: String,
    /// Resource address when the command works on a single resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// user@hostname
    pub who: String,
    pub pid: u32,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(operation: impl Into<String>) -> Self {
        Self::with_timeout(operation, DEFAULT_LOCK_TIMEOUT_SECS)
    }

    pub fn with_timeout(operation: impl Into<String>, timeout_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            operation: operation.into(),
            target: None,
            who: lock_owner(),
            pid: std::process::id(),
            created: now,
            expires: now + Duration::seconds(timeout_secs),
        }
    }

    /// Lock taken for a command on one resource (`type.name`)
    pub fn for_resource(mut self, address: impl Into<String>) -> Self {
        self.target = Some(address.into());
        self
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires
    }
}

impl fmt::Display for LockInfo {
    /// e.g. `import object_firewall_addrgrp.servers by admin@mgmt (pid 4242), expires 2026-10-18 10:10:00 UTC`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation)?;
        if let Some(target) = &self.target {
            write!(f, " {}", target)?;
        }
        write!(f, " by {} (pid {})", self.who, self.pid)?;
        if self.is_expired() {
            write!(f, ", expired")
        } else {
            write!(f, ", expires {}", self.expires.format("%Y-%m-%d %H:%M:%S UTC"))
        }
    }
}

fn lock_owner() -> String {
    let username = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    format!("{}@{}", username, hostname)
}
