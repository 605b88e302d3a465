//! Device client trait and error types

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::paradict::{Paradict, escape_key};

/// JSON object as exchanged with the API
pub type ApiObject = serde_json::Map<String, JsonValue>;

/// Errors that can occur when talking to the device
#[derive(Debug, Error)]
pub enum ClientError {
    /// A placeholder of the URL template has no routing parameter
    #[error("Missing routing parameter '{0}'")]
    MissingParameter(String),

    /// The addressed object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// An object with the same key already exists
    #[error("Object already exists: {0}")]
    Conflict(String),

    /// The object sent to the device is malformed
    #[error("Invalid object: {0}")]
    InvalidObject(String),

    /// The device answered with an error status
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Connection or timeout problem; safe to retry
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ClientError {
    /// Whether repeating the call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Address of one resource type on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// URL template, e.g. "/pm/config/adom/{adom}/obj/firewall/address"
    pub path: &'static str,
    /// API key holding the row key of a table; `None` for singletons
    pub mkey_field: Option<&'static str>,
}

impl Endpoint {
    /// A table of objects addressed by `mkey_field`
    pub const fn table(path: &'static str, mkey_field: &'static str) -> Self {
        Self {
            path,
            mkey_field: Some(mkey_field),
        }
    }

    /// A single object addressed by the URL itself
    pub const fn singleton(path: &'static str) -> Self {
        Self {
            path,
            mkey_field: None,
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.mkey_field.is_none()
    }

    /// Render the URL of the table (or of the singleton object)
    pub fn url(&self, paradict: &Paradict) -> ClientResult<String> {
        paradict.render(self.path)
    }

    /// Render the URL of a single object
    pub fn object_url(&self, mkey: Option<&str>, paradict: &Paradict) -> ClientResult<String> {
        let url = self.url(paradict)?;
        match (self.mkey_field, mkey) {
            (Some(_), Some(mkey)) => Ok(format!("{}/{}", url, escape_key(mkey))),
            (Some(field), None) => Err(ClientError::MissingParameter(field.to_string())),
            (None, _) => Ok(url),
        }
    }
}

/// Interface of the device management API
///
/// Each call receives the endpoint of the resource type and the routing
/// parameters filling its URL template. `obj` uses the device's own
/// kebab-case key naming.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Add a new object to a table (or set a singleton)
    async fn create(
        &self,
        endpoint: &Endpoint,
        obj: &ApiObject,
        paradict: &Paradict,
    ) -> ClientResult<Option<JsonValue>>;

    /// Fetch an object; `None` if it does not exist
    async fn read(
        &self,
        endpoint: &Endpoint,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<Option<ApiObject>>;

    /// Modify an existing object
    async fn update(
        &self,
        endpoint: &Endpoint,
        obj: &ApiObject,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<Option<JsonValue>>;

    /// Remove an object
    async fn delete(
        &self,
        endpoint: &Endpoint,
        mkey: Option<&str>,
        paradict: &Paradict,
    ) -> ClientResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_for_tables_and_singletons() {
        let paradict = Paradict::new().with("adom", "root");

        let table = Endpoint::table("/pm/config/adom/{adom}/obj/firewall/address", "name");
        assert_eq!(
            table.object_url(Some("lan"), &paradict).unwrap(),
            "/pm/config/adom/root/obj/firewall/address/lan"
        );
        assert!(matches!(
            table.object_url(None, &paradict),
            Err(ClientError::MissingParameter(field)) if field == "name"
        ));

        let singleton = Endpoint::singleton("/pm/config/device/{device}/global/system/global");
        let paradict = Paradict::new().with("device", "fgt-01");
        assert!(singleton.is_singleton());
        assert_eq!(
            singleton.object_url(Some("ignored"), &paradict).unwrap(),
            "/pm/config/device/fgt-01/global/system/global"
        );
    }

    #[test]
    fn only_transport_errors_are_retryable() {
        assert!(ClientError::Transport("timeout".into()).is_retryable());
        assert!(!ClientError::NotFound("x".into()).is_retryable());
        assert!(
            !ClientError::Api {
                code: -3,
                message: "Object does not exist".into()
            }
            .is_retryable()
        );
    }
}
