//! fmgr Device Client
//!
//! This crate describes the remote side of the provider: the calls every
//! resource makes against the device management API, and the routing
//! parameters used to address an object.
//!
//! # Overview
//!
//! - **DeviceClient**: the Create/Read/Update/Delete interface resources call into
//! - **Endpoint**: URL template and key field of one resource type
//! - **Paradict**: routing parameters (adom, device, vdom, parent keys) filling the template
//! - **MemoryClient** / **LocalClient**: in-process implementations backed by a
//!   map or a JSON file
//!
//! The authenticated JSON-RPC transport to a real device implements the same
//! trait and is provided elsewhere.
//!
//! # Example
//!
//! ```ignore
//! use fmgr_client::{DeviceClient, Endpoint, MemoryClient, Paradict};
//!
//! let endpoint = Endpoint::table("/pm/config/{adom}/obj/firewall/address", "name");
//! let paradict = Paradict::new().with("adom", "adom/root");
//!
//! let client = MemoryClient::new();
//! client.create(&endpoint, &obj, &paradict).await?;
//! let current = client.read(&endpoint, Some("lan"), &paradict).await?;
//! ```

pub mod client;
pub mod clients;
pub mod paradict;
pub mod retry;

// Re-export main types for convenience
pub use client::{ApiObject, ClientError, ClientResult, DeviceClient, Endpoint};
pub use clients::{LocalClient, MemoryClient, Method};
pub use paradict::Paradict;
pub use retry::retry;
