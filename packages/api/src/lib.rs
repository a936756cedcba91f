//! # API crate — wire layer for the receipt manager client
//!
//! Everything the client needs to talk to the outside world lives here: the data
//! that crosses the wire, the two capability traits the controllers are written
//! against, and their concrete backends. The controllers themselves live in the
//! `client` crate and never see `reqwest` directly.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | [`AuthBackend`] trait, the plain-JSON [`FetchAuthBackend`], the user-pool [`ManagedAuthBackend`], and the [`AuthClient`] dispatcher |
//! | [`receipts`] | [`ReceiptBackend`] trait, [`HttpReceiptBackend`] (search + multipart upload) and the [`ReceiptClient`] dispatcher |
//! | [`models`] | Credentials, signup payloads, search queries, receipt records, upload requests |
//! | [`config`] | `receipts.toml` client configuration |
//! | [`error`] | [`ServiceError`] and [`ConfigError`] |
//!
//! [`MemoryBackend`] implements both traits in memory; it backs the tests and the
//! `provider = "memory"` offline mode.

pub mod auth;
pub mod config;
pub mod error;
mod http;
mod memory;
pub mod models;
pub mod receipts;

#[cfg(test)]
mod test_server;

pub use auth::{AuthBackend, AuthClient, FetchAuthBackend, ManagedAuthBackend};
pub use config::{AuthProvider, ClientConfig, LogLevel, OrderingPolicy};
pub use error::{ConfigError, ServiceError};
pub use memory::{CallCounts, MemoryBackend};
pub use models::{
    Credentials, Password, ReceiptRecord, SearchQuery, SignUpRequest, UploadReceipt,
    UploadRequest,
};
pub use receipts::{HttpReceiptBackend, ReceiptBackend, ReceiptClient};
