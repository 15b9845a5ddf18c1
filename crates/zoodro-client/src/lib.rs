//! HTTP client for the zoodro vendor API.
//!
//! Fetches the vendors inside a viewport bounding box and turns the JSON
//! envelope into typed [`zoodro_core::VendorRecord`]s, dropping individual
//! records that are malformed instead of failing the whole batch.

pub mod client;
pub mod error;
pub mod types;

pub use client::VendorClient;
pub use error::ClientError;
pub use types::VendorBatch;
