//! Vendor fetch coordination for the zoodro map.
//!
//! Turns a stream of map view changes into vendor API requests, making sure
//! a slow earlier response can never overwrite a faster later one. The
//! vendor list and the latest request token are owned by a single actor
//! task; everything else talks to it through channels.

pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod source;
pub mod tracker;

pub use coordinator::{Coordinator, CoordinatorSettings, PendingFetch};
pub use debounce::Debouncer;
pub use error::CoordinatorError;
pub use source::VendorSource;
pub use tracker::{FetchOutcome, FetchRequest, FetchTracker, RequestToken};
