//! Request-token bookkeeping for "last request wins" vendor fetching.
//!
//! The network may deliver responses in any order. [`FetchTracker`] tags
//! every request with a fresh [`RequestToken`] and accepts a response only
//! if its token is still the latest one issued when the response arrives.
//! Anything else is discarded without touching the vendor list.

use std::fmt;
use std::sync::Arc;

use zoodro_client::{ClientError, VendorBatch};
use zoodro_core::{MapView, VendorRecord, ViewportBounds};

/// Identifies one fetch attempt. Tokens only ever increase within a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fetch that has been issued but not yet resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub bounds: ViewportBounds,
}

/// What happened to one fetch attempt.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The response was current; the vendor list now holds its `count` records.
    Accepted {
        token: RequestToken,
        count: usize,
        skipped: usize,
    },
    /// A newer request was issued before this one resolved.
    Discarded { token: RequestToken },
    /// The current request failed. The previous vendor list is kept.
    Failed {
        token: RequestToken,
        error: Arc<ClientError>,
    },
}

impl FetchOutcome {
    #[must_use]
    pub fn token(&self) -> RequestToken {
        match self {
            Self::Accepted { token, .. } | Self::Discarded { token } | Self::Failed { token, .. } => {
                *token
            }
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Owns the latest outstanding token and the current vendor list.
///
/// Purely synchronous: the caller performs the I/O between [`issue`] and
/// [`resolve`] and must call both from one serialized context.
///
/// [`issue`]: FetchTracker::issue
/// [`resolve`]: FetchTracker::resolve
#[derive(Debug)]
pub struct FetchTracker {
    issued: u64,
    outstanding: Option<RequestToken>,
    vendors: Arc<[VendorRecord]>,
}

impl Default for FetchTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            issued: 0,
            outstanding: None,
            vendors: Arc::from(Vec::new()),
        }
    }

    /// Computes the bounds for `view` and records a fresh token as the
    /// latest outstanding request, superseding any earlier one.
    pub fn issue(&mut self, view: &MapView) -> FetchRequest {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.outstanding = Some(token);
        FetchRequest {
            token,
            bounds: view.bounds(),
        }
    }

    /// The latest issued request, if it has not resolved yet.
    #[must_use]
    pub fn outstanding(&self) -> Option<RequestToken> {
        self.outstanding
    }

    #[must_use]
    pub fn vendors(&self) -> Arc<[VendorRecord]> {
        Arc::clone(&self.vendors)
    }

    /// Applies the result of the request identified by `token`.
    ///
    /// The token is compared against the latest outstanding one at call
    /// time. A stale token is discarded whether the result is a success or
    /// a failure. A current success replaces the vendor list wholesale; a
    /// current failure leaves it untouched.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<VendorBatch, ClientError>,
    ) -> FetchOutcome {
        if self.outstanding != Some(token) {
            tracing::debug!(
                %token,
                latest = ?self.outstanding.map(RequestToken::get),
                "ignoring stale vendor response"
            );
            return FetchOutcome::Discarded { token };
        }
        self.outstanding = None;

        match result {
            Ok(batch) => {
                let count = batch.vendors.len();
                self.vendors = Arc::from(batch.vendors);
                FetchOutcome::Accepted {
                    token,
                    count,
                    skipped: batch.skipped,
                }
            }
            Err(error) => FetchOutcome::Failed {
                token,
                error: Arc::new(error),
            },
        }
    }
}
