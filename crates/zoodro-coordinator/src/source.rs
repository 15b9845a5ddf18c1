use std::future::Future;

use zoodro_client::{ClientError, VendorBatch, VendorClient};
use zoodro_core::ViewportBounds;

/// Where vendor batches come from.
///
/// The coordinator only needs "vendors inside this box"; the HTTP client is
/// the production implementation.
pub trait VendorSource: Send + Sync + 'static {
    fn fetch_vendors(
        &self,
        bounds: &ViewportBounds,
    ) -> impl Future<Output = Result<VendorBatch, ClientError>> + Send;
}

impl VendorSource for VendorClient {
    fn fetch_vendors(
        &self,
        bounds: &ViewportBounds,
    ) -> impl Future<Output = Result<VendorBatch, ClientError>> + Send {
        VendorClient::fetch_vendors(self, bounds)
    }
}
