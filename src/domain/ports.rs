use super::catalog::{Category, Product};
use super::checkout::{OrderSubmission, UpiDetails};
use super::errors::GatewayError;
use super::order::{OrderConfirmation, OrderRecord};
use super::returns::{ReturnRecord, ReturnRequest};

/// Client-side port onto the store's REST backend.
///
/// Implementations perform the actual transport; the domain and application
/// layers only see these operations and the [`GatewayError`] taxonomy.
#[allow(async_fn_in_trait)]
pub trait StoreGateway {
    async fn upi_details(&self) -> Result<UpiDetails, GatewayError>;

    /// Sends the order to the backend. Idempotency is the backend's concern;
    /// callers must not issue a second call for the same confirmation while
    /// one is outstanding.
    async fn submit_order(
        &self,
        submission: &OrderSubmission,
    ) -> Result<OrderConfirmation, GatewayError>;

    async fn products(&self) -> Result<Vec<Product>, GatewayError>;

    async fn products_in_category(&self, category_id: i64) -> Result<Vec<Product>, GatewayError>;

    async fn categories(&self) -> Result<Vec<Category>, GatewayError>;

    async fn user_orders(&self) -> Result<Vec<OrderRecord>, GatewayError>;

    /// Files a return or replacement request. Eligibility (delivery status,
    /// return window) is enforced by the backend.
    async fn request_return(&self, request: &ReturnRequest)
        -> Result<ReturnRecord, GatewayError>;

    async fn user_returns(&self) -> Result<Vec<ReturnRecord>, GatewayError>;
}
