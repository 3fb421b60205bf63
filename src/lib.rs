pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infrastructure;
pub mod session;

use std::sync::Arc;

pub use application::checkout_service::CheckoutService;
pub use application::in_flight::ActionGate;
pub use config::{ApiConfig, ConfigError};
pub use domain::cart::{Cart, CartLine};
pub use domain::catalog::{Category, Product};
pub use domain::checkout::{
    CheckoutSession, CheckoutStep, OrderSubmission, PaymentMethod, UpiDetails,
};
pub use domain::errors::{DomainError, GatewayError};
pub use domain::order::{OrderConfirmation, OrderRecord};
pub use domain::ports::StoreGateway;
pub use domain::returns::{ReturnRecord, ReturnRequest, ReturnType};
pub use errors::CheckoutError;
pub use infrastructure::http_gateway::HttpStoreGateway;
pub use session::{Role, SessionStore};

/// Build a [`CheckoutService`] wired to the HTTP gateway.
///
/// The session store is shared: the gateway reads tokens from it and the
/// service clears it when the backend rejects the session.
pub fn build_client(
    config: ApiConfig,
    session: Arc<SessionStore>,
) -> Result<CheckoutService<HttpStoreGateway>, GatewayError> {
    let gateway = HttpStoreGateway::new(config, session.clone())?;
    Ok(CheckoutService::new(gateway, session))
}
