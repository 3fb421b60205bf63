use thiserror::Error;

use crate::domain::errors::{DomainError, GatewayError};

/// Top-level error surface of the checkout client.
///
/// Nothing here is fatal: validation errors are fixed by user input, gateway
/// errors by retrying, and unauthorized errors by signing in again.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A request for this action is already outstanding; the duplicate
    /// trigger is dropped, not queued.
    #[error("'{0}' is already in progress")]
    ActionInFlight(&'static str),
}

impl CheckoutError {
    /// Whether simply retrying the same operation can succeed. Validation
    /// errors need different input and unauthorized errors a fresh login
    /// first.
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::Validation(_) => false,
            CheckoutError::Gateway(GatewayError::Unauthorized) => false,
            CheckoutError::Gateway(_) => true,
            CheckoutError::ActionInFlight(_) => false,
        }
    }
}
