use thiserror::Error;

use super::checkout::CheckoutStep;

/// Local validation failures, caught before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("No payment method selected")]
    PaymentMethodMissing,
    #[error("Transaction ID is required for UPI payments")]
    TransactionIdMissing,
    #[error("A reason is required")]
    ReasonMissing,
    #[error("Order total must be positive")]
    NonPositiveTotal,
    #[error("No checkout in progress")]
    CheckoutNotStarted,
    #[error("Cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: CheckoutStep,
        to: CheckoutStep,
    },
}

/// Failures reported by (or on the way to) the store backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 401/403 from the backend: the session is no longer valid.
    #[error("Unauthorized access")]
    Unauthorized,
    /// Any other non-success status, carrying the backend's message.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
