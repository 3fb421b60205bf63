use chrono::NaiveDateTime;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    Return,
    Replacement,
}

impl ReturnType {
    /// Wire name understood by the store backend.
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnType::Return => "RETURN",
            ReturnType::Replacement => "REPLACEMENT",
        }
    }
}

/// A return or replacement request for one product of a delivered order.
///
/// Only the reason is validated client-side; delivery status and the
/// return/replacement eligibility windows are checked by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnRequest {
    pub order_id: i64,
    pub product_id: i64,
    pub kind: ReturnType,
    pub reason: String,
}

impl ReturnRequest {
    /// Builds a request with a trimmed, non-empty reason.
    pub fn new(
        order_id: i64,
        product_id: i64,
        kind: ReturnType,
        reason: &str,
    ) -> Result<Self, DomainError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::ReasonMissing);
        }
        Ok(Self {
            order_id,
            product_id,
            kind,
            reason: reason.to_string(),
        })
    }
}

/// A previously filed return, as listed on the account's returns page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnRecord {
    pub id: i64,
    pub kind: String,
    pub status: String,
    pub reason: String,
    pub created_at: Option<NaiveDateTime>,
}
