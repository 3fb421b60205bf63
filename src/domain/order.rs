use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

/// Result of a successful checkout. The backend may split a multi-seller
/// cart into several orders, so there is always a list of ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_ids: Vec<i64>,
}

/// A previously placed order, as listed on the account's order history.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub id: i64,
    pub status: String,
    pub total: BigDecimal,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}
