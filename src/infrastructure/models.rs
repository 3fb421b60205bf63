use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Category, Product};
use crate::domain::checkout::OrderSubmission;
use crate::domain::errors::GatewayError;
use crate::domain::order::{OrderConfirmation, OrderRecord};
use crate::domain::returns::{ReturnRecord, ReturnRequest};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: BigDecimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub items: Vec<CheckoutItem>,
    pub total_amount: BigDecimal,
    pub payment_method: &'static str,
    /// Explicit `null` for COD; the backend stores it as-is.
    pub transaction_id: Option<String>,
}

impl From<&OrderSubmission> for CheckoutPayload {
    fn from(submission: &OrderSubmission) -> Self {
        Self {
            items: submission
                .lines
                .iter()
                .map(|line| CheckoutItem {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: line.unit_price.clone(),
                })
                .collect(),
            total_amount: submission.total.clone(),
            payment_method: submission.payment_method.as_str(),
            transaction_id: submission.transaction_id.clone(),
        }
    }
}

/// The backend answers with `orderIds` when it split the cart across sellers
/// and with a single `orderId` otherwise.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(default)]
    pub order_ids: Option<Vec<i64>>,
}

impl CheckoutOutcome {
    pub fn into_confirmation(self) -> Result<OrderConfirmation, GatewayError> {
        let order_ids = match (self.order_ids, self.order_id) {
            (Some(ids), _) if !ids.is_empty() => ids,
            (_, Some(id)) => vec![id],
            _ => {
                return Err(GatewayError::InvalidResponse(
                    "checkout response carried no order ids".to_string(),
                ))
            }
        };
        Ok(OrderConfirmation { order_ids })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiDetailsPayload {
    pub upi_id: String,
}

/// Error body shape shared by the backend's handlers.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: BigDecimal,
    #[serde(default)]
    pub product_image_url: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub seller_name: Option<String>,
}

impl From<ProductPayload> for Product {
    fn from(p: ProductPayload) -> Self {
        Product {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            image_url: p.product_image_url,
            unit: p.unit,
            category_id: p.category_id,
            seller_name: p.seller_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_image_url: Option<String>,
}

impl From<CategoryPayload> for Category {
    fn from(c: CategoryPayload) -> Self {
        Category {
            id: c.id,
            name: c.name,
            description: c.description,
            image_url: c.category_image_url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub id: i64,
    pub status: String,
    pub total: BigDecimal,
    pub payment_method: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// The backend emits naive ISO-8601 local timestamps.
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl From<OrderPayload> for OrderRecord {
    fn from(o: OrderPayload) -> Self {
        OrderRecord {
            id: o.id,
            status: o.status,
            total: o.total,
            payment_method: o.payment_method,
            transaction_id: o.transaction_id,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequestPayload {
    pub order_id: i64,
    pub product_id: i64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub reason: String,
}

impl From<&ReturnRequest> for ReturnRequestPayload {
    fn from(request: &ReturnRequest) -> Self {
        Self {
            order_id: request.order_id,
            product_id: request.product_id,
            kind: request.kind.as_str(),
            reason: request.reason.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnPayload {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub reason: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl From<ReturnPayload> for ReturnRecord {
    fn from(r: ReturnPayload) -> Self {
        ReturnRecord {
            id: r.id,
            kind: r.kind,
            status: r.status,
            reason: r.reason,
            created_at: r.created_at,
        }
    }
}
