use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::domain::catalog::{Category, Product};
use crate::domain::checkout::{OrderSubmission, UpiDetails};
use crate::domain::errors::GatewayError;
use crate::domain::order::{OrderConfirmation, OrderRecord};
use crate::domain::ports::StoreGateway;
use crate::domain::returns::{ReturnRecord, ReturnRequest};
use crate::session::{role_for_path, SessionStore};

use super::models::{
    CategoryPayload, CheckoutOutcome, CheckoutPayload, ErrorBody, OrderPayload, ProductPayload,
    ReturnPayload, ReturnRequestPayload, UpiDetailsPayload,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Network(e.to_string())
    }
}

// ── Gateway ──────────────────────────────────────────────────────────────────

/// `reqwest`-backed [`StoreGateway`] talking JSON to the store's REST API.
pub struct HttpStoreGateway {
    http: reqwest::Client,
    config: ApiConfig,
    session: Arc<SessionStore>,
}

impl HttpStoreGateway {
    pub fn new(config: ApiConfig, session: Arc<SessionStore>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Path with the signed-in customer's email as `userEmail`.
    fn path_with_user_email(&self, path: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("userEmail", &self.config.user_email)
            .finish();
        format!("{}?{}", path, query)
    }

    /// Attaches the bearer token of the role that owns `path`, if signed in.
    fn authorize(&self, request: RequestBuilder, path: &str) -> RequestBuilder {
        match self.session.token(role_for_path(path)) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        log::debug!("GET {}", path);
        let response = self
            .authorize(self.http.get(self.endpoint(path)), path)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Maps the response per the storefront's error taxonomy: 401/403 mean
    /// the session is dead, any other non-2xx surfaces the backend message.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "Request failed".to_string());
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

impl StoreGateway for HttpStoreGateway {
    async fn upi_details(&self) -> Result<UpiDetails, GatewayError> {
        let payload: UpiDetailsPayload = self.get_json("/checkout/upi-details").await?;
        Ok(UpiDetails {
            upi_id: payload.upi_id,
        })
    }

    async fn submit_order(
        &self,
        submission: &OrderSubmission,
    ) -> Result<OrderConfirmation, GatewayError> {
        let path = self.path_with_user_email("/checkout/process");
        let payload = CheckoutPayload::from(submission);
        log::debug!("POST {} ({} items)", path, payload.items.len());
        let response = self
            .authorize(self.http.post(self.endpoint(&path)), &path)
            .json(&payload)
            .send()
            .await?;
        let outcome: CheckoutOutcome = Self::read_json(response).await?;
        outcome.into_confirmation()
    }

    async fn products(&self) -> Result<Vec<Product>, GatewayError> {
        let payloads: Vec<ProductPayload> = self.get_json("/products").await?;
        Ok(payloads.into_iter().map(Product::from).collect())
    }

    async fn products_in_category(&self, category_id: i64) -> Result<Vec<Product>, GatewayError> {
        let path = format!("/products/category/{}", category_id);
        let payloads: Vec<ProductPayload> = self.get_json(&path).await?;
        Ok(payloads.into_iter().map(Product::from).collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, GatewayError> {
        let payloads: Vec<CategoryPayload> = self.get_json("/categories").await?;
        Ok(payloads.into_iter().map(Category::from).collect())
    }

    async fn user_orders(&self) -> Result<Vec<OrderRecord>, GatewayError> {
        let path = self.path_with_user_email("/orders/user");
        let payloads: Vec<OrderPayload> = self.get_json(&path).await?;
        Ok(payloads.into_iter().map(OrderRecord::from).collect())
    }

    async fn request_return(
        &self,
        request: &ReturnRequest,
    ) -> Result<ReturnRecord, GatewayError> {
        let path = "/returns/request";
        let payload = ReturnRequestPayload::from(request);
        log::debug!("POST {} (order {})", path, payload.order_id);
        let response = self
            .authorize(self.http.post(self.endpoint(path)), path)
            .json(&payload)
            .send()
            .await?;
        let saved: ReturnPayload = Self::read_json(response).await?;
        Ok(ReturnRecord::from(saved))
    }

    async fn user_returns(&self) -> Result<Vec<ReturnRecord>, GatewayError> {
        let path = self.path_with_user_email("/returns/user");
        let payloads: Vec<ReturnPayload> = self.get_json(&path).await?;
        Ok(payloads.into_iter().map(ReturnRecord::from).collect())
    }
}
