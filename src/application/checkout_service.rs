use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::domain::cart::Cart;
use crate::domain::catalog::{Category, Product};
use crate::domain::checkout::{CheckoutSession, PaymentMethod, UpiDetails};
use crate::domain::errors::{DomainError, GatewayError};
use crate::domain::order::{OrderConfirmation, OrderRecord};
use crate::domain::ports::StoreGateway;
use crate::domain::returns::{ReturnRecord, ReturnRequest, ReturnType};
use crate::errors::CheckoutError;
use crate::session::SessionStore;

use super::in_flight::ActionGate;

pub const ACTION_SUBMIT_ORDER: &str = "submit-order";
pub const ACTION_FETCH_UPI: &str = "fetch-upi-details";
pub const ACTION_SUBMIT_RETURN: &str = "submit-return";

/// Orchestrates the cart, the checkout step machine and the store gateway.
///
/// Owned by the UI layer that renders it; all state mutation goes through
/// `&mut self`, and network-backed actions are guarded by an [`ActionGate`]
/// so a double-click cannot issue two requests for one confirmation.
pub struct CheckoutService<G> {
    gateway: G,
    session_store: Arc<SessionStore>,
    cart: Cart,
    checkout: Option<CheckoutSession>,
    actions: ActionGate,
}

impl<G: StoreGateway> CheckoutService<G> {
    pub fn new(gateway: G, session_store: Arc<SessionStore>) -> Self {
        Self {
            gateway,
            session_store,
            cart: Cart::new(),
            checkout: None,
            actions: ActionGate::new(),
        }
    }

    // ── Cart ─────────────────────────────────────────────────────────────

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_to_cart(&mut self, product: &Product) {
        self.cart.add(product);
    }

    pub fn set_quantity(&mut self, product_id: i64, quantity: i32) {
        self.cart.set_quantity(product_id, quantity);
    }

    pub fn remove_from_cart(&mut self, product_id: i64) {
        self.cart.remove(product_id);
    }

    pub fn cart_total(&self) -> BigDecimal {
        self.cart.total()
    }

    // ── Checkout steps ───────────────────────────────────────────────────

    /// Starts a fresh checkout attempt at the Review step. Rejected when the
    /// cart is empty, matching the storefront's "no items in cart" screen.
    pub fn begin_checkout(&mut self) -> Result<&CheckoutSession, CheckoutError> {
        if self.cart.is_empty() {
            return Err(DomainError::EmptyCart.into());
        }
        let session = CheckoutSession::new();
        log::info!(
            "checkout attempt {} started with {} line(s), total {}",
            session.attempt_id(),
            self.cart.len(),
            self.cart.total()
        );
        Ok(self.checkout.insert(session))
    }

    pub fn checkout(&self) -> Option<&CheckoutSession> {
        self.checkout.as_ref()
    }

    pub fn proceed_to_method(&mut self) -> Result<(), CheckoutError> {
        Ok(self.session_mut()?.proceed_to_method()?)
    }

    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        Ok(self.session_mut()?.select_method(method)?)
    }

    pub fn continue_from_method(&mut self) -> Result<(), CheckoutError> {
        Ok(self.session_mut()?.continue_from_method()?)
    }

    pub fn payment_done(&mut self) -> Result<(), CheckoutError> {
        Ok(self.session_mut()?.payment_done()?)
    }

    pub fn go_back(&mut self) -> Result<(), CheckoutError> {
        Ok(self.session_mut()?.back()?)
    }

    pub fn set_transaction_id(&mut self, value: &str) -> Result<(), CheckoutError> {
        self.session_mut()?.set_transaction_id(value);
        Ok(())
    }

    // ── Network-backed operations ────────────────────────────────────────

    /// Fetches the store's UPI collect details for the Pay step.
    pub async fn fetch_upi_details(&self) -> Result<UpiDetails, CheckoutError> {
        let _guard = self
            .actions
            .try_begin(ACTION_FETCH_UPI)
            .ok_or(CheckoutError::ActionInFlight(ACTION_FETCH_UPI))?;
        self.gateway
            .upi_details()
            .await
            .map_err(|e| self.escalate(e))
    }

    /// Submits the current confirmation to the backend, exactly once.
    ///
    /// While a submission is outstanding, further calls fail fast with
    /// [`CheckoutError::ActionInFlight`] without touching the network.
    /// On success the cart is cleared and the session becomes Submitted; on
    /// failure both are left untouched so the user can retry from Confirm.
    pub async fn place_order(&mut self) -> Result<OrderConfirmation, CheckoutError> {
        let _guard = self
            .actions
            .try_begin(ACTION_SUBMIT_ORDER)
            .ok_or(CheckoutError::ActionInFlight(ACTION_SUBMIT_ORDER))?;

        let session = self
            .checkout
            .as_mut()
            .ok_or(DomainError::CheckoutNotStarted)?;
        let submission = session.build_submission(&self.cart)?;

        log::info!(
            "submitting checkout attempt {}: {} line(s), total {}, method {}",
            session.attempt_id(),
            submission.lines.len(),
            submission.total,
            submission.payment_method.as_str()
        );

        match self.gateway.submit_order(&submission).await {
            Ok(confirmation) => {
                session.mark_submitted()?;
                self.cart.clear();
                log::info!(
                    "checkout attempt {} confirmed, order ids {:?}",
                    session.attempt_id(),
                    confirmation.order_ids
                );
                Ok(confirmation)
            }
            Err(err) => {
                log::warn!(
                    "checkout attempt {} failed: {}",
                    session.attempt_id(),
                    err
                );
                Err(self.escalate(err))
            }
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.actions.is_busy(ACTION_SUBMIT_ORDER)
    }

    /// Shared handle to the busy flags, e.g. for disabling buttons.
    pub fn action_gate(&self) -> ActionGate {
        self.actions.clone()
    }

    // ── Catalog and order history ────────────────────────────────────────

    pub async fn products(&self) -> Result<Vec<Product>, CheckoutError> {
        self.gateway.products().await.map_err(|e| self.escalate(e))
    }

    pub async fn products_in_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Product>, CheckoutError> {
        self.gateway
            .products_in_category(category_id)
            .await
            .map_err(|e| self.escalate(e))
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CheckoutError> {
        self.gateway
            .categories()
            .await
            .map_err(|e| self.escalate(e))
    }

    pub async fn order_history(&self) -> Result<Vec<OrderRecord>, CheckoutError> {
        self.gateway
            .user_orders()
            .await
            .map_err(|e| self.escalate(e))
    }

    // ── Returns ──────────────────────────────────────────────────────────

    /// Files a return or replacement request for a delivered order's product.
    ///
    /// An empty (or all-whitespace) reason is rejected before any network
    /// call; eligibility windows are the backend's call and surface as
    /// rejected requests.
    pub async fn request_return(
        &self,
        order_id: i64,
        product_id: i64,
        kind: ReturnType,
        reason: &str,
    ) -> Result<ReturnRecord, CheckoutError> {
        let _guard = self
            .actions
            .try_begin(ACTION_SUBMIT_RETURN)
            .ok_or(CheckoutError::ActionInFlight(ACTION_SUBMIT_RETURN))?;
        let request = ReturnRequest::new(order_id, product_id, kind, reason)?;
        log::info!(
            "filing {} request for order {}, product {}",
            request.kind.as_str(),
            request.order_id,
            request.product_id
        );
        self.gateway
            .request_return(&request)
            .await
            .map_err(|e| self.escalate(e))
    }

    pub async fn return_history(&self) -> Result<Vec<ReturnRecord>, CheckoutError> {
        self.gateway
            .user_returns()
            .await
            .map_err(|e| self.escalate(e))
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn session_mut(&mut self) -> Result<&mut CheckoutSession, DomainError> {
        self.checkout.as_mut().ok_or(DomainError::CheckoutNotStarted)
    }

    /// An unauthorized response invalidates the whole session: every role
    /// token is dropped and the caller must re-authenticate.
    fn escalate(&self, err: GatewayError) -> CheckoutError {
        if matches!(err, GatewayError::Unauthorized) {
            log::warn!("session rejected by backend, clearing all tokens");
            self.session_store.clear_all();
        }
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::{CheckoutStep, OrderSubmission};
    use crate::session::Role;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::str::FromStr;

    struct FakeGateway {
        submissions: RefCell<Vec<OrderSubmission>>,
        submit_results: RefCell<VecDeque<Result<OrderConfirmation, GatewayError>>>,
        return_requests: RefCell<Vec<ReturnRequest>>,
    }

    impl FakeGateway {
        fn new(results: Vec<Result<OrderConfirmation, GatewayError>>) -> Self {
            Self {
                submissions: RefCell::new(Vec::new()),
                submit_results: RefCell::new(results.into()),
                return_requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl StoreGateway for FakeGateway {
        async fn upi_details(&self) -> Result<UpiDetails, GatewayError> {
            Ok(UpiDetails {
                upi_id: "store@okaxis".to_string(),
            })
        }

        async fn submit_order(
            &self,
            submission: &OrderSubmission,
        ) -> Result<OrderConfirmation, GatewayError> {
            self.submissions.borrow_mut().push(submission.clone());
            self.submit_results
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(OrderConfirmation { order_ids: vec![1] }))
        }

        async fn products(&self) -> Result<Vec<Product>, GatewayError> {
            Ok(vec![])
        }

        async fn products_in_category(&self, _: i64) -> Result<Vec<Product>, GatewayError> {
            Ok(vec![])
        }

        async fn categories(&self) -> Result<Vec<Category>, GatewayError> {
            Ok(vec![])
        }

        async fn user_orders(&self) -> Result<Vec<OrderRecord>, GatewayError> {
            Err(GatewayError::Unauthorized)
        }

        async fn request_return(
            &self,
            request: &ReturnRequest,
        ) -> Result<ReturnRecord, GatewayError> {
            self.return_requests.borrow_mut().push(request.clone());
            Ok(ReturnRecord {
                id: 12,
                kind: request.kind.as_str().to_string(),
                status: "PENDING".to_string(),
                reason: request.reason.clone(),
                created_at: None,
            })
        }

        async fn user_returns(&self) -> Result<Vec<ReturnRecord>, GatewayError> {
            Ok(vec![])
        }
    }

    fn product(id: i64, price: &str) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: None,
            price: BigDecimal::from_str(price).unwrap(),
            image_url: None,
            unit: None,
            category_id: None,
            seller_name: None,
        }
    }

    fn service_with(
        results: Vec<Result<OrderConfirmation, GatewayError>>,
    ) -> CheckoutService<FakeGateway> {
        CheckoutService::new(FakeGateway::new(results), Arc::new(SessionStore::new()))
    }

    fn drive_to_cod_confirm(service: &mut CheckoutService<FakeGateway>) {
        service.begin_checkout().unwrap();
        service.proceed_to_method().unwrap();
        service.select_payment_method(PaymentMethod::Cod).unwrap();
        service.continue_from_method().unwrap();
    }

    #[tokio::test]
    async fn cod_checkout_submits_and_clears_cart() {
        let mut service = service_with(vec![Ok(OrderConfirmation {
            order_ids: vec![42],
        })]);
        service.add_to_cart(&product(1, "100.00"));
        service.set_quantity(1, 2);
        drive_to_cod_confirm(&mut service);

        let confirmation = service.place_order().await.unwrap();
        assert_eq!(confirmation.order_ids, vec![42]);
        assert!(service.cart().is_empty());
        assert_eq!(service.checkout().unwrap().step(), CheckoutStep::Submitted);

        let submissions = service.gateway.submissions.borrow();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].total, BigDecimal::from_str("200.00").unwrap());
        assert_eq!(submissions[0].payment_method, PaymentMethod::Cod);
        assert_eq!(submissions[0].transaction_id, None);
    }

    #[tokio::test]
    async fn upi_checkout_carries_transaction_id() {
        let mut service = service_with(vec![Ok(OrderConfirmation {
            order_ids: vec![7, 8],
        })]);
        service.add_to_cart(&product(1, "49.99"));
        service.set_quantity(1, 3);
        service.begin_checkout().unwrap();
        service.proceed_to_method().unwrap();
        service.select_payment_method(PaymentMethod::Upi).unwrap();
        service.continue_from_method().unwrap();
        service.payment_done().unwrap();
        service.set_transaction_id("TXN123").unwrap();

        let confirmation = service.place_order().await.unwrap();
        assert_eq!(confirmation.order_ids, vec![7, 8]);

        let submissions = service.gateway.submissions.borrow();
        assert_eq!(submissions[0].total, BigDecimal::from_str("149.97").unwrap());
        assert_eq!(submissions[0].transaction_id.as_deref(), Some("TXN123"));
    }

    #[tokio::test]
    async fn upi_without_transaction_id_is_blocked_locally() {
        let mut service = service_with(vec![]);
        service.add_to_cart(&product(1, "10.00"));
        service.begin_checkout().unwrap();
        service.proceed_to_method().unwrap();
        service.select_payment_method(PaymentMethod::Upi).unwrap();
        service.continue_from_method().unwrap();
        service.payment_done().unwrap();

        let err = service.place_order().await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(DomainError::TransactionIdMissing)
        ));
        // Blocked before any network call.
        assert!(service.gateway.submissions.borrow().is_empty());
    }

    #[tokio::test]
    async fn failed_submission_preserves_cart_and_allows_retry() {
        let mut service = service_with(vec![
            Err(GatewayError::Rejected {
                status: 500,
                message: "Internal server error".to_string(),
            }),
            Ok(OrderConfirmation { order_ids: vec![9] }),
        ]);
        service.add_to_cart(&product(1, "100.00"));
        drive_to_cod_confirm(&mut service);

        let err = service.place_order().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(service.cart().len(), 1);
        assert_eq!(service.checkout().unwrap().step(), CheckoutStep::Confirm);

        let confirmation = service.place_order().await.unwrap();
        assert_eq!(confirmation.order_ids, vec![9]);
        assert!(service.cart().is_empty());
        assert_eq!(service.gateway.submissions.borrow().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_submission_is_dropped_without_network_call() {
        let mut service = service_with(vec![]);
        service.add_to_cart(&product(1, "100.00"));
        drive_to_cod_confirm(&mut service);

        // Simulate the first click still being in flight.
        let gate = service.action_gate();
        let _held = gate.try_begin(ACTION_SUBMIT_ORDER).unwrap();
        assert!(service.is_submitting());

        let err = service.place_order().await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::ActionInFlight(ACTION_SUBMIT_ORDER)
        ));
        assert!(service.gateway.submissions.borrow().is_empty());

        // The guarded operation never ran, so nothing was mutated.
        assert_eq!(service.cart().len(), 1);
        assert_eq!(service.checkout().unwrap().step(), CheckoutStep::Confirm);
    }

    #[tokio::test]
    async fn unauthorized_submission_clears_session_store() {
        let store = Arc::new(SessionStore::new());
        store.set_token(Role::Customer, "c-token");
        store.set_token(Role::Seller, "s-token");
        let mut service =
            CheckoutService::new(FakeGateway::new(vec![Err(GatewayError::Unauthorized)]), store.clone());
        service.add_to_cart(&product(1, "100.00"));
        drive_to_cod_confirm(&mut service);

        let err = service.place_order().await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(!store.is_authenticated(Role::Customer));
        assert!(!store.is_authenticated(Role::Seller));
        // Cart survives; the user signs in again and retries.
        assert_eq!(service.cart().len(), 1);
    }

    #[tokio::test]
    async fn unauthorized_history_fetch_clears_session_store() {
        let store = Arc::new(SessionStore::new());
        store.set_token(Role::Customer, "c-token");
        let service = CheckoutService::new(FakeGateway::new(vec![]), store.clone());

        let err = service.order_history().await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Gateway(GatewayError::Unauthorized)
        ));
        assert!(!store.is_authenticated(Role::Customer));
    }

    #[tokio::test]
    async fn begin_checkout_rejects_empty_cart() {
        let mut service = service_with(vec![]);
        let err = service.begin_checkout().unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(DomainError::EmptyCart)
        ));
    }

    #[tokio::test]
    async fn place_order_without_checkout_is_rejected() {
        let mut service = service_with(vec![]);
        service.add_to_cart(&product(1, "10.00"));
        let err = service.place_order().await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(DomainError::CheckoutNotStarted)
        ));
    }

    #[tokio::test]
    async fn return_request_with_blank_reason_is_blocked_locally() {
        let service = service_with(vec![]);
        let err = service
            .request_return(31, 7, ReturnType::Return, "   ")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(DomainError::ReasonMissing)
        ));
        // Blocked before any network call.
        assert!(service.gateway.return_requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn return_request_is_filed_through_gateway() {
        let service = service_with(vec![]);
        let record = service
            .request_return(31, 7, ReturnType::Replacement, " wrong size delivered ")
            .await
            .unwrap();
        assert_eq!(record.status, "PENDING");
        assert_eq!(record.kind, "REPLACEMENT");

        let requests = service.gateway.return_requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].order_id, 31);
        assert_eq!(requests[0].product_id, 7);
        assert_eq!(requests[0].reason, "wrong size delivered");
    }

    #[tokio::test]
    async fn duplicate_return_request_is_dropped_without_network_call() {
        let service = service_with(vec![]);
        let gate = service.action_gate();
        let _held = gate.try_begin(ACTION_SUBMIT_RETURN).unwrap();

        let err = service
            .request_return(31, 7, ReturnType::Return, "box arrived damaged")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::ActionInFlight(ACTION_SUBMIT_RETURN)
        ));
        assert!(service.gateway.return_requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn fetch_upi_details_returns_store_details() {
        let service = service_with(vec![]);
        let details = service.fetch_upi_details().await.unwrap();
        assert_eq!(details.upi_id, "store@okaxis");
    }
}
