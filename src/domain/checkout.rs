use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use super::cart::{Cart, CartLine};
use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Upi,
    Cod,
}

impl PaymentMethod {
    /// Wire name understood by the store backend.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Cod => "COD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Review,
    Method,
    Pay,
    Confirm,
    Submitted,
}

/// UPI collect details published by the store.
///
/// The client never verifies payment; it only renders these details and later
/// records the transaction reference the user reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiDetails {
    pub upi_id: String,
}

impl UpiDetails {
    /// `upi://pay` deep link for the given amount, suitable for rendering as
    /// a QR code or intent link.
    pub fn payment_uri(&self, amount: &BigDecimal, note: &str) -> String {
        let amount = amount
            .with_scale_round(2, bigdecimal::RoundingMode::HalfUp)
            .to_string();
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("pa", &self.upi_id)
            .append_pair("am", &amount)
            .append_pair("cu", "INR")
            .append_pair("tn", note)
            .finish();
        format!("upi://pay?{}", query)
    }
}

/// The order request handed to the submission gateway. Built once per
/// confirmation, immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSubmission {
    pub lines: Vec<CartLine>,
    pub total: BigDecimal,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
}

/// One checkout attempt.
///
/// Review → Method → (UPI: Pay → Confirm) | (COD: Confirm) → Submitted.
/// Backward moves are allowed and keep captured data, with one exception:
/// switching to a different payment method drops a previously entered
/// transaction id, since it referenced a payment against the old method.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    attempt_id: Uuid,
    step: CheckoutStep,
    payment_method: Option<PaymentMethod>,
    transaction_id: Option<String>,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            step: CheckoutStep::Review,
            payment_method: None,
            transaction_id: None,
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    /// Review → Method.
    pub fn proceed_to_method(&mut self) -> Result<(), DomainError> {
        self.require(CheckoutStep::Review, CheckoutStep::Method)?;
        self.step = CheckoutStep::Method;
        Ok(())
    }

    /// Picks (or re-picks) the payment method at the Method step.
    pub fn select_method(&mut self, method: PaymentMethod) -> Result<(), DomainError> {
        self.require(CheckoutStep::Method, CheckoutStep::Method)?;
        if self.payment_method != Some(method) {
            // A transaction id entered for the old method is stale.
            self.transaction_id = None;
        }
        self.payment_method = Some(method);
        Ok(())
    }

    /// Method → Pay for UPI, Method → Confirm for COD.
    pub fn continue_from_method(&mut self) -> Result<(), DomainError> {
        self.require(CheckoutStep::Method, CheckoutStep::Pay)?;
        match self.payment_method {
            Some(PaymentMethod::Upi) => {
                self.step = CheckoutStep::Pay;
                Ok(())
            }
            Some(PaymentMethod::Cod) => {
                self.step = CheckoutStep::Confirm;
                Ok(())
            }
            None => Err(DomainError::PaymentMethodMissing),
        }
    }

    /// Pay → Confirm. The user asserts the UPI payment was made externally;
    /// nothing is verified here.
    pub fn payment_done(&mut self) -> Result<(), DomainError> {
        self.require(CheckoutStep::Pay, CheckoutStep::Confirm)?;
        self.step = CheckoutStep::Confirm;
        Ok(())
    }

    /// Records the user-supplied transaction reference. Whitespace is
    /// trimmed; an effectively empty value clears the field.
    pub fn set_transaction_id(&mut self, value: &str) {
        let trimmed = value.trim();
        self.transaction_id = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Moves one step back without dropping captured data.
    pub fn back(&mut self) -> Result<(), DomainError> {
        self.step = match (self.step, self.payment_method) {
            (CheckoutStep::Confirm, Some(PaymentMethod::Upi)) => CheckoutStep::Pay,
            (CheckoutStep::Confirm, _) => CheckoutStep::Method,
            (CheckoutStep::Pay, _) => CheckoutStep::Method,
            (CheckoutStep::Method, _) => CheckoutStep::Review,
            (from, _) => {
                return Err(DomainError::InvalidTransition {
                    from,
                    to: CheckoutStep::Review,
                })
            }
        };
        Ok(())
    }

    /// Validates the attempt against the cart and produces the immutable
    /// submission payload. Only valid at Confirm; for UPI a non-empty
    /// transaction id must have been captured. COD submissions never carry a
    /// transaction id, even if one was entered earlier.
    pub fn build_submission(&self, cart: &Cart) -> Result<OrderSubmission, DomainError> {
        self.require(CheckoutStep::Confirm, CheckoutStep::Submitted)?;
        let method = self.payment_method.ok_or(DomainError::PaymentMethodMissing)?;
        if cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }
        let total = cart.total();
        if total <= BigDecimal::zero() {
            return Err(DomainError::NonPositiveTotal);
        }
        let transaction_id = match method {
            PaymentMethod::Upi => match &self.transaction_id {
                Some(id) => Some(id.clone()),
                None => return Err(DomainError::TransactionIdMissing),
            },
            PaymentMethod::Cod => None,
        };
        Ok(OrderSubmission {
            lines: cart.lines().to_vec(),
            total,
            payment_method: method,
            transaction_id,
        })
    }

    /// Confirm → Submitted, once the gateway has reported success.
    pub fn mark_submitted(&mut self) -> Result<(), DomainError> {
        self.require(CheckoutStep::Confirm, CheckoutStep::Submitted)?;
        self.step = CheckoutStep::Submitted;
        Ok(())
    }

    fn require(&self, expected: CheckoutStep, to: CheckoutStep) -> Result<(), DomainError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: self.step,
                to,
            })
        }
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}
