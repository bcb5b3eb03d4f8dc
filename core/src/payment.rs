// spokehub/src/payment.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
  /// No gateway credentials. The message is shown to the customer as-is.
  #[error("Payment processing is not yet configured. Please contact us at {contact} to complete your purchase.")]
  NotConfigured { contact: String },

  #[error("The payment provider rejected the checkout request: {0}")]
  Provider(String),

  #[error("Cannot start checkout without a valid price (got '{0}')")]
  InvalidAmount(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
  pub purchase_id: Uuid,
  /// Line-item name shown on the hosted page.
  pub tier_name: String,
  pub amount: Decimal,
  pub currency: String,
  pub customer_email: String,
  pub success_url: String,
  pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
  pub id: String,
  pub url: String,
}

/// Mints hosted checkout sessions.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<CheckoutSession, PaymentError>;
}

/// The gateway used when no credentials are configured: every request fails
/// with [`PaymentError::NotConfigured`] pointing at a human contact.
#[derive(Debug, Clone)]
pub struct UnconfiguredPaymentGateway {
  contact: String,
}

impl UnconfiguredPaymentGateway {
  pub fn new(contact: impl Into<String>) -> Self {
    Self { contact: contact.into() }
  }
}

#[async_trait]
impl PaymentGateway for UnconfiguredPaymentGateway {
  async fn create_checkout_session(&self, _request: &CheckoutSessionRequest) -> Result<CheckoutSession, PaymentError> {
    Err(PaymentError::NotConfigured {
      contact: self.contact.clone(),
    })
  }
}
