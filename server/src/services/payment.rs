// spokehub_server/src/services/payment.rs

//! Hosted checkout through the Stripe Checkout Sessions API.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use spokehub::{CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentGateway};
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct SessionResponse {
  id: String,
  url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StripeCheckoutGateway {
  client: reqwest::Client,
  api_base: String,
  secret_key: String,
}

/// Whole minor units (cents) for a two-decimal currency amount.
/// Whole cents only; a sub-cent price is refused rather than rounded.
fn minor_units(amount: Decimal) -> Result<i64, PaymentError> {
  let cents = amount * Decimal::ONE_HUNDRED;
  if !cents.fract().is_zero() {
    return Err(PaymentError::InvalidAmount(amount.to_string()));
  }
  cents
    .to_i64()
    .filter(|units| *units > 0)
    .ok_or_else(|| PaymentError::InvalidAmount(amount.to_string()))
}

fn session_form(request: &CheckoutSessionRequest) -> Result<Vec<(&'static str, String)>, PaymentError> {
  Ok(vec![
    ("mode", "payment".to_string()),
    ("success_url", request.success_url.clone()),
    ("cancel_url", request.cancel_url.clone()),
    ("customer_email", request.customer_email.clone()),
    ("client_reference_id", request.purchase_id.to_string()),
    ("metadata[purchase_id]", request.purchase_id.to_string()),
    ("line_items[0][quantity]", "1".to_string()),
    ("line_items[0][price_data][currency]", request.currency.to_lowercase()),
    ("line_items[0][price_data][product_data][name]", request.tier_name.clone()),
    (
      "line_items[0][price_data][unit_amount]",
      minor_units(request.amount)?.to_string(),
    ),
  ])
}

impl StripeCheckoutGateway {
  pub fn new(api_base: &str, secret_key: impl Into<String>) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(Duration::from_secs(20)).build()?;
    Ok(Self {
      client,
      api_base: api_base.trim_end_matches('/').to_string(),
      secret_key: secret_key.into(),
    })
  }
}

#[async_trait]
impl PaymentGateway for StripeCheckoutGateway {
  #[instrument(name = "stripe::create_checkout_session", skip_all, fields(purchase_id = %request.purchase_id, amount = %request.amount))]
  async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<CheckoutSession, PaymentError> {
    let form = session_form(request)?;
    let response = self
      .client
      .post(format!("{}/v1/checkout/sessions", self.api_base))
      .bearer_auth(&self.secret_key)
      .form(&form)
      .send()
      .await
      .map_err(|e| PaymentError::Provider(format!("checkout provider unreachable: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
      let message = response
        .json::<ErrorEnvelope>()
        .await
        .ok()
        .and_then(|env| env.error.message)
        .unwrap_or_else(|| format!("HTTP {}", status));
      warn!(%status, %message, "Checkout session request rejected.");
      return Err(PaymentError::Provider(message));
    }

    let session: SessionResponse = response
      .json()
      .await
      .map_err(|e| PaymentError::Provider(format!("unreadable checkout session: {}", e)))?;
    let url = session
      .url
      .ok_or_else(|| PaymentError::Provider(format!("checkout session {} has no redirect url", session.id)))?;
    info!(session_id = %session.id, "Checkout session created.");
    Ok(CheckoutSession { id: session.id, url })
  }
}
