// spokehub_server/src/web/handlers/purchase_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use spokehub::purchase::CheckoutChoice;
use spokehub::{ContactDetails, DataTypeSelection, PaymentOutcome, PlanChoice, TermsAcceptance};

pub const OPERATOR_TOKEN_HEADER: &str = "X-Operator-Token";

#[derive(Debug, Deserialize)]
pub struct PaymentOutcomeRequest {
  pub outcome: PaymentOutcome,
}

/// Step 1. Answers 201 with the new purchase, now waiting for data types.
#[instrument(
  name = "handler::begin_purchase",
  skip(app_state, payload),
  fields(hub = %payload.hub_vendor_id, spoke = %payload.spoke_integration_id)
)]
pub async fn begin_purchase_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ContactDetails>,
) -> Result<HttpResponse, AppError> {
  let purchase = app_state.flow.begin(&payload).await?;
  Ok(HttpResponse::Created().json(purchase))
}

#[instrument(name = "handler::get_purchase", skip(app_state))]
pub async fn get_purchase_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let id = path.into_inner();
  match app_state.flow.get_purchase(id).await? {
    Some(purchase) => Ok(HttpResponse::Ok().json(purchase)),
    None => Err(AppError::NotFound(format!("Purchase {} was not found", id))),
  }
}

/// The operator hand-off summary shown on the confirmation page.
#[instrument(name = "handler::purchase_summary", skip(app_state))]
pub async fn purchase_summary_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let id = path.into_inner();
  let summary = app_state
    .flow
    .purchase_summary(id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Purchase {} was not found", id)))?;
  Ok(HttpResponse::Ok().json(summary))
}

#[instrument(name = "handler::set_data_types", skip(app_state, payload))]
pub async fn set_data_types_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<DataTypeSelection>,
) -> Result<HttpResponse, AppError> {
  let purchase = app_state.flow.set_data_types(path.into_inner(), &payload).await?;
  Ok(HttpResponse::Ok().json(purchase))
}

#[instrument(name = "handler::set_plan", skip(app_state, payload), fields(plan = %payload.plan_id))]
pub async fn set_plan_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<PlanChoice>,
) -> Result<HttpResponse, AppError> {
  let purchase = app_state.flow.set_plan(path.into_inner(), &payload).await?;
  Ok(HttpResponse::Ok().json(purchase))
}

#[instrument(name = "handler::accept_terms", skip(app_state, payload))]
pub async fn accept_terms_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<TermsAcceptance>,
) -> Result<HttpResponse, AppError> {
  let purchase = app_state.flow.accept_terms(path.into_inner(), payload.into_inner()).await?;
  Ok(HttpResponse::Ok().json(purchase))
}

/// Step 5. The body says which path: `{"method": "gateway"}` answers with a
/// redirect target, `{"method": "manual"}` with the pending purchase.
#[instrument(name = "handler::checkout", skip(app_state, payload), fields(method = %payload.method))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<CheckoutChoice>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state.flow.checkout(path.into_inner(), payload.method).await?;
  Ok(HttpResponse::Ok().json(outcome))
}

/// Compares without short-circuiting on the first differing byte.
fn tokens_match(presented: &str, expected: &str) -> bool {
  presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Operator-only. Refuses everything unless an operator token is configured
/// and presented.
fn check_operator(app_state: &AppState, req: &HttpRequest) -> Result<(), AppError> {
  let expected = app_state
    .config
    .operator_token
    .as_deref()
    .ok_or_else(|| AppError::Unauthorized("operator endpoints are disabled".to_string()))?;
  let presented = req
    .headers()
    .get(OPERATOR_TOKEN_HEADER)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default();
  if !tokens_match(presented, expected) {
    warn!("Operator token missing or wrong.");
    return Err(AppError::Unauthorized("invalid operator token".to_string()));
  }
  Ok(())
}

#[instrument(name = "handler::record_payment_outcome", skip(app_state, req, payload), fields(outcome = ?payload.outcome))]
pub async fn payment_outcome_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  path: web::Path<Uuid>,
  payload: web::Json<PaymentOutcomeRequest>,
) -> Result<HttpResponse, AppError> {
  check_operator(&app_state, &req)?;
  let purchase = app_state
    .flow
    .record_payment_outcome(path.into_inner(), payload.outcome)
    .await?;
  info!(purchase_id = %purchase.id, "Operator recorded payment outcome.");
  Ok(HttpResponse::Ok().json(purchase))
}
