// spokehub_server/src/web/handlers/enquiry_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use spokehub::{ContactMessage, IntegrationRequest};

/// `success` is whether the operator email went out; a validation failure is a 400.
#[instrument(name = "handler::contact", skip(app_state, payload))]
pub async fn contact_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ContactMessage>,
) -> Result<HttpResponse, AppError> {
  let delivered = app_state.enquiries.submit_contact(&payload).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": delivered })))
}

#[instrument(name = "handler::integration_request", skip(app_state, payload), fields(vendor = %payload.vendor_name))]
pub async fn integration_request_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<IntegrationRequest>,
) -> Result<HttpResponse, AppError> {
  let delivered = app_state.enquiries.submit_integration_request(&payload).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": delivered })))
}
