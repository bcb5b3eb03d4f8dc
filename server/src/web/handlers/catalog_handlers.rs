// spokehub_server/src/web/handlers/catalog_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_hub_vendors", skip(app_state))]
pub async fn list_hub_vendors_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let hubs = app_state.flow.catalog().hub_vendors().await?;
  Ok(HttpResponse::Ok().json(hubs))
}

#[instrument(name = "handler::default_hub_vendor", skip(app_state))]
pub async fn default_hub_vendor_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let hub = app_state.flow.catalog().default_hub_vendor().await?;
  Ok(HttpResponse::Ok().json(hub))
}

#[instrument(name = "handler::get_hub_vendor", skip(app_state))]
pub async fn get_hub_vendor_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let hub = app_state.flow.catalog().hub_vendor(&path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(hub))
}

/// Spokes the hub can connect to, in catalog order.
#[instrument(name = "handler::hub_spokes", skip(app_state))]
pub async fn hub_spokes_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let spokes = app_state
    .flow
    .catalog()
    .spoke_integrations_for_hub(&path.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(spokes))
}

#[instrument(name = "handler::branding", skip(app_state))]
pub async fn branding_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(app_state.flow.catalog().branding().await?))
}

#[instrument(name = "handler::pricing", skip(app_state))]
pub async fn pricing_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(app_state.flow.catalog().pricing().await?))
}
