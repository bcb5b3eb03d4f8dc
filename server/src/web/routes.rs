// spokehub_server/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{catalog_handlers, enquiry_handlers, purchase_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // Catalog (read-only, cached)
      .service(
        web::scope("/catalog")
          .route("/hub-vendors", web::get().to(catalog_handlers::list_hub_vendors_handler))
          // Registered before `{id}` so "default" is not taken as an id.
          .route(
            "/hub-vendors/default",
            web::get().to(catalog_handlers::default_hub_vendor_handler),
          )
          .route("/hub-vendors/{id}", web::get().to(catalog_handlers::get_hub_vendor_handler))
          .route("/hub-vendors/{id}/spokes", web::get().to(catalog_handlers::hub_spokes_handler))
          .route("/branding", web::get().to(catalog_handlers::branding_handler))
          .route("/pricing", web::get().to(catalog_handlers::pricing_handler)),
      )
      // Purchase wizard
      .service(
        web::scope("/purchases")
          .route("", web::post().to(purchase_handlers::begin_purchase_handler))
          .route("/{id}", web::get().to(purchase_handlers::get_purchase_handler))
          .route("/{id}/summary", web::get().to(purchase_handlers::purchase_summary_handler))
          .route("/{id}/data-types", web::put().to(purchase_handlers::set_data_types_handler))
          .route("/{id}/plan", web::put().to(purchase_handlers::set_plan_handler))
          .route("/{id}/terms", web::put().to(purchase_handlers::accept_terms_handler))
          .route("/{id}/checkout", web::post().to(purchase_handlers::checkout_handler))
          .route(
            "/{id}/payment-outcome",
            web::post().to(purchase_handlers::payment_outcome_handler),
          ),
      )
      // Enquiries
      .route("/contact", web::post().to(enquiry_handlers::contact_handler))
      .route(
        "/integration-requests",
        web::post().to(enquiry_handlers::integration_request_handler),
      ),
  );
}
