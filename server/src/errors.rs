// spokehub_server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use spokehub::{CatalogError, FlowError, PaymentError, ValidationError};

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("Operator authentication failed: {0}")]
  Unauthorized(String),

  #[error("{0}")]
  NotFound(String),

  /// The request does not fit where the purchase currently is.
  #[error("{0}")]
  Conflict(String),

  /// Hosted checkout is unavailable; the message names a human contact.
  #[error("{0}")]
  PaymentUnavailable(String),

  #[error("{0}")]
  PaymentProvider(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Purchase flow error: {source}")]
  Flow {
    #[source]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<FlowError> for AppError {
  fn from(err: FlowError) -> Self {
    match err {
      FlowError::Validation(v) => AppError::Validation(v),
      FlowError::PurchaseNotFound { .. } => AppError::NotFound(err.to_string()),
      FlowError::StepOutOfOrder { .. } | FlowError::PurchaseClosed { .. } | FlowError::NotAwaitingPayment { .. } => {
        AppError::Conflict(err.to_string())
      }
      FlowError::Catalog(c) => AppError::from(c),
      FlowError::Payment(p) => AppError::from(p),
      other => AppError::Flow { source: other },
    }
  }
}

impl From<CatalogError> for AppError {
  fn from(err: CatalogError) -> Self {
    match err {
      CatalogError::NotFound { .. } => AppError::NotFound(err.to_string()),
      CatalogError::Load { .. } => AppError::Flow {
        source: FlowError::Catalog(err),
      },
    }
  }
}

impl From<PaymentError> for AppError {
  fn from(err: PaymentError) -> Self {
    match err {
      PaymentError::NotConfigured { .. } => AppError::PaymentUnavailable(err.to_string()),
      PaymentError::Provider(_) => AppError::PaymentProvider(err.to_string()),
      PaymentError::InvalidAmount(_) => AppError::Conflict(err.to_string()),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(db_err) => AppError::Sqlx(db_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::PaymentUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      AppError::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Flow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }

    let body = match self {
      AppError::Sqlx(_) => json!({"error": "Database operation failed"}),
      AppError::Config(m) => json!({"error": "Configuration issue", "detail": m}),
      AppError::Flow { source } => json!({"error": "Purchase processing error", "detail": source.to_string()}),
      AppError::Internal(m) => json!({"error": "An internal error occurred", "detail": m}),
      other => json!({"error": other.to_string()}),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
