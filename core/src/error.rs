// spokehub/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::CatalogError;
use crate::payment::PaymentError;
use crate::purchase::{PaymentStatus, PurchaseStep};

/// Input problems caught before any store call or notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{field} is required")]
  MissingField { field: &'static str },

  #[error("'{value}' is not a valid email address")]
  InvalidEmail { value: String },

  #[error("Select at least one data type")]
  NoDataTypes,

  #[error("Unknown data type '{label}'")]
  UnknownDataType { label: String },

  #[error("Select a plan to continue")]
  NoPlanSelected,

  #[error("Plan '{plan_id}' is not available")]
  UnknownPlan { plan_id: String },

  #[error("The terms and conditions must be accepted to continue")]
  TermsNotAccepted,

  #[error("'{value}' is not a valid {field} id")]
  InvalidId { field: &'static str, value: String },

  #[error("{field} must be at least {min} characters")]
  TooShort { field: &'static str, min: usize },

  #[error("Unknown {kind} '{value}'")]
  UnknownVariant { kind: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum FlowError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("Purchase {id} was not found. Please start over.")]
  PurchaseNotFound { id: Uuid },

  #[error("Purchase {id} is at '{current}'; complete the earlier steps before '{requested}'")]
  StepOutOfOrder {
    id: Uuid,
    current: PurchaseStep,
    requested: PurchaseStep,
  },

  #[error("Purchase {id} is already closed ({step})")]
  PurchaseClosed { id: Uuid, step: PurchaseStep },

  #[error("Purchase {id} is not awaiting a payment outcome (step '{step}', payment {status})")]
  NotAwaitingPayment {
    id: Uuid,
    step: PurchaseStep,
    status: PaymentStatus,
  },

  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error("Could not save the purchase. Please try again. Source: {source}")]
  Persistence {
    #[source]
    source: AnyhowError,
  },

  #[error(transparent)]
  Payment(#[from] PaymentError),

  #[error("Handler missing for required step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Internal flow error: {0}")]
  Internal(String),
}

impl FlowError {
  pub fn is_validation(&self) -> bool {
    matches!(self, FlowError::Validation(_))
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
