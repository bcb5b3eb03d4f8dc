// spokehub/src/purchase/step.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Position of a purchase in the wizard: the step the customer is expected to
/// submit next, or one of the two terminal outcomes of checkout.
///
/// Variant order is the wizard order, so `Ord` answers "has step k been reached".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStep {
  ContactInfo,
  DataTypes,
  Plan,
  Terms,
  Payment,
  Redirected,
  ManualPending,
}

impl PurchaseStep {
  /// 1-based wizard number. Both terminal outcomes belong to step 5.
  pub fn number(self) -> u8 {
    match self {
      PurchaseStep::ContactInfo => 1,
      PurchaseStep::DataTypes => 2,
      PurchaseStep::Plan => 3,
      PurchaseStep::Terms => 4,
      PurchaseStep::Payment | PurchaseStep::Redirected | PurchaseStep::ManualPending => 5,
    }
  }

  pub fn title(self) -> &'static str {
    match self.number() {
      1 => "Contact Information",
      2 => "Data Types Selection",
      3 => "Pricing Plan Selection",
      4 => "Terms Acceptance",
      _ => "Payment",
    }
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, PurchaseStep::Redirected | PurchaseStep::ManualPending)
  }

  /// The step that follows a successful submission of `self`. Terminal steps
  /// have no successor.
  pub fn next(self) -> Option<PurchaseStep> {
    match self {
      PurchaseStep::ContactInfo => Some(PurchaseStep::DataTypes),
      PurchaseStep::DataTypes => Some(PurchaseStep::Plan),
      PurchaseStep::Plan => Some(PurchaseStep::Terms),
      PurchaseStep::Terms => Some(PurchaseStep::Payment),
      PurchaseStep::Payment | PurchaseStep::Redirected | PurchaseStep::ManualPending => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      PurchaseStep::ContactInfo => "contact_info",
      PurchaseStep::DataTypes => "data_types",
      PurchaseStep::Plan => "plan",
      PurchaseStep::Terms => "terms",
      PurchaseStep::Payment => "payment",
      PurchaseStep::Redirected => "redirected",
      PurchaseStep::ManualPending => "manual_pending",
    }
  }
}

impl fmt::Display for PurchaseStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PurchaseStep {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "contact_info" => Ok(PurchaseStep::ContactInfo),
      "data_types" => Ok(PurchaseStep::DataTypes),
      "plan" => Ok(PurchaseStep::Plan),
      "terms" => Ok(PurchaseStep::Terms),
      "payment" => Ok(PurchaseStep::Payment),
      "redirected" => Ok(PurchaseStep::Redirected),
      "manual_pending" => Ok(PurchaseStep::ManualPending),
      other => Err(ValidationError::UnknownVariant {
        kind: "purchase step",
        value: other.to_string(),
      }),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  #[default]
  Pending,
  Completed,
  Failed,
}

impl PaymentStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      PaymentStatus::Pending => "pending",
      PaymentStatus::Completed => "completed",
      PaymentStatus::Failed => "failed",
    }
  }
}

impl fmt::Display for PaymentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PaymentStatus {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(PaymentStatus::Pending),
      "completed" => Ok(PaymentStatus::Completed),
      "failed" => Ok(PaymentStatus::Failed),
      other => Err(ValidationError::UnknownVariant {
        kind: "payment status",
        value: other.to_string(),
      }),
    }
  }
}

/// How step 5 is completed: hosted gateway checkout or a human follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
  Gateway,
  Manual,
}

impl PaymentMethod {
  pub fn as_str(self) -> &'static str {
    match self {
      PaymentMethod::Gateway => "gateway",
      PaymentMethod::Manual => "manual",
    }
  }
}

impl fmt::Display for PaymentMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PaymentMethod {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "gateway" => Ok(PaymentMethod::Gateway),
      "manual" => Ok(PaymentMethod::Manual),
      other => Err(ValidationError::UnknownVariant {
        kind: "payment method",
        value: other.to_string(),
      }),
    }
  }
}
