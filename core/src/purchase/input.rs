// spokehub/src/purchase/input.rs

//! What the customer submits at each wizard step, and the checks applied
//! before anything is written or sent.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use super::data_type::DataType;
use super::step::PaymentMethod;
use crate::error::ValidationError;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> &'static Regex {
  static EMAIL: OnceLock<Regex> = OnceLock::new();
  // The pattern is a literal; a failure here is a typo caught by the tests below.
  EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

/// Catalog ids: ASCII letters, digits, `-` and `_`. They end up in file
/// names and return URLs, so nothing else is let through.
pub fn is_slug(id: &str) -> bool {
  !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// `local@domain.tld` shape check; no whitespace, exactly one `@`.
pub fn is_valid_email(candidate: &str) -> bool {
  email_regex().is_match(candidate)
}

pub(crate) fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(ValidationError::MissingField { field });
  }
  Ok(trimmed.to_string())
}

fn slug(field: &'static str, value: &str) -> Result<String, ValidationError> {
  let trimmed = required(field, value)?;
  if !is_slug(&trimmed) {
    return Err(ValidationError::InvalidId { field, value: trimmed });
  }
  Ok(trimmed)
}

pub(crate) fn email(value: &str) -> Result<String, ValidationError> {
  let trimmed = required("email", value)?;
  if !is_valid_email(&trimmed) {
    return Err(ValidationError::InvalidEmail { value: trimmed });
  }
  Ok(trimmed)
}

/// Step 1: who is buying, and which hub/spoke pair they opened the wizard for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
  pub hub_vendor_id: String,
  pub hub_vendor_name: String,
  pub spoke_integration_id: String,
  pub spoke_integration_name: String,
  pub customer_name: String,
  pub customer_email: String,
}

impl ContactDetails {
  /// Returns a trimmed copy when every field passes.
  pub fn validate(&self) -> Result<ContactDetails, ValidationError> {
    Ok(ContactDetails {
      hub_vendor_id: slug("hub vendor", &self.hub_vendor_id)?,
      hub_vendor_name: required("hub vendor name", &self.hub_vendor_name)?,
      spoke_integration_id: slug("spoke integration", &self.spoke_integration_id)?,
      spoke_integration_name: required("spoke integration name", &self.spoke_integration_name)?,
      customer_name: required("name", &self.customer_name)?,
      customer_email: email(&self.customer_email)?,
    })
  }
}

/// Step 2 as submitted: raw labels plus an optional free-text note.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTypeSelection {
  #[serde(default)]
  pub data_types: Vec<String>,
  #[serde(default)]
  pub other_data_types: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDataTypes {
  pub data_types: Vec<DataType>,
  pub other_data_types: String,
}

impl DataTypeSelection {
  pub fn validate(&self) -> Result<ValidDataTypes, ValidationError> {
    let data_types = DataType::parse_selection(&self.data_types)?;
    if data_types.is_empty() {
      return Err(ValidationError::NoDataTypes);
    }
    Ok(ValidDataTypes {
      data_types,
      other_data_types: self.other_data_types.as_deref().unwrap_or_default().trim().to_string(),
    })
  }
}

/// Step 3 as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanChoice {
  #[serde(default)]
  pub plan_id: String,
}

impl PlanChoice {
  pub fn validate(&self) -> Result<String, ValidationError> {
    let plan_id = self.plan_id.trim();
    if plan_id.is_empty() {
      return Err(ValidationError::NoPlanSelected);
    }
    Ok(plan_id.to_string())
  }
}

/// Step 4 as submitted.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsAcceptance {
  #[serde(default)]
  pub accepted: bool,
}

impl TermsAcceptance {
  pub fn validate(&self) -> Result<(), ValidationError> {
    if !self.accepted {
      return Err(ValidationError::TermsNotAccepted);
    }
    Ok(())
  }
}

/// Step 5: which checkout path the customer picked.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutChoice {
  pub method: PaymentMethod,
}
