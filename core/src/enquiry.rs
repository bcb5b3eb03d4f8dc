// spokehub/src/enquiry.rs

//! Contact-form messages and requests for integrations not yet in the catalog.
//! Both are validated, then forwarded to the operator inbox; nothing is stored.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::error::ValidationError;
use crate::notify::{render, Notifier};
use crate::purchase::input::{email, required};

pub const MIN_MESSAGE_LEN: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactMessage {
  pub name: String,
  pub email: String,
  pub message: String,
}

impl ContactMessage {
  pub fn validate(&self) -> Result<ContactMessage, ValidationError> {
    let message = self.message.trim();
    if message.chars().count() < MIN_MESSAGE_LEN {
      return Err(ValidationError::TooShort {
        field: "message",
        min: MIN_MESSAGE_LEN,
      });
    }
    Ok(ContactMessage {
      name: required("name", &self.name)?,
      email: email(&self.email)?,
      message: message.to_string(),
    })
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationRequest {
  pub vendor_name: String,
  pub category: String,
  pub use_case: String,
  pub email: String,
}

impl IntegrationRequest {
  pub fn validate(&self) -> Result<IntegrationRequest, ValidationError> {
    Ok(IntegrationRequest {
      vendor_name: required("vendor name", &self.vendor_name)?,
      category: required("category", &self.category)?,
      use_case: required("use case", &self.use_case)?,
      email: email(&self.email)?,
    })
  }
}

/// Forwards enquiries to the operator.
#[derive(Clone)]
pub struct EnquiryDesk {
  notifier: Arc<dyn Notifier>,
}

impl EnquiryDesk {
  pub fn new(notifier: Arc<dyn Notifier>) -> Self {
    Self { notifier }
  }

  /// Returns whether the operator email went out.
  #[instrument(name = "enquiry::contact", skip_all, fields(email = %input.email))]
  pub async fn submit_contact(&self, input: &ContactMessage) -> Result<bool, ValidationError> {
    let message = input.validate()?;
    let note = render::contact_message(&message);
    let delivered = self.notifier.notify(&note.title, &note.content).await;
    if delivered {
      info!("Contact form forwarded.");
    } else {
      warn!("Contact form notification was not delivered.");
    }
    Ok(delivered)
  }

  #[instrument(name = "enquiry::integration_request", skip_all, fields(vendor = %input.vendor_name))]
  pub async fn submit_integration_request(&self, input: &IntegrationRequest) -> Result<bool, ValidationError> {
    let request = input.validate()?;
    let note = render::integration_request(&request);
    let delivered = self.notifier.notify(&note.title, &note.content).await;
    if delivered {
      info!("Integration request forwarded.");
    } else {
      warn!("Integration request notification was not delivered.");
    }
    Ok(delivered)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn short_messages_are_rejected() {
    let msg = ContactMessage {
      name: "Lee".into(),
      email: "lee@example.com".into(),
      message: " too short ".into(),
    };
    assert_eq!(
      msg.validate().unwrap_err(),
      ValidationError::TooShort {
        field: "message",
        min: MIN_MESSAGE_LEN
      }
    );
  }

  #[test]
  fn integration_request_needs_every_field() {
    let req = IntegrationRequest {
      vendor_name: "Zendesk".into(),
      category: "".into(),
      use_case: "Sync tickets".into(),
      email: "ops@acme.com".into(),
    };
    assert_eq!(
      req.validate().unwrap_err(),
      ValidationError::MissingField { field: "category" }
    );
  }
}
