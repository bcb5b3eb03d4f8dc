// spokehub/src/purchase/model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_type::DataType;
use super::step::{PaymentMethod, PaymentStatus, PurchaseStep};

/// One customer's progress through the purchase wizard.
///
/// Fields fill in step by step; everything after step 1 is optional until the
/// matching step has been submitted. `payment_amount` is a two-decimal snapshot
/// of the plan price taken when the plan was chosen and is never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
  pub id: Uuid,
  pub step: PurchaseStep,

  pub hub_vendor_id: String,
  pub hub_vendor_name: String,
  pub spoke_integration_id: String,
  pub spoke_integration_name: String,
  pub customer_name: String,
  pub customer_email: String,

  pub selected_data_types: Vec<DataType>,
  pub other_data_types: String,

  pub selected_plan: Option<String>,
  pub pricing_tier: Option<String>,
  pub payment_amount: Option<String>,
  pub payment_currency: Option<String>,

  pub terms_accepted: bool,
  pub terms_accepted_at: Option<DateTime<Utc>>,

  pub payment_status: PaymentStatus,
  pub payment_method: Option<PaymentMethod>,
  pub checkout_session_id: Option<String>,
  pub paid_at: Option<DateTime<Utc>>,

  pub template_id: String,
  pub notification_sent: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Step-1 fields plus the id the flow generated for the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchase {
  pub id: Uuid,
  pub hub_vendor_id: String,
  pub hub_vendor_name: String,
  pub spoke_integration_id: String,
  pub spoke_integration_name: String,
  pub customer_name: String,
  pub customer_email: String,
  pub template_id: String,
}

impl NewPurchase {
  /// The record as it looks right after creation.
  pub fn into_purchase(self, now: DateTime<Utc>) -> Purchase {
    Purchase {
      id: self.id,
      step: PurchaseStep::DataTypes,
      hub_vendor_id: self.hub_vendor_id,
      hub_vendor_name: self.hub_vendor_name,
      spoke_integration_id: self.spoke_integration_id,
      spoke_integration_name: self.spoke_integration_name,
      customer_name: self.customer_name,
      customer_email: self.customer_email,
      selected_data_types: Vec::new(),
      other_data_types: String::new(),
      selected_plan: None,
      pricing_tier: None,
      payment_amount: None,
      payment_currency: None,
      terms_accepted: false,
      terms_accepted_at: None,
      payment_status: PaymentStatus::Pending,
      payment_method: None,
      checkout_session_id: None,
      paid_at: None,
      template_id: self.template_id,
      notification_sent: false,
      created_at: now,
      updated_at: now,
    }
  }
}

/// A partial update: only `Some` fields change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchasePatch {
  pub step: Option<PurchaseStep>,
  pub selected_data_types: Option<Vec<DataType>>,
  pub other_data_types: Option<String>,
  pub selected_plan: Option<String>,
  pub pricing_tier: Option<String>,
  pub payment_amount: Option<String>,
  pub payment_currency: Option<String>,
  pub terms_accepted: Option<bool>,
  pub terms_accepted_at: Option<DateTime<Utc>>,
  pub payment_status: Option<PaymentStatus>,
  pub payment_method: Option<PaymentMethod>,
  pub checkout_session_id: Option<String>,
  pub paid_at: Option<DateTime<Utc>>,
  pub notification_sent: Option<bool>,
}

impl Purchase {
  /// Applies `patch` in place and stamps `updated_at`.
  pub fn apply(&mut self, patch: &PurchasePatch, now: DateTime<Utc>) {
    if let Some(step) = patch.step {
      self.step = step;
    }
    if let Some(types) = &patch.selected_data_types {
      self.selected_data_types = types.clone();
    }
    if let Some(note) = &patch.other_data_types {
      self.other_data_types = note.clone();
    }
    if let Some(plan) = &patch.selected_plan {
      self.selected_plan = Some(plan.clone());
    }
    if let Some(tier) = &patch.pricing_tier {
      self.pricing_tier = Some(tier.clone());
    }
    if let Some(amount) = &patch.payment_amount {
      self.payment_amount = Some(amount.clone());
    }
    if let Some(currency) = &patch.payment_currency {
      self.payment_currency = Some(currency.clone());
    }
    if let Some(accepted) = patch.terms_accepted {
      self.terms_accepted = accepted;
    }
    if let Some(at) = patch.terms_accepted_at {
      self.terms_accepted_at = Some(at);
    }
    if let Some(status) = patch.payment_status {
      self.payment_status = status;
    }
    if let Some(method) = patch.payment_method {
      self.payment_method = Some(method);
    }
    if let Some(session) = &patch.checkout_session_id {
      self.checkout_session_id = Some(session.clone());
    }
    if let Some(at) = patch.paid_at {
      self.paid_at = Some(at);
    }
    if let Some(sent) = patch.notification_sent {
      self.notification_sent = sent;
    }
    self.updated_at = now;
  }
}
