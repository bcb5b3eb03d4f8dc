// spokehub_server/src/models/purchase.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use spokehub::{DataType, Purchase, ValidationError};

/// A row of the `purchases` table. Enums and the data type selection are
/// stored as text.
#[derive(Debug, Clone, FromRow)]
pub struct PurchaseRow {
  pub id: Uuid,
  pub step: String,
  pub hub_vendor_id: String,
  pub hub_vendor_name: String,
  pub spoke_integration_id: String,
  pub spoke_integration_name: String,
  pub customer_name: String,
  pub customer_email: String,
  pub selected_data_types: String,
  pub other_data_types: String,
  pub selected_plan: Option<String>,
  pub pricing_tier: Option<String>,
  pub payment_amount: Option<String>,
  pub payment_currency: Option<String>,
  pub terms_accepted: bool,
  pub terms_accepted_at: Option<DateTime<Utc>>,
  pub payment_status: String,
  pub payment_method: Option<String>,
  pub checkout_session_id: Option<String>,
  pub paid_at: Option<DateTime<Utc>>,
  pub template_id: String,
  pub notification_sent: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
  type Error = ValidationError;

  fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
    Ok(Purchase {
      id: row.id,
      step: row.step.parse()?,
      hub_vendor_id: row.hub_vendor_id,
      hub_vendor_name: row.hub_vendor_name,
      spoke_integration_id: row.spoke_integration_id,
      spoke_integration_name: row.spoke_integration_name,
      customer_name: row.customer_name,
      customer_email: row.customer_email,
      selected_data_types: DataType::split(&row.selected_data_types)?,
      other_data_types: row.other_data_types,
      selected_plan: row.selected_plan,
      pricing_tier: row.pricing_tier,
      payment_amount: row.payment_amount,
      payment_currency: row.payment_currency,
      terms_accepted: row.terms_accepted,
      terms_accepted_at: row.terms_accepted_at,
      payment_status: row.payment_status.parse()?,
      payment_method: row.payment_method.as_deref().map(str::parse::<spokehub::PaymentMethod>).transpose()?,
      checkout_session_id: row.checkout_session_id,
      paid_at: row.paid_at,
      template_id: row.template_id,
      notification_sent: row.notification_sent,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use spokehub::{PaymentMethod, PaymentStatus, PurchaseStep};

  fn row() -> PurchaseRow {
    let now = Utc::now();
    PurchaseRow {
      id: Uuid::new_v4(),
      step: "manual_pending".into(),
      hub_vendor_id: "hubspot".into(),
      hub_vendor_name: "HubSpot".into(),
      spoke_integration_id: "jira".into(),
      spoke_integration_name: "Jira".into(),
      customer_name: "Jane Doe".into(),
      customer_email: "jane@acme.com".into(),
      selected_data_types: "Contact,Tickets".into(),
      other_data_types: String::new(),
      selected_plan: Some("pro-monthly".into()),
      pricing_tier: Some("Pro".into()),
      payment_amount: Some("49.00".into()),
      payment_currency: Some("USD".into()),
      terms_accepted: true,
      terms_accepted_at: Some(now),
      payment_status: "pending".into(),
      payment_method: Some("manual".into()),
      checkout_session_id: None,
      paid_at: None,
      template_id: "multi-hub".into(),
      notification_sent: true,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn row_text_columns_become_domain_types() {
    let purchase = Purchase::try_from(row()).unwrap();
    assert_eq!(purchase.step, PurchaseStep::ManualPending);
    assert_eq!(purchase.selected_data_types, vec![DataType::Contact, DataType::Tickets]);
    assert_eq!(purchase.payment_status, PaymentStatus::Pending);
    assert_eq!(purchase.payment_method, Some(PaymentMethod::Manual));
  }

  #[test]
  fn corrupt_columns_are_rejected() {
    let mut bad = row();
    bad.step = "shipping".into();
    assert!(matches!(
      Purchase::try_from(bad),
      Err(ValidationError::UnknownVariant { .. })
    ));
  }
}
