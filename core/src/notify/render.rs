// spokehub/src/notify/render.rs

//! Operator-facing message bodies. Plain markdown-ish text; the email adapter
//! decides how to wrap it.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt::Write;

use crate::enquiry::{ContactMessage, IntegrationRequest};
use crate::purchase::{DataType, Purchase, PurchaseStep};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
  pub title: String,
  pub content: String,
}

/// Extra context attached to the step-5 message, one per checkout path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutNotice {
  /// Customer chose hosted checkout; sent before the session is requested.
  Initiated,
  /// Customer asked for a bespoke proposal.
  PendingContact,
}

impl CheckoutNotice {
  pub fn payment_method(self) -> &'static str {
    match self {
      CheckoutNotice::Initiated => "Hosted Checkout",
      CheckoutNotice::PendingContact => "Manual/Bespoke Proposal",
    }
  }

  pub fn payment_status(self) -> &'static str {
    match self {
      CheckoutNotice::Initiated => "Initiated",
      CheckoutNotice::PendingContact => "Pending Contact",
    }
  }
}

fn or_na(value: Option<&str>) -> &str {
  match value {
    Some(v) if !v.is_empty() => v,
    _ => "N/A",
  }
}

fn timestamp(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn amount_line(purchase: &Purchase) -> String {
  format!(
    "{} {}",
    purchase.payment_currency.as_deref().unwrap_or("USD"),
    purchase.payment_amount.as_deref().unwrap_or("N/A")
  )
}

fn yes_no(flag: bool) -> &'static str {
  if flag {
    "Yes"
  } else {
    "No"
  }
}

/// The message sent after `step` has been submitted for `purchase`.
///
/// Sections accumulate: the step-3 message repeats the contact and data-type
/// sections so each email stands on its own.
pub fn step_notification(
  step: PurchaseStep,
  purchase: &Purchase,
  notice: Option<CheckoutNotice>,
  now: DateTime<Utc>,
) -> Notification {
  let number = step.number();
  let title = format!(
    "Purchase Flow Step {}: {} - {} ↔ {}",
    number,
    step.title(),
    purchase.hub_vendor_name,
    purchase.spoke_integration_name
  );

  let mut content = String::new();
  // Writing into a String cannot fail.
  let _ = write!(
    content,
    "**Purchase Flow Progress - Step {number}/5**\n\n---\n\n\
     **Step:** {}\n**Purchase ID:** {}\n\n\
     **Integration:**\n- Hub Vendor: {}\n- Spoke Integration: {}\n\n\
     **Customer:**\n- Name: {}\n- Email: {}\n",
    step.title(),
    purchase.id,
    purchase.hub_vendor_name,
    purchase.spoke_integration_name,
    purchase.customer_name,
    purchase.customer_email,
  );

  if number >= 2 && !purchase.selected_data_types.is_empty() {
    let _ = write!(
      content,
      "\n**Data Types Selected:**\n{}\n",
      DataType::join(&purchase.selected_data_types).replace(',', ", ")
    );
    if !purchase.other_data_types.is_empty() {
      let _ = write!(content, "\nOther: {}\n", purchase.other_data_types);
    }
  }

  if number >= 3 {
    let _ = write!(
      content,
      "\n**Tariff Details:**\n- Pricing Tier: {}\n- Selected Plan: {}\n- Price: {}\n",
      or_na(purchase.pricing_tier.as_deref()),
      or_na(purchase.selected_plan.as_deref()),
      amount_line(purchase),
    );
  }

  if number >= 4 {
    let _ = write!(
      content,
      "\n**Terms & Conditions:**\n- Accepted: {}\n- Accepted At: {}\n",
      yes_no(purchase.terms_accepted),
      purchase
        .terms_accepted_at
        .map(timestamp)
        .unwrap_or_else(|| "N/A".to_string()),
    );
  }

  if number >= 5 {
    let _ = write!(
      content,
      "\n**Payment:**\n- Status: {}\n- Amount: {}\n- Checkout Session: {}\n",
      purchase.payment_status,
      amount_line(purchase),
      purchase.checkout_session_id.as_deref().unwrap_or("Manual/Bespoke"),
    );
  }

  if let Some(notice) = notice {
    let _ = write!(
      content,
      "\n**Additional Information:**\n- Payment Method: {}\n- Payment Status: {}\n",
      notice.payment_method(),
      notice.payment_status(),
    );
  }

  let _ = write!(content, "\n---\n\nTimestamp: {}", timestamp(now));

  Notification { title, content }
}

/// Full hand-off summary, sent once payment is confirmed.
pub fn purchase_summary(purchase: &Purchase) -> Notification {
  let title = format!(
    "New Integration Purchase: {} ↔ {}",
    purchase.hub_vendor_name, purchase.spoke_integration_name
  );

  let data_types = if purchase.selected_data_types.is_empty() {
    "None".to_string()
  } else {
    DataType::join(&purchase.selected_data_types).replace(',', ", ")
  };

  let mut content = String::new();
  let _ = write!(
    content,
    "**New Purchase Notification**\n\n---\n\n\
     **Integration Details:**\n- Hub Vendor: {}\n- Spoke Integration: {}\n- Purchase ID: {}\n\n\
     **Customer Information:**\n- Name: {}\n- Email: {}\n\n\
     **Requirements:**\n- Data Types: {}\n- Other Data Types: {}\n- Pricing Tier: {}\n- Selected Plan: {}\n\n\
     **Payment Information:**\n- Amount: {}\n- Status: {}\n- Method: {}\n- Checkout Session: {}\n- Paid At: {}\n\n\
     **Terms Accepted:** {}\n",
    purchase.hub_vendor_name,
    purchase.spoke_integration_name,
    purchase.id,
    purchase.customer_name,
    purchase.customer_email,
    data_types,
    or_na(Some(purchase.other_data_types.as_str())),
    or_na(purchase.pricing_tier.as_deref()),
    or_na(purchase.selected_plan.as_deref()),
    amount_line(purchase),
    purchase.payment_status,
    purchase.payment_method.map(|m| m.as_str()).unwrap_or("N/A"),
    purchase.checkout_session_id.as_deref().unwrap_or("Pending"),
    purchase.paid_at.map(timestamp).unwrap_or_else(|| "Pending".to_string()),
    yes_no(purchase.terms_accepted),
  );
  if let Some(at) = purchase.terms_accepted_at {
    let _ = writeln!(content, "Accepted At: {}", timestamp(at));
  }
  let _ = write!(
    content,
    "\n---\n\n**Next Steps:**\n\
     1. Review the customer requirements\n\
     2. Set up the integration environment\n\
     3. Contact the customer at {}\n\
     4. Schedule onboarding call\n\n\
     Template ID: {}\nTimestamp: {}",
    purchase.customer_email,
    purchase.template_id,
    timestamp(purchase.updated_at),
  );

  Notification { title, content }
}

pub fn contact_message(message: &ContactMessage) -> Notification {
  Notification {
    title: format!("New Contact Form Submission from {}", message.name),
    content: format!(
      "**Contact Form Submission**\n\n- Name: {}\n- Email: {}\n\n**Message:**\n{}",
      message.name, message.email, message.message
    ),
  }
}

pub fn integration_request(request: &IntegrationRequest) -> Notification {
  Notification {
    title: format!("New Integration Request: {}", request.vendor_name),
    content: format!(
      "**New Integration Request**\n\nA new integration request has been submitted:\n\n\
       - Vendor Name: {}\n- Category: {}\n- Contact Email: {}\n\n**Use Case:**\n{}",
      request.vendor_name, request.category, request.email, request.use_case
    ),
  }
}
