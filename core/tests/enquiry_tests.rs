// tests/enquiry_tests.rs
mod common;

use common::*;
use serial_test::serial;
use spokehub::{ContactMessage, EnquiryDesk, IntegrationRequest, ValidationError};
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn contact_form_reaches_the_operator() {
  setup_tracing();
  let notifier = Arc::new(RecordingNotifier::new(true));
  let desk = EnquiryDesk::new(notifier.clone());

  let delivered = desk
    .submit_contact(&ContactMessage {
      name: "Priya".to_string(),
      email: "priya@example.org".to_string(),
      message: "Do you support Freshdesk as a hub?".to_string(),
    })
    .await
    .unwrap();

  assert!(delivered);
  assert_eq!(notifier.titles(), vec!["New Contact Form Submission from Priya"]);
  assert!(notifier.last_content().unwrap().contains("Freshdesk"));
}

#[tokio::test]
#[serial]
async fn invalid_contact_form_is_not_sent() {
  setup_tracing();
  let notifier = Arc::new(RecordingNotifier::new(true));
  let desk = EnquiryDesk::new(notifier.clone());

  let err = desk
    .submit_contact(&ContactMessage {
      name: "Priya".to_string(),
      email: "priya@example".to_string(),
      message: "Long enough message".to_string(),
    })
    .await
    .unwrap_err();

  assert!(matches!(err, ValidationError::InvalidEmail { .. }));
  assert_eq!(notifier.count(), 0);
}

#[tokio::test]
#[serial]
async fn undelivered_enquiry_reports_false() {
  setup_tracing();
  let notifier = Arc::new(RecordingNotifier::new(false));
  let desk = EnquiryDesk::new(notifier.clone());

  let delivered = desk
    .submit_integration_request(&IntegrationRequest {
      vendor_name: "Freshdesk".to_string(),
      category: "ITSM".to_string(),
      use_case: "Mirror tickets into HubSpot".to_string(),
      email: "it@example.org".to_string(),
    })
    .await
    .unwrap();

  assert!(!delivered);
  assert_eq!(notifier.titles(), vec!["New Integration Request: Freshdesk"]);
}
