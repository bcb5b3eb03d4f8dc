// tests/purchase_flow_tests.rs
mod common;

use chrono::Duration;
use common::*;
use serial_test::serial;
use spokehub::purchase::PurchaseStep;
use spokehub::{
  CheckoutOutcome, DataType, DataTypeSelection, FlowError, PaymentError, PaymentMethod, PaymentOutcome,
  PaymentStatus, PlanChoice, Purchase, PurchaseStore, TermsAcceptance, ValidationError,
};
use std::sync::Arc;
use uuid::Uuid;

fn types(labels: &[&str]) -> DataTypeSelection {
  DataTypeSelection {
    data_types: labels.iter().map(|s| s.to_string()).collect(),
    other_data_types: None,
  }
}

fn plan_choice(id: &str) -> PlanChoice {
  PlanChoice { plan_id: id.to_string() }
}

const ACCEPT: TermsAcceptance = TermsAcceptance { accepted: true };

/// Walks a fresh purchase through steps 1-4.
async fn purchase_at_payment(h: &Harness) -> Purchase {
  let p = h.flow.begin(&jane()).await.unwrap();
  h.flow.set_data_types(p.id, &types(&["Contact", "Tickets"])).await.unwrap();
  h.flow.set_plan(p.id, &plan_choice("pro-monthly")).await.unwrap();
  h.flow.accept_terms(p.id, ACCEPT).await.unwrap()
}

#[tokio::test]
#[serial]
async fn begin_creates_one_purchase_and_moves_to_data_types() {
  setup_tracing();
  let h = harness();

  let purchase = h.flow.begin(&jane()).await.unwrap();

  assert_eq!(h.store.len(), 1);
  assert_eq!(purchase.step, PurchaseStep::DataTypes);
  assert_eq!(purchase.customer_email, "jane@acme.com");
  assert_eq!(purchase.template_id, "multi-hub");
  assert_eq!(purchase.payment_status, PaymentStatus::Pending);
  assert!(purchase.notification_sent);
  assert_eq!(
    h.notifier.titles(),
    vec!["Purchase Flow Step 1: Contact Information - HubSpot ↔ Jira"]
  );
}

#[tokio::test]
#[serial]
async fn begin_with_bad_email_creates_nothing_and_sends_nothing() {
  setup_tracing();
  let h = harness();

  for bad in ["", "jane", "jane@acme", "jane doe@acme.com"] {
    let mut details = jane();
    details.customer_email = bad.to_string();
    let err = h.flow.begin(&details).await.unwrap_err();
    assert!(err.is_validation(), "{bad}: {err}");
  }

  let mut nameless = jane();
  nameless.customer_name = "  ".to_string();
  assert!(matches!(
    h.flow.begin(&nameless).await,
    Err(FlowError::Validation(ValidationError::MissingField { field: "name" }))
  ));

  assert_eq!(h.store.len(), 0);
  assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
#[serial]
async fn begin_rejects_ids_that_are_not_slugs() {
  setup_tracing();
  let h = harness();

  let mut injected = jane();
  injected.hub_vendor_id = "hub spot&x=1".to_string();
  assert!(matches!(
    h.flow.begin(&injected).await,
    Err(FlowError::Validation(ValidationError::InvalidId { field: "hub vendor", .. }))
  ));

  let mut fragment = jane();
  fragment.spoke_integration_id = "jira#frag".to_string();
  assert!(matches!(
    h.flow.begin(&fragment).await,
    Err(FlowError::Validation(ValidationError::InvalidId { field: "spoke integration", .. }))
  ));

  assert_eq!(h.store.len(), 0);
  assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
#[serial]
async fn begin_store_failure_assigns_no_id() {
  setup_tracing();
  let h = harness();
  h.store.fail_writes(true);

  let err = h.flow.begin(&jane()).await.unwrap_err();

  assert!(matches!(err, FlowError::Persistence { .. }));
  assert_eq!(h.store.len(), 0);
  assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
#[serial]
async fn resubmitting_begin_starts_a_second_purchase() {
  setup_tracing();
  let h = harness();
  let first = h.flow.begin(&jane()).await.unwrap();
  let second = h.flow.begin(&jane()).await.unwrap();
  assert_ne!(first.id, second.id);
  assert_eq!(h.store.len(), 2);
}

#[tokio::test]
#[serial]
async fn empty_data_type_selection_leaves_fields_unset() {
  setup_tracing();
  let h = harness();
  let p = h.flow.begin(&jane()).await.unwrap();
  let writes_before = h.store.writes();

  let err = h.flow.set_data_types(p.id, &types(&[])).await.unwrap_err();

  assert!(matches!(err, FlowError::Validation(ValidationError::NoDataTypes)));
  assert_eq!(h.store.writes(), writes_before);
  let stored = h.flow.get_purchase(p.id).await.unwrap().unwrap();
  assert!(stored.selected_data_types.is_empty());
  assert_eq!(stored.step, PurchaseStep::DataTypes);
}

#[tokio::test]
#[serial]
async fn unknown_data_type_label_is_rejected() {
  setup_tracing();
  let h = harness();
  let p = h.flow.begin(&jane()).await.unwrap();
  let err = h.flow.set_data_types(p.id, &types(&["Invoices"])).await.unwrap_err();
  assert!(matches!(
    err,
    FlowError::Validation(ValidationError::UnknownDataType { .. })
  ));
}

#[tokio::test]
#[serial]
async fn data_types_before_begin_are_rejected_without_creating_anything() {
  setup_tracing();
  let h = harness();

  // Empty selection: caught by validation before the id is even looked at.
  let err = h.flow.set_data_types(Uuid::new_v4(), &types(&[])).await.unwrap_err();
  assert!(err.is_validation());

  // Valid selection, unknown id: "start over".
  let err = h
    .flow
    .set_data_types(Uuid::new_v4(), &types(&["Contact"]))
    .await
    .unwrap_err();
  assert!(matches!(err, FlowError::PurchaseNotFound { .. }));
  assert!(err.to_string().contains("start over"));

  assert_eq!(h.store.len(), 0);
  assert_eq!(h.notifier.count(), 0);
}

#[tokio::test]
#[serial]
async fn unknown_plan_writes_no_price_snapshot() {
  setup_tracing();
  let h = harness();
  let p = h.flow.begin(&jane()).await.unwrap();
  h.flow.set_data_types(p.id, &types(&["Contact"])).await.unwrap();

  let err = h.flow.set_plan(p.id, &plan_choice("enterprise-yearly")).await.unwrap_err();
  assert!(matches!(
    err,
    FlowError::Validation(ValidationError::UnknownPlan { ref plan_id }) if plan_id == "enterprise-yearly"
  ));

  let err = h.flow.set_plan(p.id, &plan_choice("")).await.unwrap_err();
  assert!(matches!(err, FlowError::Validation(ValidationError::NoPlanSelected)));

  let stored = h.flow.get_purchase(p.id).await.unwrap().unwrap();
  assert!(stored.payment_amount.is_none());
  assert!(stored.selected_plan.is_none());
  assert_eq!(stored.step, PurchaseStep::Plan);
}

#[tokio::test]
#[serial]
async fn steps_cannot_be_skipped() {
  setup_tracing();
  let h = harness();
  let p = h.flow.begin(&jane()).await.unwrap();

  let err = h.flow.set_plan(p.id, &plan_choice("pro-monthly")).await.unwrap_err();
  assert!(matches!(
    err,
    FlowError::StepOutOfOrder {
      current: PurchaseStep::DataTypes,
      requested: PurchaseStep::Plan,
      ..
    }
  ));

  let err = h.flow.checkout(p.id, PaymentMethod::Manual).await.unwrap_err();
  assert!(matches!(err, FlowError::StepOutOfOrder { .. }));
}

#[tokio::test]
#[serial]
async fn unticked_terms_are_rejected_locally() {
  setup_tracing();
  let h = harness();
  let p = h.flow.begin(&jane()).await.unwrap();
  h.flow.set_data_types(p.id, &types(&["Contact"])).await.unwrap();
  h.flow.set_plan(p.id, &plan_choice("basic-monthly")).await.unwrap();
  let notes_before = h.notifier.count();

  let err = h
    .flow
    .accept_terms(p.id, TermsAcceptance { accepted: false })
    .await
    .unwrap_err();

  assert!(matches!(err, FlowError::Validation(ValidationError::TermsNotAccepted)));
  assert_eq!(h.notifier.count(), notes_before);
  let stored = h.flow.get_purchase(p.id).await.unwrap().unwrap();
  assert!(!stored.terms_accepted);
  assert_eq!(stored.step, PurchaseStep::Terms);
}

#[tokio::test]
#[serial]
async fn terms_store_failure_blocks_advancement() {
  setup_tracing();
  let h = harness();
  let p = h.flow.begin(&jane()).await.unwrap();
  h.flow.set_data_types(p.id, &types(&["Contact"])).await.unwrap();
  h.flow.set_plan(p.id, &plan_choice("basic-monthly")).await.unwrap();

  h.store.fail_writes(true);
  let err = h.flow.accept_terms(p.id, ACCEPT).await.unwrap_err();
  h.store.fail_writes(false);

  assert!(matches!(err, FlowError::Persistence { .. }));
  let stored = h.flow.get_purchase(p.id).await.unwrap().unwrap();
  assert_eq!(stored.step, PurchaseStep::Terms);
  assert!(stored.terms_accepted_at.is_none());
}

#[tokio::test]
#[serial]
async fn data_types_store_failure_leaves_purchase_untouched() {
  setup_tracing();
  let h = harness();
  let p = h.flow.begin(&jane()).await.unwrap();
  let notes_before = h.notifier.count();

  h.store.fail_writes(true);
  let err = h.flow.set_data_types(p.id, &types(&["Contact"])).await.unwrap_err();
  h.store.fail_writes(false);

  assert!(matches!(err, FlowError::Persistence { .. }));
  assert_eq!(h.notifier.count(), notes_before);
  let stored = h.flow.get_purchase(p.id).await.unwrap().unwrap();
  assert_eq!(stored.step, PurchaseStep::DataTypes);
  assert!(stored.selected_data_types.is_empty());
}

#[tokio::test]
#[serial]
async fn plan_store_failure_leaves_purchase_untouched() {
  setup_tracing();
  let h = harness();
  let p = h.flow.begin(&jane()).await.unwrap();
  h.flow.set_data_types(p.id, &types(&["Contact"])).await.unwrap();
  let notes_before = h.notifier.count();

  h.store.fail_writes(true);
  let err = h.flow.set_plan(p.id, &plan_choice("pro-monthly")).await.unwrap_err();
  h.store.fail_writes(false);

  assert!(matches!(err, FlowError::Persistence { .. }));
  assert_eq!(h.notifier.count(), notes_before);
  let stored = h.flow.get_purchase(p.id).await.unwrap().unwrap();
  assert_eq!(stored.step, PurchaseStep::Plan);
  assert!(stored.selected_plan.is_none());
  assert!(stored.payment_amount.is_none());
}

#[tokio::test]
#[serial]
async fn manual_checkout_store_failure_stays_on_payment_step() {
  setup_tracing();
  let h = harness();
  let p = purchase_at_payment(&h).await;

  h.store.fail_writes(true);
  let err = h.flow.checkout(p.id, PaymentMethod::Manual).await.unwrap_err();
  h.store.fail_writes(false);

  assert!(matches!(err, FlowError::Persistence { .. }));
  let stored = h.flow.get_purchase(p.id).await.unwrap().unwrap();
  assert_eq!(stored.step, PurchaseStep::Payment);
  assert_eq!(stored.payment_status, PaymentStatus::Pending);
  assert!(stored.payment_method.is_none());

  // The customer can retry once the store is back.
  let outcome = h.flow.checkout(p.id, PaymentMethod::Manual).await.unwrap();
  assert!(matches!(outcome, CheckoutOutcome::ManualPending { .. }));
}

#[tokio::test]
#[serial]
async fn scenario_manual_checkout_end_to_end() {
  setup_tracing();
  let h = harness();

  let p1 = h.flow.begin(&jane()).await.unwrap();
  assert_eq!(p1.step, PurchaseStep::DataTypes);

  let p = h.flow.set_data_types(p1.id, &types(&["Contact", "Tickets"])).await.unwrap();
  assert_eq!(p.selected_data_types, vec![DataType::Contact, DataType::Tickets]);

  let p = h.flow.set_plan(p1.id, &plan_choice("pro-monthly")).await.unwrap();
  assert_eq!(p.payment_amount.as_deref(), Some("49.00"));
  assert_eq!(p.pricing_tier.as_deref(), Some("Pro"));
  assert_eq!(p.payment_currency.as_deref(), Some("USD"));

  h.clock.advance(Duration::minutes(3));
  let p = h.flow.accept_terms(p1.id, ACCEPT).await.unwrap();
  assert!(p.terms_accepted);
  assert_eq!(p.terms_accepted_at, Some(start_of_test_time() + Duration::minutes(3)));
  assert_eq!(p.step, PurchaseStep::Payment);

  let outcome = h.flow.checkout(p1.id, PaymentMethod::Manual).await.unwrap();
  let purchase = match outcome {
    CheckoutOutcome::ManualPending { purchase } => purchase,
    other => panic!("expected manual pending, got {:?}", other),
  };
  assert_eq!(purchase.payment_status, PaymentStatus::Pending);
  assert_eq!(purchase.payment_method, Some(PaymentMethod::Manual));
  assert_eq!(purchase.step, PurchaseStep::ManualPending);
  assert!(purchase.checkout_session_id.is_none());

  let titles = h.notifier.titles();
  assert_eq!(titles.len(), 5);
  assert!(titles[4].starts_with("Purchase Flow Step 5: Payment"));
  let last = h.notifier.last_content().unwrap();
  assert!(last.contains("Pending Contact"));
  assert!(last.contains("Manual/Bespoke"));

  // Terminal: nothing more is accepted.
  let err = h.flow.set_data_types(p1.id, &types(&["Deals"])).await.unwrap_err();
  assert!(matches!(err, FlowError::PurchaseClosed { .. }));
  let err = h.flow.checkout(p1.id, PaymentMethod::Gateway).await.unwrap_err();
  assert!(matches!(err, FlowError::PurchaseClosed { .. }));
}

#[tokio::test]
#[serial]
async fn unconfigured_gateway_leaves_purchase_at_payment() {
  setup_tracing();
  let h = harness();
  let p = purchase_at_payment(&h).await;
  let notes_before = h.notifier.count();

  let err = h.flow.checkout(p.id, PaymentMethod::Gateway).await.unwrap_err();

  match &err {
    FlowError::Payment(PaymentError::NotConfigured { contact }) => assert_eq!(contact, SALES_CONTACT),
    other => panic!("expected NotConfigured, got {:?}", other),
  }
  assert!(err.to_string().contains(SALES_CONTACT));

  let stored = h.flow.get_purchase(p.id).await.unwrap().unwrap();
  assert_eq!(stored.step, PurchaseStep::Payment);
  assert_eq!(stored.payment_status, PaymentStatus::Pending);
  assert!(stored.payment_method.is_none());

  // "Initiated" goes out before the gateway is asked.
  assert_eq!(h.notifier.count(), notes_before + 1);
  assert!(h.notifier.last_content().unwrap().contains("Initiated"));

  // The customer can still take the manual path.
  let outcome = h.flow.checkout(p.id, PaymentMethod::Manual).await.unwrap();
  assert_eq!(outcome.purchase().step, PurchaseStep::ManualPending);
}

#[tokio::test]
#[serial]
async fn gateway_checkout_redirects_and_records_session() {
  setup_tracing();
  let gateway = Arc::new(FakeGateway::default());
  let h = harness_with(Arc::new(RecordingNotifier::new(true)), gateway.clone());
  let p = purchase_at_payment(&h).await;

  let outcome = h.flow.checkout(p.id, PaymentMethod::Gateway).await.unwrap();

  let (url, session_id, purchase) = match outcome {
    CheckoutOutcome::Redirect {
      url,
      session_id,
      purchase,
    } => (url, session_id, purchase),
    other => panic!("expected redirect, got {:?}", other),
  };
  assert_eq!(session_id, "cs_test_1");
  assert_eq!(url, "https://checkout.example.test/pay/cs_test_1");
  assert_eq!(purchase.step, PurchaseStep::Redirected);
  assert_eq!(purchase.payment_method, Some(PaymentMethod::Gateway));
  assert_eq!(purchase.checkout_session_id.as_deref(), Some("cs_test_1"));
  assert_eq!(purchase.payment_status, PaymentStatus::Pending);

  let requests = gateway.requests();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].amount.to_string(), "49.00");
  assert_eq!(requests[0].currency, "USD");
  assert_eq!(
    requests[0].success_url,
    "https://spokehub.test/purchase-success?session_id={CHECKOUT_SESSION_ID}"
  );
  assert_eq!(requests[0].cancel_url, "https://spokehub.test/purchase?hub=hubspot&spoke=jira");
  assert!(requests[0].tier_name.starts_with("Pro"));
}

#[tokio::test]
#[serial]
async fn payment_outcome_completes_a_redirected_purchase() {
  setup_tracing();
  let h = harness_with(Arc::new(RecordingNotifier::new(true)), Arc::new(FakeGateway::default()));
  let p = purchase_at_payment(&h).await;
  h.flow.checkout(p.id, PaymentMethod::Gateway).await.unwrap();
  h.clock.advance(Duration::minutes(10));

  let paid = h
    .flow
    .record_payment_outcome(p.id, PaymentOutcome::Completed)
    .await
    .unwrap();

  assert_eq!(paid.payment_status, PaymentStatus::Completed);
  assert_eq!(paid.paid_at, Some(start_of_test_time() + Duration::minutes(10)));
  assert_eq!(paid.step, PurchaseStep::Redirected);
  assert_eq!(
    h.notifier.titles().last().map(String::as_str),
    Some("New Integration Purchase: HubSpot ↔ Jira")
  );

  // Already settled.
  let err = h
    .flow
    .record_payment_outcome(p.id, PaymentOutcome::Failed)
    .await
    .unwrap_err();
  assert!(matches!(err, FlowError::NotAwaitingPayment { .. }));
}

#[tokio::test]
#[serial]
async fn payment_outcome_requires_a_redirect() {
  setup_tracing();
  let h = harness();
  let p = purchase_at_payment(&h).await;

  let err = h
    .flow
    .record_payment_outcome(p.id, PaymentOutcome::Completed)
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    FlowError::NotAwaitingPayment {
      step: PurchaseStep::Payment,
      ..
    }
  ));
}

#[tokio::test]
#[serial]
async fn failed_payment_sends_no_summary() {
  setup_tracing();
  let h = harness_with(Arc::new(RecordingNotifier::new(true)), Arc::new(FakeGateway::default()));
  let p = purchase_at_payment(&h).await;
  h.flow.checkout(p.id, PaymentMethod::Gateway).await.unwrap();
  let notes_before = h.notifier.count();

  let failed = h.flow.record_payment_outcome(p.id, PaymentOutcome::Failed).await.unwrap();

  assert_eq!(failed.payment_status, PaymentStatus::Failed);
  assert!(failed.paid_at.is_none());
  assert_eq!(h.notifier.count(), notes_before);
}

#[tokio::test]
#[serial]
async fn silent_notifier_never_blocks_the_wizard() {
  setup_tracing();
  let h = harness_with(Arc::new(RecordingNotifier::new(false)), Arc::new(FakeGateway::default()));

  let p = purchase_at_payment(&h).await;

  assert_eq!(p.step, PurchaseStep::Payment);
  assert!(!p.notification_sent);
  assert_eq!(h.notifier.count(), 4);

  let outcome = h.flow.checkout(p.id, PaymentMethod::Gateway).await.unwrap();
  assert_eq!(outcome.purchase().step, PurchaseStep::Redirected);
}

#[tokio::test]
#[serial]
async fn notification_flag_is_set_once_delivery_recovers() {
  setup_tracing();
  let h = harness_with(Arc::new(RecordingNotifier::new(false)), Arc::new(FakeGateway::default()));
  let p = h.flow.begin(&jane()).await.unwrap();
  assert!(!p.notification_sent);

  h.notifier.set_delivering(true);
  let p = h.flow.set_data_types(p.id, &types(&["Account"])).await.unwrap();
  assert!(p.notification_sent);
}

#[tokio::test]
#[serial]
async fn going_back_overwrites_without_rewinding_the_step() {
  setup_tracing();
  let h = harness();
  let p = purchase_at_payment(&h).await;

  let revised = h
    .flow
    .set_data_types(
      p.id,
      &DataTypeSelection {
        data_types: vec!["Deals".to_string(), "Line Items".to_string()],
        other_data_types: Some(" quotes ".to_string()),
      },
    )
    .await
    .unwrap();
  assert_eq!(revised.selected_data_types, vec![DataType::Deals, DataType::LineItems]);
  assert_eq!(revised.other_data_types, "quotes");
  assert_eq!(revised.step, PurchaseStep::Payment);

  let revised = h.flow.set_plan(p.id, &plan_choice("basic-monthly")).await.unwrap();
  assert_eq!(revised.payment_amount.as_deref(), Some("19.50"));
  assert_eq!(revised.step, PurchaseStep::Payment);
}

#[tokio::test]
#[serial]
async fn identical_updates_are_idempotent() {
  setup_tracing();
  let h = harness();
  let p = h.flow.begin(&jane()).await.unwrap();

  let once = h.flow.set_data_types(p.id, &types(&["Contact", "Tickets"])).await.unwrap();
  h.clock.advance(Duration::seconds(5));
  let twice = h.flow.set_data_types(p.id, &types(&["Contact", "Tickets"])).await.unwrap();

  assert!(twice.updated_at > once.updated_at);
  let mut normalised = twice.clone();
  normalised.updated_at = once.updated_at;
  assert_eq!(normalised, once);
}

#[tokio::test]
#[serial]
async fn lookups_of_unknown_ids_are_empty_not_errors() {
  setup_tracing();
  let h = harness();
  assert!(h.flow.get_purchase(Uuid::new_v4()).await.unwrap().is_none());
  assert!(h.flow.purchase_summary(Uuid::new_v4()).await.unwrap().is_none());

  let p = h.flow.begin(&jane()).await.unwrap();
  let stored = h.store.get(p.id).await.unwrap().unwrap();
  assert_eq!(stored, p);
  let summary = h.flow.purchase_summary(p.id).await.unwrap().unwrap();
  assert!(summary.content.contains(&p.id.to_string()));
}
