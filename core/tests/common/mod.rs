// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different slice of these helpers

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use spokehub::catalog::{
  BrandingConfig, CatalogSettings, HubVendor, PricingConfig, PricingPlan, SpokeIntegration, StaticCatalogSource,
};
use spokehub::payment::UnconfiguredPaymentGateway;
use spokehub::purchase::{NewPurchase, PurchasePatch};
use spokehub::store::StoreError;
use spokehub::{
  Catalog, CheckoutSession, CheckoutSessionRequest, ContactDetails, ContextData, FlowDeps, FlowError, FlowSettings,
  InMemoryPurchaseStore, ManualClock, Notifier, PaymentError, PaymentGateway, PipelineControl, Purchase,
  PurchaseFlow, PurchaseStore,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

// --- Engine test context and handlers ---

#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Flow error: {0}")]
  Flow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(err: FlowError) -> Self {
    TestError::Flow(format!("{:?}", err))
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> spokehub::engine::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> spokehub::engine::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Tracing ---

use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Collaborator doubles ---

/// Keeps every message it is asked to send; `delivering` decides the reply.
pub struct RecordingNotifier {
  delivering: AtomicBool,
  sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
  pub fn new(delivering: bool) -> Self {
    Self {
      delivering: AtomicBool::new(delivering),
      sent: Mutex::new(Vec::new()),
    }
  }

  pub fn set_delivering(&self, delivering: bool) {
    self.delivering.store(delivering, Ordering::SeqCst);
  }

  pub fn titles(&self) -> Vec<String> {
    self.sent.lock().iter().map(|(title, _)| title.clone()).collect()
  }

  pub fn last_content(&self) -> Option<String> {
    self.sent.lock().last().map(|(_, content)| content.clone())
  }

  pub fn count(&self) -> usize {
    self.sent.lock().len()
  }
}

#[async_trait]
impl Notifier for RecordingNotifier {
  async fn notify(&self, title: &str, content: &str) -> bool {
    self.sent.lock().push((title.to_string(), content.to_string()));
    self.delivering.load(Ordering::SeqCst)
  }
}

/// Hands out numbered fake sessions and remembers the requests.
#[derive(Default)]
pub struct FakeGateway {
  requests: Mutex<Vec<CheckoutSessionRequest>>,
}

impl FakeGateway {
  pub fn requests(&self) -> Vec<CheckoutSessionRequest> {
    self.requests.lock().clone()
  }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
  async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<CheckoutSession, PaymentError> {
    let mut requests = self.requests.lock();
    requests.push(request.clone());
    let id = format!("cs_test_{}", requests.len());
    Ok(CheckoutSession {
      url: format!("https://checkout.example.test/pay/{id}"),
      id,
    })
  }
}

/// In-memory store whose writes can be switched to fail.
pub struct FlakyStore {
  inner: InMemoryPurchaseStore,
  fail_writes: AtomicBool,
  writes: AtomicUsize,
}

impl FlakyStore {
  pub fn new(clock: Arc<ManualClock>) -> Self {
    Self {
      inner: InMemoryPurchaseStore::with_clock(clock),
      fail_writes: AtomicBool::new(false),
      writes: AtomicUsize::new(0),
    }
  }

  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }

  pub fn writes(&self) -> usize {
    self.writes.load(Ordering::SeqCst)
  }

  pub fn len(&self) -> usize {
    self.inner.len()
  }
}

#[async_trait]
impl PurchaseStore for FlakyStore {
  async fn create(&self, new: NewPurchase) -> Result<Purchase, StoreError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(StoreError::Backend(anyhow::anyhow!("database unavailable")));
    }
    self.writes.fetch_add(1, Ordering::SeqCst);
    self.inner.create(new).await
  }

  async fn update(&self, id: Uuid, patch: &PurchasePatch) -> Result<Purchase, StoreError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(StoreError::Backend(anyhow::anyhow!("database unavailable")));
    }
    self.writes.fetch_add(1, Ordering::SeqCst);
    self.inner.update(id, patch).await
  }

  async fn get(&self, id: Uuid) -> Result<Option<Purchase>, StoreError> {
    self.inner.get(id).await
  }
}

// --- Catalog fixtures ---

pub fn hub(id: &str, name: &str, spokes: &[&str]) -> HubVendor {
  HubVendor {
    id: id.to_string(),
    name: name.to_string(),
    description: format!("{name} hub"),
    logo: format!("/logos/{id}.svg"),
    categories: vec!["CRM".to_string()],
    data_points: vec![],
    features: vec![],
    spoke_integrations: spokes.iter().map(|s| s.to_string()).collect(),
  }
}

pub fn spoke(id: &str, name: &str) -> SpokeIntegration {
  SpokeIntegration {
    id: id.to_string(),
    name: name.to_string(),
    description: format!("{name} integration"),
    logo: format!("/logos/{id}.svg"),
    categories: vec![],
    available: true,
  }
}

pub fn plan(id: &str, name: &str, price: &str) -> PricingPlan {
  PricingPlan {
    id: id.to_string(),
    name: name.to_string(),
    sync_interval: "15 minutes".to_string(),
    price: price.parse().unwrap(),
    currency: "USD".to_string(),
    billing_period: "month".to_string(),
    description: String::new(),
    features: vec![],
    popular: false,
  }
}

pub fn sample_catalog_source() -> StaticCatalogSource {
  StaticCatalogSource::new()
    .with_hub_vendor(hub("hubspot", "HubSpot", &["jira", "slack", "autotask"]))
    .with_hub_vendor(hub("autotask", "Autotask", &["jira"]))
    .with_spoke_integrations(vec![
      spoke("autotask", "Autotask"),
      spoke("jira", "Jira"),
      spoke("servicenow", "ServiceNow"),
      spoke("slack", "Slack"),
    ])
    .with_branding(BrandingConfig {
      company_name: "Spoke Hub".to_string(),
      logo: String::new(),
      contact_email: "sales@spokehub.test".to_string(),
      contact_phone_uk: None,
      contact_phone_us: None,
      address: None,
      about_us: None,
      tagline: None,
      colors: Default::default(),
      social: Default::default(),
    })
    .with_pricing(PricingConfig {
      tiers: vec![],
      plans: vec![
        plan("basic-monthly", "Basic", "19.5"),
        plan("pro-monthly", "Pro", "49"),
      ],
      contract_terms: None,
    })
}

pub fn start_of_test_time() -> chrono::DateTime<Utc> {
  Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap()
}

// --- Flow harness ---

pub const SALES_CONTACT: &str = "sales@spokehub.test";

pub struct Harness {
  pub flow: PurchaseFlow,
  pub store: Arc<FlakyStore>,
  pub notifier: Arc<RecordingNotifier>,
  pub clock: Arc<ManualClock>,
}

pub fn harness_with(notifier: Arc<RecordingNotifier>, payments: Arc<dyn PaymentGateway>) -> Harness {
  let clock = Arc::new(ManualClock::new(start_of_test_time()));
  let store = Arc::new(FlakyStore::new(clock.clone()));
  let catalog = Arc::new(Catalog::new(
    Arc::new(sample_catalog_source()),
    clock.clone(),
    CatalogSettings::default(),
  ));
  let flow = PurchaseFlow::new(
    FlowDeps {
      store: store.clone(),
      notifier: notifier.clone(),
      payments,
      catalog,
      clock: clock.clone(),
    },
    FlowSettings::new("multi-hub", "https://spokehub.test/"),
  );
  Harness {
    flow,
    store,
    notifier,
    clock,
  }
}

/// Delivering notifier, unconfigured payment gateway.
pub fn harness() -> Harness {
  harness_with(
    Arc::new(RecordingNotifier::new(true)),
    Arc::new(UnconfiguredPaymentGateway::new(SALES_CONTACT)),
  )
}

pub fn jane() -> ContactDetails {
  ContactDetails {
    hub_vendor_id: "hubspot".to_string(),
    hub_vendor_name: "HubSpot".to_string(),
    spoke_integration_id: "jira".to_string(),
    spoke_integration_name: "Jira".to_string(),
    customer_name: "Jane Doe".to_string(),
    customer_email: "jane@acme.com".to_string(),
  }
}
