// spokehub/src/flow/mod.rs

//! The purchase wizard. Each operation is a small [`Pipeline`] of named steps
//! (validate, load, persist, notify) run against a fresh context; the step
//! value stored on the purchase is the only state carried between operations.

use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::engine::{ContextData, Pipeline, PipelineResult};
use crate::error::{FlowError, FlowResult};
use crate::notify::{render, CheckoutNotice, Notification, Notifier};
use crate::payment::PaymentGateway;
use crate::purchase::{
  ContactDetails, DataTypeSelection, PaymentMethod, PlanChoice, Purchase, PurchaseStep, TermsAcceptance,
};
use crate::store::PurchaseStore;

pub mod context;
mod pipelines;
mod steps;

pub use context::{CheckoutDetail, CheckoutOutcome, PaymentOutcome, StepCtxData};

pub const DEFAULT_TEMPLATE_ID: &str = "multi-hub";

/// The collaborators every operation talks to.
pub struct FlowDeps {
  pub store: Arc<dyn PurchaseStore>,
  pub notifier: Arc<dyn Notifier>,
  pub payments: Arc<dyn PaymentGateway>,
  pub catalog: Arc<Catalog>,
  pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
pub struct FlowSettings {
  /// Stamped on every purchase; identifies the site variant that produced it.
  pub template_id: String,
  /// Public origin of the site, used for checkout return URLs. No trailing slash.
  pub base_url: String,
}

impl FlowSettings {
  pub fn new(template_id: impl Into<String>, base_url: impl Into<String>) -> Self {
    Self {
      template_id: template_id.into(),
      base_url: base_url.into().trim_end_matches('/').to_string(),
    }
  }

  /// Where the provider returns after payment. The placeholder is filled in
  /// by the provider.
  pub fn success_url(&self) -> String {
    format!("{}/purchase-success?session_id={{CHECKOUT_SESSION_ID}}", self.base_url)
  }

  /// Back to the wizard for the same hub/spoke pair.
  pub fn cancel_url(&self, purchase: &Purchase) -> String {
    format!(
      "{}/purchase?hub={}&spoke={}",
      self.base_url, purchase.hub_vendor_id, purchase.spoke_integration_id
    )
  }
}

type StepPipeline<D> = Pipeline<StepCtxData<D>, FlowError>;

pub struct PurchaseFlow {
  deps: Arc<FlowDeps>,
  begin: StepPipeline<ContactDetails>,
  data_types: StepPipeline<DataTypeSelection>,
  plan: StepPipeline<PlanChoice>,
  terms: StepPipeline<TermsAcceptance>,
  gateway_checkout: StepPipeline<CheckoutDetail>,
  manual_checkout: StepPipeline<()>,
  payment_outcome: StepPipeline<PaymentOutcome>,
}

async fn drive<D: Send + Sync + 'static>(
  pipeline: &StepPipeline<D>,
  data: StepCtxData<D>,
) -> FlowResult<ContextData<StepCtxData<D>>> {
  let ctx = ContextData::new(data);
  match pipeline.run(ctx.clone()).await? {
    PipelineResult::Completed => Ok(ctx),
    PipelineResult::Stopped => Err(FlowError::Internal(format!(
      "pipeline '{}' stopped before completing",
      pipeline.name()
    ))),
  }
}

fn finished<D: Send + Sync + 'static>(ctx: &ContextData<StepCtxData<D>>) -> FlowResult<Purchase> {
  ctx
    .with(|c| c.purchase.clone())
    .ok_or_else(|| FlowError::Internal("operation finished without a purchase".into()))
}

impl PurchaseFlow {
  pub fn new(deps: FlowDeps, settings: FlowSettings) -> Self {
    let deps = Arc::new(deps);
    let settings = Arc::new(settings);
    Self {
      begin: pipelines::begin(&deps, &settings),
      data_types: pipelines::data_types(&deps),
      plan: pipelines::plan(&deps),
      terms: pipelines::terms(&deps),
      gateway_checkout: pipelines::gateway_checkout(&deps, &settings),
      manual_checkout: pipelines::manual_checkout(&deps),
      payment_outcome: pipelines::payment_outcome(&deps),
      deps,
    }
  }

  pub fn catalog(&self) -> &Arc<Catalog> {
    &self.deps.catalog
  }

  /// Step 1: validates the contact details and creates the purchase.
  #[instrument(name = "flow::begin", skip_all, fields(hub = %details.hub_vendor_id, spoke = %details.spoke_integration_id))]
  pub async fn begin(&self, details: &ContactDetails) -> FlowResult<Purchase> {
    let data = StepCtxData::new(Uuid::new_v4(), PurchaseStep::ContactInfo, details.clone());
    let ctx = drive(&self.begin, data).await?;
    let purchase = finished(&ctx)?;
    info!(purchase_id = %purchase.id, "Purchase started.");
    Ok(purchase)
  }

  /// Step 2: which record types to sync.
  #[instrument(name = "flow::set_data_types", skip(self, selection))]
  pub async fn set_data_types(&self, purchase_id: Uuid, selection: &DataTypeSelection) -> FlowResult<Purchase> {
    let data = StepCtxData::new(purchase_id, PurchaseStep::DataTypes, selection.clone());
    finished(&drive(&self.data_types, data).await?)
  }

  /// Step 3: snapshots the chosen plan's price onto the purchase.
  #[instrument(name = "flow::set_plan", skip(self, choice), fields(plan = %choice.plan_id))]
  pub async fn set_plan(&self, purchase_id: Uuid, choice: &PlanChoice) -> FlowResult<Purchase> {
    let data = StepCtxData::new(purchase_id, PurchaseStep::Plan, choice.clone());
    finished(&drive(&self.plan, data).await?)
  }

  /// Step 4.
  #[instrument(name = "flow::accept_terms", skip(self))]
  pub async fn accept_terms(&self, purchase_id: Uuid, acceptance: TermsAcceptance) -> FlowResult<Purchase> {
    let data = StepCtxData::new(purchase_id, PurchaseStep::Terms, acceptance);
    finished(&drive(&self.terms, data).await?)
  }

  /// Step 5. On a gateway failure the purchase is left at step 5 with payment
  /// pending, so the customer can retry or switch to the manual path.
  #[instrument(name = "flow::checkout", skip(self))]
  pub async fn checkout(&self, purchase_id: Uuid, method: PaymentMethod) -> FlowResult<CheckoutOutcome> {
    match method {
      PaymentMethod::Gateway => {
        let data = StepCtxData::new(purchase_id, PurchaseStep::Payment, CheckoutDetail::default())
          .with_notice(CheckoutNotice::Initiated);
        let ctx = drive(&self.gateway_checkout, data).await?;
        let purchase = finished(&ctx)?;
        let session = ctx
          .with(|c| c.input.session.clone())
          .ok_or_else(|| FlowError::Internal("gateway checkout finished without a session".into()))?;
        Ok(CheckoutOutcome::Redirect {
          url: session.url,
          session_id: session.id,
          purchase,
        })
      }
      PaymentMethod::Manual => {
        let data =
          StepCtxData::new(purchase_id, PurchaseStep::Payment, ()).with_notice(CheckoutNotice::PendingContact);
        let purchase = finished(&drive(&self.manual_checkout, data).await?)?;
        Ok(CheckoutOutcome::ManualPending { purchase })
      }
    }
  }

  /// Records the provider's verdict for a redirected purchase. A completed
  /// payment stamps `paid_at` and sends the operator the full summary.
  #[instrument(name = "flow::record_payment_outcome", skip(self))]
  pub async fn record_payment_outcome(&self, purchase_id: Uuid, outcome: PaymentOutcome) -> FlowResult<Purchase> {
    let data = StepCtxData::new(purchase_id, PurchaseStep::Redirected, outcome);
    let purchase = finished(&drive(&self.payment_outcome, data).await?)?;
    info!(purchase_id = %purchase.id, status = %purchase.payment_status, "Payment outcome recorded.");
    Ok(purchase)
  }

  /// Point lookup for the confirmation page. Unknown ids are `Ok(None)`.
  pub async fn get_purchase(&self, purchase_id: Uuid) -> FlowResult<Option<Purchase>> {
    Ok(self.deps.store.get(purchase_id).await?)
  }

  /// The purchase rendered as the operator hand-off summary.
  pub async fn purchase_summary(&self, purchase_id: Uuid) -> FlowResult<Option<Notification>> {
    Ok(self.get_purchase(purchase_id).await?.as_ref().map(render::purchase_summary))
  }
}
