// spokehub/src/flow/pipelines.rs

//! Step lists for each wizard operation. Validation always runs first so a
//! rejected submission never touches the store or the operator inbox.

use std::sync::Arc;

use super::context::{CheckoutDetail, PaymentOutcome, StepCtxData};
use super::steps::{self, Ctx};
use super::{FlowDeps, FlowSettings, StepPipeline};
use crate::engine::{ContextData, Pipeline, PipelineControl, SkipCondition};
use crate::error::{FlowError, ValidationError};
use crate::purchase::{
  ContactDetails, DataTypeSelection, NewPurchase, PaymentStatus, PlanChoice, PurchaseStep, TermsAcceptance,
};

const NOTIFY: &str = "notify_operator";
const MARK_NOTIFIED: &str = "mark_notified";

/// Registers the trailing notify + bookkeeping pair every operation ends with.
fn wire_notification<D: Send + Sync + 'static>(p: &mut StepPipeline<D>, deps: &Arc<FlowDeps>) {
  let d = deps.clone();
  p.on_root(NOTIFY, move |ctx| steps::notify_step(d.clone(), ctx));
  let d = deps.clone();
  p.on_root(MARK_NOTIFIED, move |ctx| steps::mark_notified(d.clone(), ctx));
}

fn wire_load_and_persist<D: Send + Sync + 'static>(p: &mut StepPipeline<D>, deps: &Arc<FlowDeps>) {
  let d = deps.clone();
  p.on_root("load_purchase", move |ctx| steps::load_purchase(d.clone(), ctx));
  let d = deps.clone();
  p.on_root("persist_step", move |ctx| steps::persist_patch(d.clone(), ctx));
}

pub(super) fn begin(deps: &Arc<FlowDeps>, settings: &Arc<FlowSettings>) -> StepPipeline<ContactDetails> {
  let mut p = Pipeline::new(
    "begin",
    &[
      ("validate_input", false, None),
      ("create_purchase", false, None),
      (NOTIFY, true, None),
      (MARK_NOTIFIED, true, Some(steps::unless_newly_notified())),
    ],
  );

  p.on_root("validate_input", |ctx: Ctx<ContactDetails>| async move {
    let valid = ctx.read().input.validate()?;
    ctx.write().input = valid;
    Ok::<_, FlowError>(PipelineControl::Continue)
  });

  let d = deps.clone();
  let s = settings.clone();
  p.on_root("create_purchase", move |ctx: Ctx<ContactDetails>| {
    let deps = d.clone();
    let settings = s.clone();
    async move {
      let new = ctx.with(|c| NewPurchase {
        id: c.purchase_id,
        hub_vendor_id: c.input.hub_vendor_id.clone(),
        hub_vendor_name: c.input.hub_vendor_name.clone(),
        spoke_integration_id: c.input.spoke_integration_id.clone(),
        spoke_integration_name: c.input.spoke_integration_name.clone(),
        customer_name: c.input.customer_name.clone(),
        customer_email: c.input.customer_email.clone(),
        template_id: settings.template_id.clone(),
      });
      let purchase = deps.store.create(new).await?;
      ctx.write().purchase = Some(purchase);
      Ok::<_, FlowError>(PipelineControl::Continue)
    }
  });

  wire_notification(&mut p, deps);
  p
}

pub(super) fn data_types(deps: &Arc<FlowDeps>) -> StepPipeline<DataTypeSelection> {
  let mut p = Pipeline::new(
    "set_data_types",
    &[
      ("validate_input", false, None),
      ("load_purchase", false, None),
      ("persist_step", false, None),
      (NOTIFY, true, None),
      (MARK_NOTIFIED, true, Some(steps::unless_newly_notified())),
    ],
  );

  p.on_root("validate_input", |ctx: Ctx<DataTypeSelection>| async move {
    let valid = ctx.read().input.validate()?;
    {
      let mut c = ctx.write();
      c.patch.selected_data_types = Some(valid.data_types);
      c.patch.other_data_types = Some(valid.other_data_types);
    }
    Ok::<_, FlowError>(PipelineControl::Continue)
  });

  wire_load_and_persist(&mut p, deps);
  wire_notification(&mut p, deps);
  p
}

pub(super) fn plan(deps: &Arc<FlowDeps>) -> StepPipeline<PlanChoice> {
  let mut p = Pipeline::new(
    "set_plan",
    &[
      ("validate_input", false, None),
      ("resolve_plan", false, None),
      ("load_purchase", false, None),
      ("persist_step", false, None),
      (NOTIFY, true, None),
      (MARK_NOTIFIED, true, Some(steps::unless_newly_notified())),
    ],
  );

  p.on_root("validate_input", |ctx: Ctx<PlanChoice>| async move {
    let plan_id = ctx.read().input.validate()?;
    ctx.write().input.plan_id = plan_id;
    Ok::<_, FlowError>(PipelineControl::Continue)
  });

  let d = deps.clone();
  p.on_root("resolve_plan", move |ctx: Ctx<PlanChoice>| {
    let deps = d.clone();
    async move {
      let plan_id = ctx.with(|c| c.input.plan_id.clone());
      let plan = deps
        .catalog
        .resolve_plan(&plan_id)
        .await?
        .ok_or_else(|| ValidationError::UnknownPlan { plan_id: plan_id.clone() })?;
      {
        let mut c = ctx.write();
        c.patch.selected_plan = Some(plan.id.clone());
        c.patch.pricing_tier = Some(plan.name.clone());
        c.patch.payment_amount = Some(plan.price_snapshot());
        c.patch.payment_currency = Some(plan.currency.clone());
      }
      Ok::<_, FlowError>(PipelineControl::Continue)
    }
  });

  wire_load_and_persist(&mut p, deps);
  wire_notification(&mut p, deps);
  p
}

pub(super) fn terms(deps: &Arc<FlowDeps>) -> StepPipeline<TermsAcceptance> {
  let mut p = Pipeline::new(
    "accept_terms",
    &[
      ("validate_input", false, None),
      ("load_purchase", false, None),
      ("persist_step", false, None),
      (NOTIFY, true, None),
      (MARK_NOTIFIED, true, Some(steps::unless_newly_notified())),
    ],
  );

  let d = deps.clone();
  p.on_root("validate_input", move |ctx: Ctx<TermsAcceptance>| {
    let deps = d.clone();
    async move {
      ctx.read().input.validate()?;
      let now = deps.clock.now();
      {
        let mut c = ctx.write();
        c.patch.terms_accepted = Some(true);
        c.patch.terms_accepted_at = Some(now);
      }
      Ok::<_, FlowError>(PipelineControl::Continue)
    }
  });

  wire_load_and_persist(&mut p, deps);
  wire_notification(&mut p, deps);
  p
}

/// Hosted checkout. The operator hears "Initiated" before the provider is
/// called, so a provider failure still leaves a trace in the inbox.
pub(super) fn gateway_checkout(deps: &Arc<FlowDeps>, settings: &Arc<FlowSettings>) -> StepPipeline<CheckoutDetail> {
  let mut p = Pipeline::new(
    "gateway_checkout",
    &[
      ("load_purchase", false, None),
      (NOTIFY, true, None),
      ("open_checkout_session", false, None),
      ("persist_step", false, None),
      (MARK_NOTIFIED, true, Some(steps::unless_newly_notified())),
    ],
  );

  let d = deps.clone();
  let s = settings.clone();
  p.on_root("open_checkout_session", move |ctx| {
    steps::open_checkout_session(d.clone(), s.clone(), ctx)
  });

  wire_load_and_persist(&mut p, deps);
  wire_notification(&mut p, deps);
  p
}

pub(super) fn manual_checkout(deps: &Arc<FlowDeps>) -> StepPipeline<()> {
  let mut p = Pipeline::new(
    "manual_checkout",
    &[
      ("load_purchase", false, None),
      (NOTIFY, true, None),
      ("stage_follow_up", false, None),
      ("persist_step", false, None),
      (MARK_NOTIFIED, true, Some(steps::unless_newly_notified())),
    ],
  );

  p.on_root("stage_follow_up", steps::stage_manual_follow_up);

  wire_load_and_persist(&mut p, deps);
  wire_notification(&mut p, deps);
  p
}

fn unless_completed() -> SkipCondition<StepCtxData<PaymentOutcome>> {
  Arc::new(|ctx: ContextData<StepCtxData<PaymentOutcome>>| ctx.with(|c| c.input != PaymentOutcome::Completed))
}

pub(super) fn payment_outcome(deps: &Arc<FlowDeps>) -> StepPipeline<PaymentOutcome> {
  let mut p = Pipeline::new(
    "payment_outcome",
    &[
      ("load_redirected", false, None),
      ("apply_outcome", false, None),
      ("persist_step", false, None),
      ("notify_summary", true, Some(unless_completed())),
      (MARK_NOTIFIED, true, Some(steps::unless_newly_notified())),
    ],
  );

  let d = deps.clone();
  p.on_root("load_redirected", move |ctx: Ctx<PaymentOutcome>| {
    let deps = d.clone();
    async move {
      let id = ctx.with(|c| c.purchase_id);
      let purchase = deps
        .store
        .get(id)
        .await?
        .ok_or(FlowError::PurchaseNotFound { id })?;
      if purchase.step != PurchaseStep::Redirected || purchase.payment_status != PaymentStatus::Pending {
        return Err(FlowError::NotAwaitingPayment {
          id,
          step: purchase.step,
          status: purchase.payment_status,
        });
      }
      ctx.write().purchase = Some(purchase);
      Ok::<_, FlowError>(PipelineControl::Continue)
    }
  });

  let d = deps.clone();
  p.on_root("apply_outcome", move |ctx: Ctx<PaymentOutcome>| {
    let deps = d.clone();
    async move {
      let now = deps.clock.now();
      {
        let mut c = ctx.write();
        let outcome = c.input;
        match outcome {
          PaymentOutcome::Completed => {
            c.patch.payment_status = Some(PaymentStatus::Completed);
            c.patch.paid_at = Some(now);
          }
          PaymentOutcome::Failed => c.patch.payment_status = Some(PaymentStatus::Failed),
        }
      }
      Ok::<_, FlowError>(PipelineControl::Continue)
    }
  });

  let d = deps.clone();
  p.on_root("persist_step", move |ctx| steps::persist_patch(d.clone(), ctx));
  let d = deps.clone();
  p.on_root("notify_summary", move |ctx| steps::notify_summary(d.clone(), ctx));
  let d = deps.clone();
  p.on_root(MARK_NOTIFIED, move |ctx| steps::mark_notified(d.clone(), ctx));
  p
}
