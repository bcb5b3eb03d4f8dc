// spokehub/src/flow/steps.rs

//! Handlers shared by several wizard operations. Each takes the operation's
//! context and the collaborators it needs, and never holds a lock across an
//! `.await`.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::context::{CheckoutDetail, StepCtxData};
use super::{FlowDeps, FlowSettings};
use crate::engine::{ContextData, PipelineControl, SkipCondition};
use crate::error::FlowError;
use crate::notify::render;
use crate::payment::{CheckoutSessionRequest, PaymentError};
use crate::purchase::{advanced_step, ensure_can_submit, PaymentMethod, PurchasePatch, PurchaseStep};

pub(crate) type Ctx<D> = ContextData<StepCtxData<D>>;

/// Fetches the purchase and checks the wizard may accept `requested` now.
pub(crate) async fn load_purchase<D: Send + Sync + 'static>(
  deps: Arc<FlowDeps>,
  ctx: Ctx<D>,
) -> Result<PipelineControl, FlowError> {
  let (id, requested) = ctx.with(|c| (c.purchase_id, c.requested));
  let purchase = deps
    .store
    .get(id)
    .await?
    .ok_or(FlowError::PurchaseNotFound { id })?;
  ensure_can_submit(&purchase, requested)?;
  debug!(purchase_id = %id, current = %purchase.step, "Purchase loaded.");
  ctx.write().purchase = Some(purchase);
  Ok(PipelineControl::Continue)
}

/// Writes the accumulated patch. Unless a handler already chose the next step,
/// the wizard moves to the step after `requested` (never backwards).
pub(crate) async fn persist_patch<D: Send + Sync + 'static>(
  deps: Arc<FlowDeps>,
  ctx: Ctx<D>,
) -> Result<PipelineControl, FlowError> {
  let (id, patch) = ctx.with(|c| {
    let mut patch = c.patch.clone();
    if patch.step.is_none() {
      if let Some(current) = c.purchase.as_ref().map(|p| p.step) {
        let next = advanced_step(current, c.requested);
        if next != current {
          patch.step = Some(next);
        }
      }
    }
    (c.purchase_id, patch)
  });
  let updated = deps.store.update(id, &patch).await?;
  debug!(purchase_id = %id, step = %updated.step, "Purchase updated.");
  ctx.write().purchase = Some(updated);
  Ok(PipelineControl::Continue)
}

async fn deliver<D: Send + Sync + 'static>(deps: &FlowDeps, ctx: &Ctx<D>, title: &str, content: &str) {
  let (id, requested) = ctx.with(|c| (c.purchase_id, c.requested));
  let delivered = deps.notifier.notify(title, content).await;
  if delivered {
    info!(purchase_id = %id, step = requested.number(), "Operator notified.");
  } else {
    warn!(purchase_id = %id, step = requested.number(), "Operator notification was not delivered; continuing.");
  }
  ctx.write().notified = delivered;
}

/// Sends the step notification for `requested`. Delivery failure is logged and
/// otherwise ignored.
pub(crate) async fn notify_step<D: Send + Sync + 'static>(
  deps: Arc<FlowDeps>,
  ctx: Ctx<D>,
) -> Result<PipelineControl, FlowError> {
  let now = deps.clock.now();
  let note = ctx.with(|c| {
    c.purchase
      .as_ref()
      .map(|p| render::step_notification(c.requested, p, c.notice, now))
  });
  match note {
    Some(note) => deliver(&deps, &ctx, &note.title, &note.content).await,
    None => warn!("No purchase in context; skipping step notification."),
  }
  Ok(PipelineControl::Continue)
}

/// Sends the full hand-off summary of the purchase in context.
pub(crate) async fn notify_summary<D: Send + Sync + 'static>(
  deps: Arc<FlowDeps>,
  ctx: Ctx<D>,
) -> Result<PipelineControl, FlowError> {
  let note = ctx.with(|c| c.purchase.as_ref().map(render::purchase_summary));
  if let Some(note) = note {
    deliver(&deps, &ctx, &note.title, &note.content).await;
  }
  Ok(PipelineControl::Continue)
}

/// Records that the operator has heard about this purchase. A failed write is
/// only logged; the customer-facing step has already succeeded.
pub(crate) async fn mark_notified<D: Send + Sync + 'static>(
  deps: Arc<FlowDeps>,
  ctx: Ctx<D>,
) -> Result<PipelineControl, FlowError> {
  let id = ctx.with(|c| c.purchase_id);
  let patch = PurchasePatch {
    notification_sent: Some(true),
    ..Default::default()
  };
  match deps.store.update(id, &patch).await {
    Ok(updated) => ctx.write().purchase = Some(updated),
    Err(e) => warn!(purchase_id = %id, error = %e, "Could not record notification_sent."),
  }
  Ok(PipelineControl::Continue)
}

/// Skip `mark_notified` when nothing was delivered or the flag is already set.
pub(crate) fn unless_newly_notified<D: Send + Sync + 'static>() -> SkipCondition<StepCtxData<D>> {
  Arc::new(|ctx: Ctx<D>| {
    ctx.with(|c| !c.notified || c.purchase.as_ref().is_some_and(|p| p.notification_sent))
  })
}

/// Asks the payment gateway for a hosted checkout session priced from the
/// purchase's snapshot, and stages the redirect in the patch.
pub(crate) async fn open_checkout_session(
  deps: Arc<FlowDeps>,
  settings: Arc<FlowSettings>,
  ctx: Ctx<CheckoutDetail>,
) -> Result<PipelineControl, FlowError> {
  let request = ctx.with(|c| -> Result<CheckoutSessionRequest, FlowError> {
    let purchase = c
      .purchase
      .as_ref()
      .ok_or_else(|| FlowError::Internal("checkout session requested before the purchase was loaded".into()))?;
    let raw_amount = purchase.payment_amount.as_deref().unwrap_or_default();
    let amount: Decimal = raw_amount
      .parse()
      .map_err(|_| PaymentError::InvalidAmount(raw_amount.to_string()))?;
    if amount <= Decimal::ZERO {
      return Err(PaymentError::InvalidAmount(raw_amount.to_string()).into());
    }
    let tier_name = purchase
      .pricing_tier
      .clone()
      .or_else(|| purchase.selected_plan.clone())
      .unwrap_or_else(|| "Integration".to_string());
    Ok(CheckoutSessionRequest {
      purchase_id: purchase.id,
      tier_name: format!(
        "{} ({} ↔ {})",
        tier_name, purchase.hub_vendor_name, purchase.spoke_integration_name
      ),
      amount,
      currency: purchase.payment_currency.clone().unwrap_or_else(|| "USD".to_string()),
      customer_email: purchase.customer_email.clone(),
      success_url: settings.success_url(),
      cancel_url: settings.cancel_url(purchase),
    })
  })?;

  let session = deps.payments.create_checkout_session(&request).await?;
  info!(purchase_id = %request.purchase_id, session_id = %session.id, "Checkout session created.");

  {
    let mut c = ctx.write();
    c.patch.checkout_session_id = Some(session.id.clone());
    c.patch.payment_method = Some(PaymentMethod::Gateway);
    c.patch.step = Some(PurchaseStep::Redirected);
    c.input.session = Some(session);
  }
  Ok(PipelineControl::Continue)
}

/// Stages the manual/bespoke hand-off in the patch.
pub(crate) async fn stage_manual_follow_up(ctx: Ctx<()>) -> Result<PipelineControl, FlowError> {
  {
    let mut c = ctx.write();
    c.patch.payment_method = Some(PaymentMethod::Manual);
    c.patch.step = Some(PurchaseStep::ManualPending);
  }
  Ok(PipelineControl::Continue)
}
