// spokehub/src/purchase/guard.rs

use super::model::Purchase;
use super::step::PurchaseStep;
use crate::error::FlowError;

/// Checks that `purchase` may accept a submission for `requested`: it is not
/// closed, and every step before `requested` has been completed.
pub fn ensure_can_submit(purchase: &Purchase, requested: PurchaseStep) -> Result<(), FlowError> {
  if purchase.step.is_terminal() {
    return Err(FlowError::PurchaseClosed {
      id: purchase.id,
      step: purchase.step,
    });
  }
  if purchase.step < requested {
    return Err(FlowError::StepOutOfOrder {
      id: purchase.id,
      current: purchase.step,
      requested,
    });
  }
  Ok(())
}

/// The step a purchase sits at after `submitted` succeeds. Re-submitting an
/// earlier step never moves the wizard backwards.
pub fn advanced_step(current: PurchaseStep, submitted: PurchaseStep) -> PurchaseStep {
  match submitted.next() {
    Some(next) => current.max(next),
    None => current,
  }
}
