// spokehub/src/flow/context.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::notify::CheckoutNotice;
use crate::payment::CheckoutSession;
use crate::purchase::{Purchase, PurchasePatch, PurchaseStep};

/// The data one wizard operation carries through its pipeline.
///
/// `input` is the customer's submission (replaced by its validated form where
/// validation normalises it). Handlers accumulate the store update in `patch`;
/// `purchase` holds the record as last read from, or written to, the store.
#[derive(Debug, Clone)]
pub struct StepCtxData<D> {
  pub purchase_id: Uuid,
  pub requested: PurchaseStep,
  pub input: D,
  pub purchase: Option<Purchase>,
  pub patch: PurchasePatch,
  pub notice: Option<CheckoutNotice>,
  /// Set once the operator notification for this operation was delivered.
  pub notified: bool,
}

impl<D> StepCtxData<D> {
  pub fn new(purchase_id: Uuid, requested: PurchaseStep, input: D) -> Self {
    Self {
      purchase_id,
      requested,
      input,
      purchase: None,
      patch: PurchasePatch::default(),
      notice: None,
      notified: false,
    }
  }

  pub fn with_notice(mut self, notice: CheckoutNotice) -> Self {
    self.notice = Some(notice);
    self
  }
}

/// Gateway checkout's working state: the session once the provider minted it.
#[derive(Debug, Clone, Default)]
pub struct CheckoutDetail {
  pub session: Option<CheckoutSession>,
}

/// Out-of-band result of a hosted checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
  Completed,
  Failed,
}

/// What the customer is shown after step 5.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutOutcome {
  /// Send the browser to the hosted checkout page.
  Redirect {
    url: String,
    session_id: String,
    purchase: Purchase,
  },
  /// A person will be in touch; show the local confirmation page.
  ManualPending { purchase: Purchase },
}

impl CheckoutOutcome {
  pub fn purchase(&self) -> &Purchase {
    match self {
      CheckoutOutcome::Redirect { purchase, .. } | CheckoutOutcome::ManualPending { purchase } => purchase,
    }
  }
}
