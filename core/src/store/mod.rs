// spokehub/src/store/mod.rs

use anyhow::Error as AnyhowError;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::error::FlowError;
use crate::purchase::{NewPurchase, Purchase, PurchasePatch};

pub mod memory;

pub use memory::InMemoryPurchaseStore;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("no purchase with id {0}")]
  NotFound(Uuid),

  #[error("purchase store failure: {0}")]
  Backend(#[source] AnyhowError),
}

impl From<StoreError> for FlowError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::NotFound(id) => FlowError::PurchaseNotFound { id },
      StoreError::Backend(source) => FlowError::Persistence { source },
    }
  }
}

/// Durable home of purchase records.
///
/// `update` has partial-field semantics: only the `Some` fields of the patch
/// change, and `updated_at` is stamped by the store. It returns the record as
/// stored after the update.
#[async_trait]
pub trait PurchaseStore: Send + Sync {
  async fn create(&self, new: NewPurchase) -> Result<Purchase, StoreError>;
  async fn update(&self, id: Uuid, patch: &PurchasePatch) -> Result<Purchase, StoreError>;
  async fn get(&self, id: Uuid) -> Result<Option<Purchase>, StoreError>;
}
