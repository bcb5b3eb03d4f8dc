// spokehub/src/store/memory.rs

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{PurchaseStore, StoreError};
use crate::clock::{Clock, SystemClock};
use crate::purchase::{NewPurchase, Purchase, PurchasePatch};

/// Purchases kept in a map. Used by tests, the benchmark, and the server when
/// no database is configured.
pub struct InMemoryPurchaseStore {
  clock: Arc<dyn Clock>,
  records: RwLock<HashMap<Uuid, Purchase>>,
}

impl InMemoryPurchaseStore {
  pub fn new() -> Self {
    Self::with_clock(Arc::new(SystemClock))
  }

  pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
    Self {
      clock,
      records: RwLock::new(HashMap::new()),
    }
  }

  pub fn len(&self) -> usize {
    self.records.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.read().is_empty()
  }
}

impl Default for InMemoryPurchaseStore {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl PurchaseStore for InMemoryPurchaseStore {
  async fn create(&self, new: NewPurchase) -> Result<Purchase, StoreError> {
    let purchase = new.into_purchase(self.clock.now());
    let mut records = self.records.write();
    if records.contains_key(&purchase.id) {
      return Err(StoreError::Backend(anyhow!("duplicate purchase id {}", purchase.id)));
    }
    records.insert(purchase.id, purchase.clone());
    Ok(purchase)
  }

  async fn update(&self, id: Uuid, patch: &PurchasePatch) -> Result<Purchase, StoreError> {
    let now = self.clock.now();
    let mut records = self.records.write();
    let purchase = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
    purchase.apply(patch, now);
    Ok(purchase.clone())
  }

  async fn get(&self, id: Uuid) -> Result<Option<Purchase>, StoreError> {
    Ok(self.records.read().get(&id).cloned())
  }
}
