// spokehub/src/engine/context_data.rs

//! Shared, lockable state handed to every handler of a pipeline run.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared ownership plus interior mutability for the data a pipeline operates on.
///
/// Every handler receives a clone of the same `ContextData<T>`; the clones point at
/// one `RwLock<T>`, so whatever a `validate_input` step writes is visible to the
/// `persist_step` that follows it.
///
/// Guards returned by [`read`](Self::read) and [`write`](Self::write) are blocking
/// `parking_lot` guards. Drop them before any `.await`: copy what you need out of
/// the guard, release it, then call the store or the notifier.
#[derive(Debug)]
pub struct ContextData<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> ContextData<T> {
  pub fn new(data: T) -> Self {
    ContextData(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Runs `f` under a read lock and returns its result, so callers can pull a few
  /// fields out in one expression without naming the guard.
  pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
    f(&self.0.read())
  }
}

impl<T: Send + Sync + 'static> Clone for ContextData<T> {
  fn clone(&self) -> Self {
    ContextData(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for ContextData<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}
