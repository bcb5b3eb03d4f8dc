// spokehub/src/notify/mod.rs

use async_trait::async_trait;

pub mod render;

pub use render::{CheckoutNotice, Notification};

/// Sends a message to the operator inbox.
///
/// Delivery problems are reported through the returned flag, never as an error;
/// callers decide what a `false` means to them.
#[async_trait]
pub trait Notifier: Send + Sync {
  async fn notify(&self, title: &str, content: &str) -> bool;
}
