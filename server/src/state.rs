// spokehub_server/src/state.rs
use crate::config::AppConfig;
use spokehub::{EnquiryDesk, PurchaseFlow};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub flow: Arc<PurchaseFlow>,
  pub enquiries: Arc<EnquiryDesk>,
  pub config: Arc<AppConfig>,
}
