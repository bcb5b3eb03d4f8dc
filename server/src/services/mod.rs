// spokehub_server/src/services/mod.rs

//! Adapters behind the core's collaborator traits.

pub mod email;
pub mod file_catalog;
pub mod payment;
pub mod purchase_store;

pub use email::{HttpEmailNotifier, LogOnlyNotifier};
pub use file_catalog::FileCatalogSource;
pub use payment::StripeCheckoutGateway;
pub use purchase_store::PgPurchaseStore;
