// spokehub/src/purchase/mod.rs

pub mod data_type;
pub mod guard;
pub mod input;
pub mod model;
pub mod step;

pub use data_type::DataType;
pub use guard::{advanced_step, ensure_can_submit};
pub use input::{
  is_slug, is_valid_email, CheckoutChoice, ContactDetails, DataTypeSelection, PlanChoice, TermsAcceptance, ValidDataTypes,
};
pub use model::{NewPurchase, Purchase, PurchasePatch};
pub use step::{PaymentMethod, PaymentStatus, PurchaseStep};
