// spokehub_server/src/models/mod.rs

//! Database row shapes.

pub mod purchase;

pub use purchase::PurchaseRow;
