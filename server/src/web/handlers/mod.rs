// spokehub_server/src/web/handlers/mod.rs

pub mod catalog_handlers;
pub mod enquiry_handlers;
pub mod purchase_handlers;
