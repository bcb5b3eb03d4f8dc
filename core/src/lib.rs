// src/lib.rs

//! Spokehub: the purchase funnel of an integration marketplace.
//!
//! Customers pick a hub platform and a spoke integration, then walk a five-step
//! wizard (contact details, data types, plan, terms, checkout). Every step is
//! validated, written to a [`PurchaseStore`](store::PurchaseStore), and
//! reported to a human operator through a [`Notifier`](notify::Notifier).
//!
//! Each wizard operation runs as a small async [`Pipeline`] of named steps with
//! before/on/after hooks over a shared [`ContextData`]. The catalog (hubs,
//! spokes, branding, pricing) is served through a TTL cache with an injectable
//! [`Clock`](clock::Clock).

pub mod catalog;
pub mod clock;
pub mod engine;
pub mod enquiry;
pub mod error;
pub mod flow;
pub mod notify;
pub mod payment;
pub mod purchase;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::engine::{ContextData, Pipeline, PipelineControl, PipelineResult, StepDef};
pub use crate::error::{FlowError, FlowResult, ValidationError};

pub use crate::catalog::{Catalog, CatalogError, CatalogSettings, CatalogSource};
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::enquiry::{ContactMessage, EnquiryDesk, IntegrationRequest};
pub use crate::flow::{CheckoutOutcome, FlowDeps, FlowSettings, PaymentOutcome, PurchaseFlow};
pub use crate::notify::Notifier;
pub use crate::payment::{CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentGateway};
pub use crate::purchase::{
  ContactDetails, DataType, DataTypeSelection, PaymentMethod, PaymentStatus, PlanChoice, Purchase, PurchaseStep,
  TermsAcceptance,
};
pub use crate::store::{InMemoryPurchaseStore, PurchaseStore, StoreError};
