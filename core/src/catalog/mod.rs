// spokehub/src/catalog/mod.rs

pub mod cache;
pub mod model;
pub mod source;

pub use cache::{Catalog, CatalogSettings, DEFAULT_CACHE_TTL_SECS, DEFAULT_HUB_VENDOR, DEFAULT_HUB_VENDOR_IDS};
pub use model::{
  BrandColors, BrandingConfig, ContractTerms, HubVendor, PricingConfig, PricingPlan, PricingTier, SocialLinks,
  SpokeIntegration, SpokeSummary, TierCriteria,
};
pub use source::{CatalogError, CatalogSource, StaticCatalogSource};
