// spokehub/src/catalog/source.rs

use anyhow::Error as AnyhowError;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use super::model::{BrandingConfig, HubVendor, PricingConfig, SpokeIntegration};

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("{kind} '{id}' was not found in the catalog")]
  NotFound { kind: &'static str, id: String },

  #[error("Failed to load {what} from the catalog. Source: {source}")]
  Load {
    what: String,
    #[source]
    source: AnyhowError,
  },
}

impl CatalogError {
  pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
    CatalogError::NotFound { kind, id: id.into() }
  }

  pub fn load(what: impl Into<String>, source: impl Into<AnyhowError>) -> Self {
    CatalogError::Load {
      what: what.into(),
      source: source.into(),
    }
  }
}

/// Where catalog documents come from. Implementations fail loudly on missing
/// data rather than returning empty values.
#[async_trait]
pub trait CatalogSource: Send + Sync {
  async fn hub_vendor(&self, id: &str) -> Result<HubVendor, CatalogError>;
  async fn spoke_integrations(&self) -> Result<Vec<SpokeIntegration>, CatalogError>;
  async fn branding(&self) -> Result<BrandingConfig, CatalogError>;
  async fn pricing(&self) -> Result<PricingConfig, CatalogError>;
}

/// A catalog held entirely in memory. Backs the tests and the benchmark.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
  hub_vendors: HashMap<String, HubVendor>,
  spoke_integrations: Option<Vec<SpokeIntegration>>,
  branding: Option<BrandingConfig>,
  pricing: Option<PricingConfig>,
}

impl StaticCatalogSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_hub_vendor(mut self, hub: HubVendor) -> Self {
    self.hub_vendors.insert(hub.id.clone(), hub);
    self
  }

  pub fn with_spoke_integrations(mut self, spokes: Vec<SpokeIntegration>) -> Self {
    self.spoke_integrations = Some(spokes);
    self
  }

  pub fn with_branding(mut self, branding: BrandingConfig) -> Self {
    self.branding = Some(branding);
    self
  }

  pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
    self.pricing = Some(pricing);
    self
  }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
  async fn hub_vendor(&self, id: &str) -> Result<HubVendor, CatalogError> {
    self
      .hub_vendors
      .get(id)
      .cloned()
      .ok_or_else(|| CatalogError::not_found("hub vendor", id))
  }

  async fn spoke_integrations(&self) -> Result<Vec<SpokeIntegration>, CatalogError> {
    self
      .spoke_integrations
      .clone()
      .ok_or_else(|| CatalogError::not_found("spoke integrations", "spoke-integrations"))
  }

  async fn branding(&self) -> Result<BrandingConfig, CatalogError> {
    self
      .branding
      .clone()
      .ok_or_else(|| CatalogError::not_found("branding", "branding"))
  }

  async fn pricing(&self) -> Result<PricingConfig, CatalogError> {
    self
      .pricing
      .clone()
      .ok_or_else(|| CatalogError::not_found("pricing", "pricing"))
  }
}
