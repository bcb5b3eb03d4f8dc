// spokehub_server/src/services/file_catalog.rs

//! Catalog documents read from a directory of JSON files:
//!
//! ```text
//! <root>/hub-vendors/<id>.json
//! <root>/spoke-integrations.json
//! <root>/branding.json
//! <root>/pricing.json
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use spokehub::catalog::{BrandingConfig, HubVendor, PricingConfig, SpokeIntegration};
use spokehub::purchase::is_slug;
use spokehub::{CatalogError, CatalogSource};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct FileCatalogSource {
  root: PathBuf,
}

impl FileCatalogSource {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  async fn read_json<T: DeserializeOwned>(&self, relative: &str) -> Result<Option<T>, CatalogError> {
    let path = self.root.join(relative);
    debug!(path = %path.display(), "Reading catalog document.");
    let bytes = match tokio::fs::read(&path).await {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(CatalogError::load(relative, e)),
    };
    serde_json::from_slice(&bytes)
      .map(Some)
      .map_err(|e| CatalogError::load(relative, e))
  }

  async fn require_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T, CatalogError> {
    self
      .read_json(relative)
      .await?
      .ok_or_else(|| CatalogError::load(relative, anyhow::anyhow!("{} is missing", self.root.join(relative).display())))
  }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
  #[instrument(name = "file_catalog::hub_vendor", skip(self))]
  async fn hub_vendor(&self, id: &str) -> Result<HubVendor, CatalogError> {
    if !is_slug(id) {
      return Err(CatalogError::not_found("hub vendor", id));
    }
    self
      .read_json(&format!("hub-vendors/{}.json", id))
      .await?
      .ok_or_else(|| CatalogError::not_found("hub vendor", id))
  }

  async fn spoke_integrations(&self) -> Result<Vec<SpokeIntegration>, CatalogError> {
    self.require_json("spoke-integrations.json").await
  }

  async fn branding(&self) -> Result<BrandingConfig, CatalogError> {
    self.require_json("branding.json").await
  }

  async fn pricing(&self) -> Result<PricingConfig, CatalogError> {
    self.require_json("pricing.json").await
  }
}
