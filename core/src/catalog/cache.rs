// spokehub/src/catalog/cache.rs

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::model::{BrandingConfig, HubVendor, PricingConfig, PricingPlan, SpokeIntegration, SpokeSummary};
use super::source::{CatalogError, CatalogSource};
use crate::clock::Clock;

pub const DEFAULT_CACHE_TTL_SECS: i64 = 60;
pub const DEFAULT_HUB_VENDOR: &str = "hubspot";
pub const DEFAULT_HUB_VENDOR_IDS: [&str; 6] = ["hubspot", "autotask", "halo", "servicenow", "jira", "connectwise"];

#[derive(Debug, Clone)]
pub struct CatalogSettings {
  pub ttl: Duration,
  /// Hubs listed on the landing page, in display order.
  pub hub_vendor_ids: Vec<String>,
  pub default_hub_vendor: String,
}

impl Default for CatalogSettings {
  fn default() -> Self {
    Self {
      ttl: Duration::seconds(DEFAULT_CACHE_TTL_SECS),
      hub_vendor_ids: DEFAULT_HUB_VENDOR_IDS.iter().map(|s| s.to_string()).collect(),
      default_hub_vendor: DEFAULT_HUB_VENDOR.to_string(),
    }
  }
}

struct CacheEntry {
  loaded_at: DateTime<Utc>,
  value: Arc<dyn Any + Send + Sync>,
}

/// Read-through, time-bounded cache in front of a [`CatalogSource`].
///
/// An entry is served while it is younger than the TTL and reloaded on the
/// first read after that. Failed loads are never cached, so a missing file
/// keeps failing until it appears. Staleness only delays catalog edits from
/// showing up.
pub struct Catalog {
  source: Arc<dyn CatalogSource>,
  clock: Arc<dyn Clock>,
  settings: CatalogSettings,
  entries: Mutex<HashMap<String, CacheEntry>>,
}

impl std::fmt::Debug for Catalog {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Catalog")
      .field("settings", &self.settings)
      .field("cached_entries", &self.entries.lock().len())
      .finish()
  }
}

impl Catalog {
  pub fn new(source: Arc<dyn CatalogSource>, clock: Arc<dyn Clock>, settings: CatalogSettings) -> Self {
    Self {
      source,
      clock,
      settings,
      entries: Mutex::new(HashMap::new()),
    }
  }

  pub fn settings(&self) -> &CatalogSettings {
    &self.settings
  }

  fn lookup<T: Clone + 'static>(&self, key: &str) -> Option<T> {
    let now = self.clock.now();
    let mut entries = self.entries.lock();
    let fresh = match entries.get(key) {
      Some(entry) => now - entry.loaded_at < self.settings.ttl,
      None => return None,
    };
    if !fresh {
      entries.remove(key);
      debug!(key, "Catalog entry expired.");
      return None;
    }
    entries.get(key).and_then(|entry| entry.value.downcast_ref::<T>().cloned())
  }

  async fn cached<T, F, Fut>(&self, key: String, load: F) -> Result<T, CatalogError>
  where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
  {
    if let Some(hit) = self.lookup::<T>(&key) {
      return Ok(hit);
    }
    let value = load().await?;
    let entry = CacheEntry {
      loaded_at: self.clock.now(),
      value: Arc::new(value.clone()),
    };
    self.entries.lock().insert(key, entry);
    Ok(value)
  }

  #[instrument(name = "catalog::hub_vendor", skip(self))]
  pub async fn hub_vendor(&self, id: &str) -> Result<HubVendor, CatalogError> {
    self.cached(format!("hub-vendor:{id}"), || self.source.hub_vendor(id)).await
  }

  /// Every configured hub, in configured order. One missing hub fails the list.
  pub async fn hub_vendors(&self) -> Result<Vec<HubVendor>, CatalogError> {
    let mut hubs = Vec::with_capacity(self.settings.hub_vendor_ids.len());
    for id in &self.settings.hub_vendor_ids {
      hubs.push(self.hub_vendor(id).await?);
    }
    Ok(hubs)
  }

  pub async fn default_hub_vendor(&self) -> Result<HubVendor, CatalogError> {
    self.hub_vendor(&self.settings.default_hub_vendor).await
  }

  pub async fn spoke_integrations(&self) -> Result<Vec<SpokeIntegration>, CatalogError> {
    self.cached("spoke-integrations".to_string(), || self.source.spoke_integrations()).await
  }

  /// The spokes `hub_id` supports, in catalog order. Ids the hub lists but the
  /// spoke catalog lacks are dropped.
  #[instrument(name = "catalog::spokes_for_hub", skip(self))]
  pub async fn spoke_integrations_for_hub(&self, hub_id: &str) -> Result<Vec<SpokeSummary>, CatalogError> {
    let hub = self.hub_vendor(hub_id).await?;
    let spokes = self.spoke_integrations().await?;
    Ok(
      spokes
        .iter()
        .filter(|spoke| hub.spoke_integrations.contains(&spoke.id))
        .map(SpokeSummary::from)
        .collect(),
    )
  }

  pub async fn branding(&self) -> Result<BrandingConfig, CatalogError> {
    self.cached("branding".to_string(), || self.source.branding()).await
  }

  pub async fn pricing(&self) -> Result<PricingConfig, CatalogError> {
    self.cached("pricing".to_string(), || self.source.pricing()).await
  }

  /// Looks `plan_id` up in the current pricing. `Ok(None)` means the pricing
  /// loaded but has no such plan.
  pub async fn resolve_plan(&self, plan_id: &str) -> Result<Option<PricingPlan>, CatalogError> {
    let pricing = self.pricing().await?;
    Ok(pricing.plan(plan_id).cloned())
  }

  /// Drops every cached entry.
  pub fn clear(&self) {
    let mut entries = self.entries.lock();
    debug!(count = entries.len(), "Clearing catalog cache.");
    entries.clear();
  }
}
