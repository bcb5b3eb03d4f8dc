// spokehub/src/catalog/model.rs

//! Read-only reference data: hub vendors, spoke integrations, branding, pricing.
//! Field names follow the camelCase JSON the catalog files are written in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubVendor {
  pub id: String,
  pub name: String,
  pub description: String,
  #[serde(default)]
  pub logo: String,
  #[serde(default)]
  pub categories: Vec<String>,
  #[serde(default)]
  pub data_points: Vec<String>,
  #[serde(default)]
  pub features: Vec<String>,
  /// Ids of the spokes this hub can connect to.
  #[serde(default)]
  pub spoke_integrations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpokeIntegration {
  pub id: String,
  pub name: String,
  pub description: String,
  #[serde(default)]
  pub logo: String,
  #[serde(default)]
  pub categories: Vec<String>,
  #[serde(default = "default_available")]
  pub available: bool,
}

fn default_available() -> bool {
  true
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandColors {
  pub primary: String,
  pub accent: String,
  pub background: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
  #[serde(default)]
  pub twitter: Option<String>,
  #[serde(default)]
  pub linkedin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingConfig {
  pub company_name: String,
  #[serde(default)]
  pub logo: String,
  pub contact_email: String,
  #[serde(default, rename = "contactPhoneUK")]
  pub contact_phone_uk: Option<String>,
  #[serde(default, rename = "contactPhoneUS")]
  pub contact_phone_us: Option<String>,
  #[serde(default)]
  pub address: Option<String>,
  #[serde(default)]
  pub about_us: Option<String>,
  #[serde(default)]
  pub tagline: Option<String>,
  #[serde(default)]
  pub colors: BrandColors,
  #[serde(default)]
  pub social: SocialLinks,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCriteria {
  #[serde(default)]
  pub data_volume: Option<String>,
  #[serde(default)]
  pub sync_frequency: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub price: Decimal,
  pub currency: String,
  pub interval: String,
  #[serde(default)]
  pub features: Vec<String>,
  #[serde(default)]
  pub criteria: TierCriteria,
}

/// A selectable plan. `price` accepts either a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
  pub id: String,
  pub name: String,
  pub sync_interval: String,
  pub price: Decimal,
  pub currency: String,
  pub billing_period: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub features: Vec<String>,
  #[serde(default)]
  pub popular: bool,
}

impl PricingPlan {
  /// Price as stored on a purchase: the configured value, never rounded,
  /// padded to at least two decimal places.
  pub fn price_snapshot(&self) -> String {
    let price = self.price.normalize();
    if price.scale() < 2 {
      format!("{:.2}", price)
    } else {
      price.to_string()
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTerms {
  pub minimum_period: String,
  pub sync_interval_changes: String,
  #[serde(default)]
  pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
  #[serde(default)]
  pub tiers: Vec<PricingTier>,
  #[serde(default)]
  pub plans: Vec<PricingPlan>,
  #[serde(default)]
  pub contract_terms: Option<ContractTerms>,
}

impl PricingConfig {
  pub fn plan(&self, plan_id: &str) -> Option<&PricingPlan> {
    self.plans.iter().find(|p| p.id == plan_id)
  }
}

/// What the hub page lists for each connectable spoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpokeSummary {
  pub id: String,
  pub name: String,
  pub description: String,
  pub logo: String,
  pub available: bool,
}

impl From<&SpokeIntegration> for SpokeSummary {
  fn from(spoke: &SpokeIntegration) -> Self {
    Self {
      id: spoke.id.clone(),
      name: spoke.name.clone(),
      description: spoke.description.clone(),
      logo: spoke.logo.clone(),
      available: spoke.available,
    }
  }
}
