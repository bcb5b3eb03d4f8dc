// spokehub_server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use spokehub::catalog::{DEFAULT_CACHE_TTL_SECS, DEFAULT_HUB_VENDOR, DEFAULT_HUB_VENDOR_IDS};
use spokehub::flow::DEFAULT_TEMPLATE_ID;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Without a database the purchases live in memory and vanish on restart.
  pub database_url: Option<String>,
  pub app_base_url: String,

  pub catalog_dir: PathBuf,
  pub catalog_cache_ttl_secs: i64,
  pub default_hub_vendor: String,
  pub hub_vendor_ids: Vec<String>,
  pub template_id: String,

  /// Operator inbox. Notifications are only logged when any of the email
  /// settings is missing.
  pub notification_email: Option<String>,
  pub email_api_url: Option<String>,
  pub email_api_key: Option<String>,
  pub email_sender_name: String,

  pub stripe_secret_key: Option<String>,
  pub stripe_api_base: String,
  /// Shown to customers when hosted checkout is unavailable. Falls back to the
  /// catalog's branding contact.
  pub sales_contact_email: Option<String>,

  pub operator_token: Option<String>,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source. Blank values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| lookup(var_name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|| format!("http://{}:{}", server_host, server_port));

    let catalog_cache_ttl_secs = match get_env("CATALOG_CACHE_TTL_SECS") {
      Some(raw) => raw
        .parse::<i64>()
        .ok()
        .filter(|secs| *secs >= 0)
        .ok_or_else(|| AppError::Config(format!("Invalid CATALOG_CACHE_TTL_SECS: '{}'", raw)))?,
      None => DEFAULT_CACHE_TTL_SECS,
    };

    let hub_vendor_ids = match get_env("HUB_VENDOR_IDS") {
      Some(raw) => {
        let ids: Vec<String> = raw
          .split(',')
          .map(str::trim)
          .filter(|id| !id.is_empty())
          .map(str::to_string)
          .collect();
        if ids.is_empty() {
          return Err(AppError::Config("HUB_VENDOR_IDS lists no hub vendors".to_string()));
        }
        ids
      }
      None => DEFAULT_HUB_VENDOR_IDS.iter().map(|id| id.to_string()).collect(),
    };

    let log_format = match get_env("LOG_FORMAT").as_deref() {
      None | Some("pretty") => LogFormat::Pretty,
      Some("json") => LogFormat::Json,
      Some(other) => {
        return Err(AppError::Config(format!(
          "Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'",
          other
        )))
      }
    };

    Ok(Self {
      server_host,
      server_port,
      database_url: get_env("DATABASE_URL"),
      app_base_url,
      catalog_dir: PathBuf::from(get_env("CATALOG_DIR").unwrap_or_else(|| "catalog".to_string())),
      catalog_cache_ttl_secs,
      default_hub_vendor: get_env("DEFAULT_HUB_VENDOR").unwrap_or_else(|| DEFAULT_HUB_VENDOR.to_string()),
      hub_vendor_ids,
      template_id: get_env("TEMPLATE_ID").unwrap_or_else(|| DEFAULT_TEMPLATE_ID.to_string()),
      notification_email: get_env("NOTIFICATION_EMAIL"),
      email_api_url: get_env("EMAIL_API_URL"),
      email_api_key: get_env("EMAIL_API_KEY"),
      email_sender_name: get_env("EMAIL_SENDER_NAME").unwrap_or_else(|| "Spokehub".to_string()),
      stripe_secret_key: get_env("STRIPE_SECRET_KEY"),
      stripe_api_base: get_env("STRIPE_API_BASE").unwrap_or_else(|| "https://api.stripe.com".to_string()),
      sales_contact_email: get_env("SALES_CONTACT_EMAIL"),
      operator_token: get_env("OPERATOR_TOKEN"),
      log_format,
    })
  }
}
