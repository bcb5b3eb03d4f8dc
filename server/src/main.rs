// spokehub_server/src/main.rs

mod config;
mod errors;
mod models;
mod services;
mod state;
mod web;

use crate::config::{AppConfig, LogFormat};
use crate::services::{FileCatalogSource, HttpEmailNotifier, LogOnlyNotifier, PgPurchaseStore, StripeCheckoutGateway};
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use spokehub::payment::UnconfiguredPaymentGateway;
use spokehub::{
  Catalog, CatalogSettings, Clock, EnquiryDesk, FlowDeps, FlowSettings, InMemoryPurchaseStore, Notifier,
  PaymentGateway, PurchaseFlow, PurchaseStore, SystemClock,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let builder = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

async fn purchase_store(config: &AppConfig) -> anyhow::Result<Arc<dyn PurchaseStore>> {
  let Some(database_url) = config.database_url.as_deref() else {
    tracing::warn!("DATABASE_URL not set; purchases are kept in memory and lost on restart.");
    return Ok(Arc::new(InMemoryPurchaseStore::new()));
  };
  let pool = PgPoolOptions::new()
    .max_connections(10)
    .connect(database_url)
    .await
    .context("connecting to the database")?;
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .context("running database migrations")?;
  tracing::info!("Connected to the database; migrations applied.");
  Ok(Arc::new(PgPurchaseStore::new(pool)))
}

fn notifier(config: &AppConfig) -> anyhow::Result<Arc<dyn Notifier>> {
  match (&config.email_api_url, &config.email_api_key, &config.notification_email) {
    (Some(url), Some(key), Some(to)) => {
      let email = HttpEmailNotifier::new(url, key.clone(), to.clone(), config.email_sender_name.clone())
        .context("building the email client")?;
      tracing::info!(recipient = %to, "Operator notifications go out by email.");
      Ok(Arc::new(email))
    }
    _ => {
      tracing::warn!("Email API not fully configured; operator notifications are only logged.");
      Ok(Arc::new(LogOnlyNotifier))
    }
  }
}

async fn payment_gateway(config: &AppConfig, catalog: &Catalog) -> anyhow::Result<Arc<dyn PaymentGateway>> {
  if let Some(secret) = &config.stripe_secret_key {
    let gateway =
      StripeCheckoutGateway::new(&config.stripe_api_base, secret.clone()).context("building the payment client")?;
    return Ok(Arc::new(gateway));
  }
  let contact = match &config.sales_contact_email {
    Some(contact) => contact.clone(),
    None => {
      catalog
        .branding()
        .await
        .context("SALES_CONTACT_EMAIL is unset and branding.json could not supply a contact")?
        .contact_email
    }
  };
  tracing::warn!(%contact, "No payment credentials; hosted checkout will refer customers to sales.");
  Ok(Arc::new(UnconfiguredPaymentGateway::new(contact)))
}

async fn build_state(config: Arc<AppConfig>) -> anyhow::Result<AppState> {
  let clock: Arc<dyn Clock> = Arc::new(SystemClock);
  let source = FileCatalogSource::new(config.catalog_dir.clone());
  tracing::info!(dir = %source.root().display(), "Serving catalog from disk.");
  let catalog = Arc::new(Catalog::new(
    Arc::new(source),
    clock.clone(),
    CatalogSettings {
      ttl: chrono::Duration::seconds(config.catalog_cache_ttl_secs),
      hub_vendor_ids: config.hub_vendor_ids.clone(),
      default_hub_vendor: config.default_hub_vendor.clone(),
    },
  ));

  let notifier = notifier(&config)?;
  let payments = payment_gateway(&config, &catalog).await?;
  let store = purchase_store(&config).await?;

  let flow = PurchaseFlow::new(
    FlowDeps {
      store,
      notifier: notifier.clone(),
      payments,
      catalog,
      clock,
    },
    FlowSettings::new(config.template_id.clone(), config.app_base_url.clone()),
  );

  Ok(AppState {
    flow: Arc::new(flow),
    enquiries: Arc::new(EnquiryDesk::new(notifier)),
    config,
  })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let loaded = AppConfig::from_env();
  init_tracing(loaded.as_ref().map(|c| c.log_format).unwrap_or(LogFormat::Pretty));

  let app_config = match loaded {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  tracing::info!("Starting spokehub server...");

  let app_state = match build_state(app_config.clone()).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = ?e, "Failed to initialise the purchase flow.");
      return Err(std::io::Error::other(format!("{:#}", e)));
    }
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
