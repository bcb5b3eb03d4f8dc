// spokehub_server/src/services/purchase_store.rs

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::models::PurchaseRow;
use spokehub::purchase::{NewPurchase, PurchasePatch};
use spokehub::store::StoreError;
use spokehub::{DataType, Purchase, PurchaseStore};

/// Purchases in the Postgres `purchases` table.
#[derive(Debug, Clone)]
pub struct PgPurchaseStore {
  pool: PgPool,
}

impl PgPurchaseStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn backend(err: sqlx::Error, what: &'static str) -> StoreError {
  StoreError::Backend(anyhow::Error::new(err).context(what))
}

fn into_purchase(row: PurchaseRow) -> Result<Purchase, StoreError> {
  let id = row.id;
  Purchase::try_from(row)
    .with_context(|| format!("purchase {} has an unreadable column", id))
    .map_err(StoreError::Backend)
}

#[async_trait]
impl PurchaseStore for PgPurchaseStore {
  #[instrument(name = "pg_store::create", skip_all, fields(purchase_id = %new.id))]
  async fn create(&self, new: NewPurchase) -> Result<Purchase, StoreError> {
    let row = sqlx::query_as::<_, PurchaseRow>(
      r#"
      INSERT INTO purchases (
        id, step, hub_vendor_id, hub_vendor_name, spoke_integration_id, spoke_integration_name,
        customer_name, customer_email, template_id
      )
      VALUES ($1, 'data_types', $2, $3, $4, $5, $6, $7, $8)
      RETURNING *
      "#,
    )
    .bind(new.id)
    .bind(&new.hub_vendor_id)
    .bind(&new.hub_vendor_name)
    .bind(&new.spoke_integration_id)
    .bind(&new.spoke_integration_name)
    .bind(&new.customer_name)
    .bind(&new.customer_email)
    .bind(&new.template_id)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| backend(e, "inserting purchase"))?;
    debug!("Purchase row inserted.");
    into_purchase(row)
  }

  /// Each column keeps its value unless the patch supplies one.
  #[instrument(name = "pg_store::update", skip(self, patch))]
  async fn update(&self, id: Uuid, patch: &PurchasePatch) -> Result<Purchase, StoreError> {
    let row = sqlx::query_as::<_, PurchaseRow>(
      r#"
      UPDATE purchases SET
        step                = COALESCE($2, step),
        selected_data_types = COALESCE($3, selected_data_types),
        other_data_types    = COALESCE($4, other_data_types),
        selected_plan       = COALESCE($5, selected_plan),
        pricing_tier        = COALESCE($6, pricing_tier),
        payment_amount      = COALESCE($7, payment_amount),
        payment_currency    = COALESCE($8, payment_currency),
        terms_accepted      = COALESCE($9, terms_accepted),
        terms_accepted_at   = COALESCE($10, terms_accepted_at),
        payment_status      = COALESCE($11, payment_status),
        payment_method      = COALESCE($12, payment_method),
        checkout_session_id = COALESCE($13, checkout_session_id),
        paid_at             = COALESCE($14, paid_at),
        notification_sent   = COALESCE($15, notification_sent),
        updated_at          = NOW()
      WHERE id = $1
      RETURNING *
      "#,
    )
    .bind(id)
    .bind(patch.step.map(|s| s.as_str()))
    .bind(patch.selected_data_types.as_deref().map(DataType::join))
    .bind(patch.other_data_types.as_deref())
    .bind(patch.selected_plan.as_deref())
    .bind(patch.pricing_tier.as_deref())
    .bind(patch.payment_amount.as_deref())
    .bind(patch.payment_currency.as_deref())
    .bind(patch.terms_accepted)
    .bind(patch.terms_accepted_at)
    .bind(patch.payment_status.map(|s| s.as_str()))
    .bind(patch.payment_method.map(|m| m.as_str()))
    .bind(patch.checkout_session_id.as_deref())
    .bind(patch.paid_at)
    .bind(patch.notification_sent)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| backend(e, "updating purchase"))?
    .ok_or(StoreError::NotFound(id))?;
    into_purchase(row)
  }

  #[instrument(name = "pg_store::get", skip(self))]
  async fn get(&self, id: Uuid) -> Result<Option<Purchase>, StoreError> {
    sqlx::query_as::<_, PurchaseRow>("SELECT * FROM purchases WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(|e| backend(e, "loading purchase"))?
      .map(into_purchase)
      .transpose()
  }
}
