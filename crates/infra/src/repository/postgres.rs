//! Postgres-backed inventory repository.
//!
//! ## Error Mapping
//!
//! | SQLx Error | RepositoryError |
//! |------------|-----------------|
//! | Database (any code) | `Storage` (message carries the Postgres error) |
//! | PoolClosed | `Storage` |
//! | ColumnDecode / row decode failures | `Corrupt` |
//! | Other (network, TLS, ...) | `Storage` |
//!
//! ## Column Mapping
//!
//! `types` and `tags` are `TEXT[]`, `safety_stock_by_location` is `JSONB`,
//! money/percentage fields are `NUMERIC`. SQL `NULL` maps to `None` on every
//! optional column, so an unset collection stays distinct from an empty one.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::types::Json;
use sqlx::{FromRow, Row};
use tracing::instrument;

use flowora_core::ItemId;
use flowora_inventory::{InventoryRepository, Item, RepositoryError, RepositoryResult};

const SCHEMA: &str = include_str!("../../migrations/0001_items.sql");

const ITEM_COLUMNS: &str = r#"
    id, sku, name, category, industry, sub_category, uom, status,
    tracking_type, hsn_sac, reorder_min_qty, reorder_qty, shelf_life_days,
    batch_type, importance, types, internal_manufacturing, purchase,
    std_cost, purchase_cost, sale_price, gst, mrp,
    description, internal_notes, lead_time_days, tags,
    safety_stock_by_location, default_store_id
"#;

/// Postgres adapter for [`InventoryRepository`].
///
/// `PgPool` is `Send + Sync`; each operation is a single statement, so no
/// explicit transactions are needed. Concurrent saves to one id are
/// last-write-wins under Postgres row locking.
#[derive(Debug, Clone)]
pub struct PostgresInventoryRepository {
    pool: Arc<PgPool>,
}

impl PostgresInventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect a pool to `database_url`.
    pub async fn connect(database_url: &str) -> RepositoryResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `items` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> RepositoryResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl InventoryRepository for PostgresInventoryRepository {
    #[instrument(skip(self, id), fields(item_id = %id), err)]
    async fn find_by_id(&self, id: &ItemId) -> RepositoryResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.map(|r| decode_item(&r)).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_all(&self) -> RepositoryResult<Vec<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY id ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(decode_item).collect()
    }

    #[instrument(skip(self, item), fields(item_id = %item.id), err)]
    async fn save(&self, item: Item) -> RepositoryResult<Item> {
        let sql = format!(
            r#"
            INSERT INTO items ({ITEM_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29)
            ON CONFLICT (id) DO UPDATE SET
                sku = EXCLUDED.sku,
                name = EXCLUDED.name,
                category = EXCLUDED.category,
                industry = EXCLUDED.industry,
                sub_category = EXCLUDED.sub_category,
                uom = EXCLUDED.uom,
                status = EXCLUDED.status,
                tracking_type = EXCLUDED.tracking_type,
                hsn_sac = EXCLUDED.hsn_sac,
                reorder_min_qty = EXCLUDED.reorder_min_qty,
                reorder_qty = EXCLUDED.reorder_qty,
                shelf_life_days = EXCLUDED.shelf_life_days,
                batch_type = EXCLUDED.batch_type,
                importance = EXCLUDED.importance,
                types = EXCLUDED.types,
                internal_manufacturing = EXCLUDED.internal_manufacturing,
                purchase = EXCLUDED.purchase,
                std_cost = EXCLUDED.std_cost,
                purchase_cost = EXCLUDED.purchase_cost,
                sale_price = EXCLUDED.sale_price,
                gst = EXCLUDED.gst,
                mrp = EXCLUDED.mrp,
                description = EXCLUDED.description,
                internal_notes = EXCLUDED.internal_notes,
                lead_time_days = EXCLUDED.lead_time_days,
                tags = EXCLUDED.tags,
                safety_stock_by_location = EXCLUDED.safety_stock_by_location,
                default_store_id = EXCLUDED.default_store_id
            RETURNING {ITEM_COLUMNS}
            "#
        );

        let types: Option<Vec<String>> = item.types.as_ref().map(|t| t.iter().cloned().collect());
        let safety_stock = item.safety_stock_by_location.clone().map(Json);

        let row = sqlx::query(&sql)
            .bind(item.id.as_str())
            .bind(&item.sku)
            .bind(&item.name)
            .bind(&item.category)
            .bind(&item.industry)
            .bind(&item.sub_category)
            .bind(&item.uom)
            .bind(&item.status)
            .bind(&item.tracking_type)
            .bind(&item.hsn_sac)
            .bind(item.reorder_min_qty)
            .bind(item.reorder_qty)
            .bind(item.shelf_life_days)
            .bind(&item.batch_type)
            .bind(&item.importance)
            .bind(types)
            .bind(item.internal_manufacturing)
            .bind(item.purchase)
            .bind(item.std_cost)
            .bind(item.purchase_cost)
            .bind(item.sale_price)
            .bind(item.gst)
            .bind(item.mrp)
            .bind(&item.description)
            .bind(&item.internal_notes)
            .bind(item.lead_time_days)
            .bind(&item.tags)
            .bind(safety_stock)
            .bind(&item.default_store_id)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("save", e))?;

        decode_item(&row)
    }

    #[instrument(skip(self, id), fields(item_id = %id), err)]
    async fn delete_by_id(&self, id: &ItemId) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;
        Ok(())
    }

    #[instrument(skip(self, id), fields(item_id = %id), err)]
    async fn exists_by_id(&self, id: &ItemId) -> RepositoryResult<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1) AS found")
            .bind(id.as_str())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists_by_id", e))?;

        row.try_get::<bool, _>("found")
            .map_err(|e| RepositoryError::Corrupt(e.to_string()))
    }
}

// SQLx row types

#[derive(Debug)]
struct ItemRow {
    id: String,
    sku: String,
    name: String,
    category: String,
    industry: Option<String>,
    sub_category: Option<String>,
    uom: String,
    status: String,
    tracking_type: Option<String>,
    hsn_sac: Option<String>,
    reorder_min_qty: Option<i32>,
    reorder_qty: Option<i32>,
    shelf_life_days: Option<i32>,
    batch_type: Option<String>,
    importance: Option<String>,
    types: Option<Vec<String>>,
    internal_manufacturing: Option<bool>,
    purchase: Option<bool>,
    std_cost: Option<Decimal>,
    purchase_cost: Option<Decimal>,
    sale_price: Option<Decimal>,
    gst: Option<Decimal>,
    mrp: Option<Decimal>,
    description: Option<String>,
    internal_notes: Option<String>,
    lead_time_days: Option<i32>,
    tags: Option<Vec<String>>,
    safety_stock_by_location: Option<Json<BTreeMap<String, i32>>>,
    default_store_id: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for ItemRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ItemRow {
            id: row.try_get("id")?,
            sku: row.try_get("sku")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            industry: row.try_get("industry")?,
            sub_category: row.try_get("sub_category")?,
            uom: row.try_get("uom")?,
            status: row.try_get("status")?,
            tracking_type: row.try_get("tracking_type")?,
            hsn_sac: row.try_get("hsn_sac")?,
            reorder_min_qty: row.try_get("reorder_min_qty")?,
            reorder_qty: row.try_get("reorder_qty")?,
            shelf_life_days: row.try_get("shelf_life_days")?,
            batch_type: row.try_get("batch_type")?,
            importance: row.try_get("importance")?,
            types: row.try_get("types")?,
            internal_manufacturing: row.try_get("internal_manufacturing")?,
            purchase: row.try_get("purchase")?,
            std_cost: row.try_get("std_cost")?,
            purchase_cost: row.try_get("purchase_cost")?,
            sale_price: row.try_get("sale_price")?,
            gst: row.try_get("gst")?,
            mrp: row.try_get("mrp")?,
            description: row.try_get("description")?,
            internal_notes: row.try_get("internal_notes")?,
            lead_time_days: row.try_get("lead_time_days")?,
            tags: row.try_get("tags")?,
            safety_stock_by_location: row.try_get("safety_stock_by_location")?,
            default_store_id: row.try_get("default_store_id")?,
        })
    }
}

impl TryFrom<ItemRow> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let id = ItemId::parse(row.id).map_err(|e| RepositoryError::Corrupt(e.to_string()))?;

        Ok(Item {
            id,
            sku: row.sku,
            name: row.name,
            category: row.category,
            industry: row.industry,
            sub_category: row.sub_category,
            uom: row.uom,
            status: row.status,
            tracking_type: row.tracking_type,
            hsn_sac: row.hsn_sac,
            reorder_min_qty: row.reorder_min_qty,
            reorder_qty: row.reorder_qty,
            shelf_life_days: row.shelf_life_days,
            batch_type: row.batch_type,
            importance: row.importance,
            types: row.types.map(|t| t.into_iter().collect::<BTreeSet<_>>()),
            internal_manufacturing: row.internal_manufacturing,
            purchase: row.purchase,
            std_cost: row.std_cost,
            purchase_cost: row.purchase_cost,
            sale_price: row.sale_price,
            gst: row.gst,
            mrp: row.mrp,
            description: row.description,
            internal_notes: row.internal_notes,
            lead_time_days: row.lead_time_days,
            tags: row.tags,
            safety_stock_by_location: row.safety_stock_by_location.map(|Json(m)| m),
            default_store_id: row.default_store_id,
        })
    }
}

fn decode_item(row: &PgRow) -> RepositoryResult<Item> {
    let row = ItemRow::from_row(row).map_err(|e| RepositoryError::Corrupt(e.to_string()))?;
    Item::try_from(row)
}

/// Map SQLx errors to repository errors.
fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.to_string()).unwrap_or_default();
            RepositoryError::storage(
                operation,
                format!("database error [{code}]: {}", db_err.message()),
            )
        }
        sqlx::Error::PoolClosed => RepositoryError::storage(operation, "connection pool closed"),
        sqlx::Error::ColumnDecode { index, source } => {
            RepositoryError::Corrupt(format!("column {index}: {source}"))
        }
        sqlx::Error::Decode(source) => RepositoryError::Corrupt(source.to_string()),
        other => RepositoryError::storage(operation, other.to_string()),
    }
}
