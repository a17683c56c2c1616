use log::trace;
use sqlx::{types::Json, QueryBuilder, SqliteConnection};

use crate::{
    api::deal_objects::DealQueryFilter,
    db_types::{Category, Deal, DealStatus, NewDeal, DEFAULT_MAX_QUANTITY},
};

pub async fn insert_deal(
    deal: &NewDeal,
    merchant_id: i64,
    discount_percent: i64,
    conn: &mut SqliteConnection,
) -> Result<Deal, sqlx::Error> {
    let deal = sqlx::query_as(
        r#"
            INSERT INTO deals (
                title,
                description,
                short_description,
                original_price,
                discount_price,
                discount_percent,
                image_url,
                images,
                category_id,
                merchant_id,
                start_date,
                end_date,
                max_quantity,
                location,
                fine_prints
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *;
        "#,
    )
    .bind(&deal.title)
    .bind(&deal.description)
    .bind(&deal.short_description)
    .bind(deal.original_price)
    .bind(deal.discount_price)
    .bind(discount_percent)
    .bind(&deal.image_url)
    .bind(Json(deal.images.clone()))
    .bind(deal.category_id)
    .bind(merchant_id)
    .bind(deal.start_date)
    .bind(deal.end_date)
    .bind(deal.max_quantity.unwrap_or(DEFAULT_MAX_QUANTITY))
    .bind(&deal.location)
    .bind(&deal.fine_prints)
    .fetch_one(conn)
    .await?;
    Ok(deal)
}

pub async fn fetch_deal(id: i64, conn: &mut SqliteConnection) -> Result<Option<Deal>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM deals WHERE id = $1 AND deleted_at IS NULL").bind(id).fetch_optional(conn).await
}

pub async fn fetch_deal_for_merchant(
    id: i64,
    merchant_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Deal>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM deals WHERE id = $1 AND merchant_id = $2 AND deleted_at IS NULL")
        .bind(id)
        .bind(merchant_id)
        .fetch_optional(conn)
        .await
}

/// Replaces the editable fields and resets the status to `Pending` in the same statement, so edited content can
/// never stay publicly visible. Scoped to the owning merchant.
pub async fn update_deal(
    id: i64,
    merchant_id: i64,
    deal: &NewDeal,
    discount_percent: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Deal>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE deals SET
                title = $3,
                description = $4,
                short_description = $5,
                original_price = $6,
                discount_price = $7,
                discount_percent = $8,
                image_url = $9,
                images = $10,
                category_id = $11,
                start_date = $12,
                end_date = $13,
                max_quantity = $14,
                location = $15,
                fine_prints = $16,
                status = 'Pending',
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND merchant_id = $2 AND deleted_at IS NULL
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(merchant_id)
    .bind(&deal.title)
    .bind(&deal.description)
    .bind(&deal.short_description)
    .bind(deal.original_price)
    .bind(deal.discount_price)
    .bind(discount_percent)
    .bind(&deal.image_url)
    .bind(Json(deal.images.clone()))
    .bind(deal.category_id)
    .bind(deal.start_date)
    .bind(deal.end_date)
    .bind(deal.max_quantity.unwrap_or(DEFAULT_MAX_QUANTITY))
    .bind(&deal.location)
    .bind(&deal.fine_prints)
    .fetch_optional(conn)
    .await
}

pub async fn set_deal_status(
    id: i64,
    status: DealStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Deal>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE deals SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 AND deleted_at IS NULL \
         RETURNING *",
    )
    .bind(status)
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn soft_delete_deal(id: i64, merchant_id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE deals SET deleted_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP WHERE id = $1 AND \
         merchant_id = $2 AND deleted_at IS NULL",
    )
    .bind(id)
    .bind(merchant_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Fetches deals according to the criteria in the `DealQueryFilter`. Soft-deleted deals are always excluded;
/// results are ordered newest first.
pub async fn search_deals(query: DealQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Deal>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM deals WHERE deleted_at IS NULL");
    if let Some(merchant_id) = query.merchant_id {
        builder.push(" AND merchant_id = ");
        builder.push_bind(merchant_id);
    }
    if let Some(category_id) = query.category_id {
        builder.push(" AND category_id = ");
        builder.push_bind(category_id);
    }
    if query.status.as_ref().map(|s| !s.is_empty()).unwrap_or(false) {
        let statuses =
            query.status.as_ref().map(|s| s.iter().map(|s| format!("'{s}'")).collect::<Vec<_>>().join(",")).unwrap_or_default();
        builder.push(format!(" AND status IN ({statuses})"));
    }
    if let Some(location) = query.location {
        builder.push(" AND location LIKE ");
        builder.push_bind(format!("%{location}%"));
    }
    if let Some(term) = query.term {
        let pattern = format!("%{term}%");
        builder.push(" AND (title LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description LIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
    if let Some(at) = query.available_at {
        builder.push(" AND status = 'Approved' AND is_active = 1 AND sold_quantity < max_quantity AND end_date >= ");
        builder.push_bind(at);
    }
    builder.push(" ORDER BY created_at DESC");
    if query.limit.is_some() || query.offset.is_some() {
        // SQLite requires LIMIT before OFFSET; -1 means unbounded
        builder.push(" LIMIT ");
        builder.push_bind(query.limit.unwrap_or(-1));
        builder.push(" OFFSET ");
        builder.push_bind(query.offset.unwrap_or(0));
    }
    trace!("🗃️ Executing query: {}", builder.sql());
    let deals = builder.build_query_as::<Deal>().fetch_all(conn).await?;
    trace!("🗃️ search_deals returned {} rows", deals.len());
    Ok(deals)
}

/// Atomic inventory reservation. The guard keeps `sold_quantity` within `max_quantity`; when the remaining stock
/// cannot cover `quantity` the statement matches no row and `None` is returned, with no change made.
pub async fn try_reserve(
    deal_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Deal>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE deals SET sold_quantity = sold_quantity + $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND sold_quantity + $1 <= max_quantity AND deleted_at IS NULL
            RETURNING *;
        "#,
    )
    .bind(quantity)
    .bind(deal_id)
    .fetch_optional(conn)
    .await
}

pub async fn fetch_category(id: i64, conn: &mut SqliteConnection) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn categories(conn: &mut SqliteConnection) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories WHERE is_active = 1 ORDER BY id").fetch_all(conn).await
}
