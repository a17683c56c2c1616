use sqlx::SqliteConnection;

use crate::db_types::{NewTransaction, Transaction, TransactionStatus};

pub async fn insert_transaction(
    tx: &NewTransaction,
    conn: &mut SqliteConnection,
) -> Result<Transaction, sqlx::Error> {
    let tx = sqlx::query_as(
        r#"
            INSERT INTO transactions (user_id, deal_id, quantity, amount, payment_method, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(tx.user_id)
    .bind(tx.deal_id)
    .bind(tx.quantity)
    .bind(tx.amount)
    .bind(&tx.payment_method)
    .bind(&tx.phone_number)
    .fetch_one(conn)
    .await?;
    Ok(tx)
}

pub async fn fetch_transaction(id: i64, conn: &mut SqliteConnection) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM transactions WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_transactions_for_user(
    user_id: i64,
    limit: i64,
    offset: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM transactions WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3")
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await
}

pub async fn set_payment_reference(
    id: i64,
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE transactions SET payment_reference = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(reference)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

/// The settlement claim: moves a transaction out of `Pending` into a terminal status. Only a `Pending` row matches,
/// so whichever reconcile path fires first wins and every later signal sees `None`.
pub async fn claim_pending(
    id: i64,
    status: TransactionStatus,
    payment_reference: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE transactions SET
                status = $2,
                payment_reference = COALESCE($3, payment_reference),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = 'Pending'
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(payment_reference)
    .fetch_optional(conn)
    .await
}

/// Downgrade a just-claimed transaction to `Failed`. Used inside the settlement transaction when the inventory
/// reservation falls through.
pub async fn mark_failed(id: i64, conn: &mut SqliteConnection) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as("UPDATE transactions SET status = 'Failed', updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(conn)
        .await
}
