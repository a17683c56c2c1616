use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewUser, Role, User, UserStatus},
    traits::UpdateProfileRequest,
};

pub async fn insert_user(
    user: &NewUser,
    password_hash: &str,
    conn: &mut SqliteConnection,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as(
        r#"
            INSERT INTO users (first_name, last_name, email, phone, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(password_hash)
    .bind(user.role)
    .fetch_one(conn)
    .await?;
    Ok(user)
}

pub async fn fetch_user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await
}

pub async fn fetch_user_by_phone(phone: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE phone = $1").bind(phone).fetch_optional(conn).await
}

pub async fn set_otp(
    user_id: i64,
    code: &str,
    expires_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET otp_code = $1, otp_expires_at = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $3",
    )
    .bind(code)
    .bind(expires_at)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Verify-and-clear in one guarded update. The row only matches while the stored code equals `code` and has not
/// expired, so concurrent attempts cannot both consume it. Verification also activates a pending account.
pub async fn consume_otp(
    user_id: i64,
    code: &str,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE users SET
                otp_code = NULL,
                otp_expires_at = NULL,
                is_verified = 1,
                email_verified_at = $3,
                status = CASE WHEN status = 'Pending' THEN 'Active' ELSE status END,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND otp_code = $2 AND otp_expires_at > $3
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(code)
    .bind(now)
    .fetch_optional(conn)
    .await
}

pub async fn set_reset_token(
    user_id: i64,
    token: &str,
    expires_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET reset_token = $1, reset_token_expires_at = $2, updated_at = CURRENT_TIMESTAMP WHERE id = \
         $3",
    )
    .bind(token)
    .bind(expires_at)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// One guarded update installs the new password hash and clears the token, so a token can only ever be redeemed
/// once.
pub async fn consume_reset_token(
    token: &str,
    new_password_hash: &str,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE users SET
                password_hash = $2,
                reset_token = NULL,
                reset_token_expires_at = NULL,
                updated_at = CURRENT_TIMESTAMP
            WHERE reset_token = $1 AND reset_token_expires_at > $3
            RETURNING *;
        "#,
    )
    .bind(token)
    .bind(new_password_hash)
    .bind(now)
    .fetch_optional(conn)
    .await
}

pub async fn update_last_login(
    user_id: i64,
    at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login_at = $1 WHERE id = $2").bind(at).bind(user_id).execute(conn).await?;
    Ok(())
}

pub async fn update_profile(
    user_id: i64,
    update: &UpdateProfileRequest,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, sqlx::Error> {
    if update.is_empty() {
        return fetch_user_by_id(user_id, conn).await;
    }
    let mut builder = QueryBuilder::new("UPDATE users SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(first_name) = &update.first_name {
        set_clause.push("first_name = ");
        set_clause.push_bind_unseparated(first_name);
    }
    if let Some(last_name) = &update.last_name {
        set_clause.push("last_name = ");
        set_clause.push_bind_unseparated(last_name);
    }
    if let Some(phone) = &update.phone {
        set_clause.push("phone = ");
        set_clause.push_bind_unseparated(phone);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(user_id);
    builder.push(" RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build().fetch_optional(conn).await?.map(|row: SqliteRow| User::from_row(&row)).transpose()
}

pub async fn update_user_status(
    user_id: i64,
    status: UserStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("UPDATE users SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
        .bind(status)
        .bind(user_id)
        .fetch_optional(conn)
        .await
}

pub async fn fetch_user_ids(role: Option<Role>, conn: &mut SqliteConnection) -> Result<Vec<i64>, sqlx::Error> {
    match role {
        Some(role) => {
            sqlx::query_scalar("SELECT id FROM users WHERE role = $1 ORDER BY id").bind(role).fetch_all(conn).await
        },
        None => sqlx::query_scalar("SELECT id FROM users ORDER BY id").fetch_all(conn).await,
    }
}
