//! `SqliteDatabase` is the concrete SQLite implementation of the marketplace storage traits.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, deals, new_pool, notifications, transactions, users};
use crate::{
    api::deal_objects::DealQueryFilter,
    db_types::{
        Category,
        Deal,
        DealStatus,
        NewDeal,
        NewNotification,
        NewTransaction,
        NewUser,
        Notification,
        Role,
        Transaction,
        TransactionStatus,
        User,
        UserStatus,
    },
    traits::{
        DealManagement,
        MarketplaceDatabase,
        NotificationManagement,
        SettlementOutcome,
        StorageError,
        TransactionManagement,
        UpdateProfileRequest,
        UserManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connect using the URL from the `SNAP_DATABASE_URL` environment variable.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl MarketplaceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }
}

impl UserManagement for SqliteDatabase {
    async fn insert_user(&self, user: &NewUser, password_hash: &str) -> Result<User, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::insert_user(user, password_hash, &mut conn).await?;
        debug!("🗃️ User #{} ({}) inserted", user.id, user.email);
        Ok(user)
    }

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_id(id, &mut conn).await?)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_email(email, &mut conn).await?)
    }

    async fn fetch_user_by_phone(&self, phone: &str) -> Result<Option<User>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_phone(phone, &mut conn).await?)
    }

    async fn set_otp(&self, user_id: i64, code: &str, expires_at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        users::set_otp(user_id, code, expires_at, &mut conn).await?;
        Ok(())
    }

    async fn consume_otp(&self, user_id: i64, code: &str, now: DateTime<Utc>) -> Result<Option<User>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::consume_otp(user_id, code, now, &mut conn).await?)
    }

    async fn set_reset_token(
        &self,
        user_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        users::set_reset_token(user_id, token, expires_at, &mut conn).await?;
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::consume_reset_token(token, new_password_hash, now, &mut conn).await?)
    }

    async fn update_last_login(&self, user_id: i64, at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        users::update_last_login(user_id, at, &mut conn).await?;
        Ok(())
    }

    async fn update_profile(&self, user_id: i64, update: &UpdateProfileRequest) -> Result<User, StorageError> {
        let mut conn = self.pool.acquire().await?;
        users::update_profile(user_id, update, &mut conn).await?.ok_or(StorageError::UserNotFound)
    }

    async fn update_user_status(&self, user_id: i64, status: UserStatus) -> Result<User, StorageError> {
        let mut conn = self.pool.acquire().await?;
        users::update_user_status(user_id, status, &mut conn).await?.ok_or(StorageError::UserNotFound)
    }

    async fn fetch_user_ids(&self, role: Option<Role>) -> Result<Vec<i64>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_ids(role, &mut conn).await?)
    }
}

impl DealManagement for SqliteDatabase {
    async fn insert_deal(
        &self,
        deal: &NewDeal,
        merchant_id: i64,
        discount_percent: i64,
    ) -> Result<Deal, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let deal = deals::insert_deal(deal, merchant_id, discount_percent, &mut conn).await?;
        debug!("🗃️ Deal #{} inserted for merchant #{merchant_id}", deal.id);
        Ok(deal)
    }

    async fn fetch_deal(&self, id: i64) -> Result<Option<Deal>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deals::fetch_deal(id, &mut conn).await?)
    }

    async fn fetch_deal_for_merchant(&self, id: i64, merchant_id: i64) -> Result<Option<Deal>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deals::fetch_deal_for_merchant(id, merchant_id, &mut conn).await?)
    }

    async fn update_deal(
        &self,
        id: i64,
        merchant_id: i64,
        deal: &NewDeal,
        discount_percent: i64,
    ) -> Result<Option<Deal>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deals::update_deal(id, merchant_id, deal, discount_percent, &mut conn).await?)
    }

    async fn set_deal_status(&self, id: i64, status: DealStatus) -> Result<Option<Deal>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deals::set_deal_status(id, status, &mut conn).await?)
    }

    async fn soft_delete_deal(&self, id: i64, merchant_id: i64) -> Result<bool, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deals::soft_delete_deal(id, merchant_id, &mut conn).await?)
    }

    async fn search_deals(&self, query: DealQueryFilter) -> Result<Vec<Deal>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deals::search_deals(query, &mut conn).await?)
    }

    async fn try_reserve(&self, deal_id: i64, quantity: i64) -> Result<Option<Deal>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deals::try_reserve(deal_id, quantity, &mut conn).await?)
    }

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deals::fetch_category(id, &mut conn).await?)
    }

    async fn categories(&self) -> Result<Vec<Category>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(deals::categories(&mut conn).await?)
    }
}

impl TransactionManagement for SqliteDatabase {
    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<Transaction, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let tx = transactions::insert_transaction(tx, &mut conn).await?;
        debug!("🗃️ Transaction #{} inserted ({} x{})", tx.id, tx.amount, tx.quantity);
        Ok(tx)
    }

    async fn fetch_transaction(&self, id: i64) -> Result<Option<Transaction>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(transactions::fetch_transaction(id, &mut conn).await?)
    }

    async fn fetch_transactions_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(transactions::fetch_transactions_for_user(user_id, limit, offset, &mut conn).await?)
    }

    async fn set_payment_reference(&self, id: i64, reference: &str) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        transactions::set_payment_reference(id, reference, &mut conn).await?;
        Ok(())
    }

    /// Claims the transaction and applies the inventory effect in one atomic database transaction. Whichever
    /// reconcile path runs first performs the claim; every later signal lands in the `AlreadySettled` branch.
    async fn settle_transaction(
        &self,
        id: i64,
        success: bool,
        payment_reference: Option<&str>,
    ) -> Result<SettlementOutcome, StorageError> {
        let mut tx = self.pool.begin().await?;
        let target = if success { TransactionStatus::Completed } else { TransactionStatus::Failed };
        let Some(claimed) = transactions::claim_pending(id, target, payment_reference, &mut tx).await? else {
            let existing = transactions::fetch_transaction(id, &mut tx)
                .await?
                .ok_or(StorageError::TransactionNotFound(id))?;
            tx.commit().await?;
            debug!("🗃️ Transaction #{id} was already settled ({})", existing.status);
            return Ok(SettlementOutcome::AlreadySettled { transaction: existing });
        };
        if !success {
            tx.commit().await?;
            debug!("🗃️ Transaction #{id} settled as failed");
            return Ok(SettlementOutcome::Settled { transaction: claimed, deal: None });
        }
        match deals::try_reserve(claimed.deal_id, claimed.quantity, &mut tx).await? {
            Some(deal) => {
                tx.commit().await?;
                debug!(
                    "🗃️ Transaction #{id} completed. Deal #{} inventory at {}/{}",
                    deal.id, deal.sold_quantity, deal.max_quantity
                );
                Ok(SettlementOutcome::Settled { transaction: claimed, deal: Some(deal) })
            },
            None => {
                let failed =
                    transactions::mark_failed(id, &mut tx).await?.ok_or(StorageError::TransactionNotFound(id))?;
                tx.commit().await?;
                warn!("🗃️ Transaction #{id} paid but deal #{} is sold out. Settled as failed.", failed.deal_id);
                Ok(SettlementOutcome::SoldOut { transaction: failed })
            },
        }
    }
}

impl NotificationManagement for SqliteDatabase {
    async fn insert_notification(&self, notification: &NewNotification) -> Result<Notification, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::insert_notification(notification, &mut conn).await?)
    }

    async fn insert_broadcast(
        &self,
        recipients: &[i64],
        notification: &NewNotification,
    ) -> Result<u64, StorageError> {
        let mut tx = self.pool.begin().await?;
        for user_id in recipients {
            notifications::insert_for_recipient(*user_id, notification, &mut tx).await?;
        }
        tx.commit().await?;
        debug!("🗃️ Broadcast written for {} recipients", recipients.len());
        Ok(recipients.len() as u64)
    }

    async fn notifications_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::notifications_for_user(user_id, limit, offset, &mut conn).await?)
    }

    async fn unread_count(&self, user_id: i64) -> Result<i64, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::unread_count(user_id, &mut conn).await?)
    }

    async fn mark_as_read(&self, id: i64, user_id: i64) -> Result<Option<Notification>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::mark_as_read(id, user_id, &mut conn).await?)
    }

    async fn mark_all_as_read(&self, user_id: i64) -> Result<u64, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::mark_all_as_read(user_id, &mut conn).await?)
    }

    async fn delete_notification(&self, id: i64, user_id: i64) -> Result<bool, StorageError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::delete_notification(id, user_id, &mut conn).await?)
    }
}
