use crate::{
    db_types::{NewNotification, Notification},
    traits::StorageError,
};

/// Storage operations for per-user notifications.
#[allow(async_fn_in_trait)]
pub trait NotificationManagement {
    async fn insert_notification(&self, notification: &NewNotification) -> Result<Notification, StorageError>;

    /// Insert one copy of the notification per recipient, in a single database transaction. Returns the number of
    /// rows written.
    async fn insert_broadcast(
        &self,
        recipients: &[i64],
        notification: &NewNotification,
    ) -> Result<u64, StorageError>;

    async fn notifications_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, StorageError>;

    async fn unread_count(&self, user_id: i64) -> Result<i64, StorageError>;

    /// Mark one notification read, scoped to its owner. Returns `None` when the notification is missing or belongs
    /// to another user.
    async fn mark_as_read(&self, id: i64, user_id: i64) -> Result<Option<Notification>, StorageError>;

    async fn mark_all_as_read(&self, user_id: i64) -> Result<u64, StorageError>;

    /// Delete a notification, scoped to its owner. Returns false when nothing was deleted.
    async fn delete_notification(&self, id: i64, user_id: i64) -> Result<bool, StorageError>;
}
