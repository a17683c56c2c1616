use std::fmt::Debug;

use log::*;

use crate::{
    api::errors::NotificationApiError,
    db_types::{NewNotification, Notification, NotificationType},
    traits::{BroadcastAudience, NotificationManagement, UserManagement},
};

/// `NotificationApi` persists and serves per-user notifications. Delivery to an external channel (email, push) is a
/// consumer concern, driven off the engine's events; this API only owns the stored inbox.
pub struct NotificationApi<B> {
    db: B,
}

impl<B> Debug for NotificationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationApi")
    }
}

impl<B> NotificationApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> NotificationApi<B>
where B: NotificationManagement + UserManagement
{
    pub async fn notify(
        &self,
        user_id: i64,
        title: String,
        message: String,
        notification_type: NotificationType,
        data: String,
    ) -> Result<Notification, NotificationApiError> {
        let notification = NewNotification { user_id, title, message, notification_type, data };
        let notification = self.db.insert_notification(&notification).await?;
        debug!("🔔️ Notification #{} stored for account #{user_id}", notification.id);
        Ok(notification)
    }

    /// Write one notification row per recipient. Returns the number of rows written.
    pub async fn broadcast(
        &self,
        audience: BroadcastAudience,
        title: String,
        message: String,
    ) -> Result<u64, NotificationApiError> {
        let recipients = match audience {
            BroadcastAudience::Everyone => self.db.fetch_user_ids(None).await?,
            BroadcastAudience::WithRole(role) => self.db.fetch_user_ids(Some(role)).await?,
            BroadcastAudience::Users(ids) => ids,
        };
        if recipients.is_empty() {
            return Ok(0);
        }
        let notification = NewNotification {
            user_id: 0,
            title,
            message,
            notification_type: NotificationType::System,
            data: "{}".to_string(),
        };
        let written = self.db.insert_broadcast(&recipients, &notification).await?;
        info!("🔔️ Broadcast stored for {written} accounts");
        Ok(written)
    }

    pub async fn notifications_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, NotificationApiError> {
        Ok(self.db.notifications_for_user(user_id, limit, offset).await?)
    }

    pub async fn unread_count(&self, user_id: i64) -> Result<i64, NotificationApiError> {
        Ok(self.db.unread_count(user_id).await?)
    }

    /// Owner-scoped: marking someone else's notification read reports `NotificationNotFound`.
    pub async fn mark_as_read(&self, id: i64, user_id: i64) -> Result<Notification, NotificationApiError> {
        self.db.mark_as_read(id, user_id).await?.ok_or(NotificationApiError::NotificationNotFound)
    }

    pub async fn mark_all_as_read(&self, user_id: i64) -> Result<u64, NotificationApiError> {
        Ok(self.db.mark_all_as_read(user_id).await?)
    }

    pub async fn delete_notification(&self, id: i64, user_id: i64) -> Result<(), NotificationApiError> {
        if !self.db.delete_notification(id, user_id).await? {
            return Err(NotificationApiError::NotificationNotFound);
        }
        Ok(())
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
