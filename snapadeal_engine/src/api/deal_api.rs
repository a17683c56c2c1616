use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    api::{deal_objects::DealQueryFilter, errors::DealApiError},
    db_types::{
        Category,
        Deal,
        DealStatus,
        NewDeal,
        NewNotification,
        NotificationType,
        Role,
        MAX_DEAL_IMAGES,
    },
    events::{DealApprovedEvent, DealRejectedEvent, EventProducers},
    traits::{DealManagement, NotificationManagement, UserManagement},
};

/// `DealApi` drives the deal catalogue and its moderation state machine.
///
/// Merchants submit and edit drafts, admins approve or reject them, and customers browse the approved set. Status
/// only ever moves through these calls; `Expired` is derived from the end date and is never written.
pub struct DealApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for DealApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DealApi")
    }
}

impl<B> DealApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> DealApi<B>
where B: DealManagement + UserManagement + NotificationManagement
{
    /// Submit a new deal draft. The caller must hold the Merchant role. The draft lands in `Pending` and stays
    /// invisible to customers until an admin approves it.
    pub async fn submit_deal(&self, merchant_id: i64, deal: NewDeal) -> Result<Deal, DealApiError> {
        self.require_role(merchant_id, Role::Merchant).await?;
        self.validate_draft(&deal).await?;
        let discount_percent = deal.discount_percent();
        let deal = self.db.insert_deal(&deal, merchant_id, discount_percent).await?;
        info!("🏷️ Merchant #{merchant_id} submitted deal #{} ({})", deal.id, deal.title);
        Ok(deal)
    }

    /// Edit a deal. Owner-only; a missing deal and someone else's deal are both `DealNotFound`. Every edit resets
    /// the status to `Pending`, in the same update, so edited content always goes back through moderation.
    pub async fn update_deal(&self, merchant_id: i64, deal_id: i64, deal: NewDeal) -> Result<Deal, DealApiError> {
        self.validate_draft(&deal).await?;
        let discount_percent = deal.discount_percent();
        let deal = self
            .db
            .update_deal(deal_id, merchant_id, &deal, discount_percent)
            .await?
            .ok_or(DealApiError::DealNotFound)?;
        info!("🏷️ Deal #{deal_id} edited by merchant #{merchant_id}; back to moderation queue");
        Ok(deal)
    }

    /// Approve a deal. Admin-only. Approving an already-approved deal re-applies the status and re-notifies the
    /// merchant; this is deliberate and lets admins re-confirm after an accidental rejection.
    pub async fn approve_deal(&self, admin_id: i64, deal_id: i64) -> Result<Deal, DealApiError> {
        self.require_role(admin_id, Role::Admin).await?;
        let deal = self.db.set_deal_status(deal_id, DealStatus::Approved).await?.ok_or(DealApiError::DealNotFound)?;
        info!("🏷️ Deal #{deal_id} approved by admin #{admin_id}");
        self.notify_merchant(
            &deal,
            NotificationType::DealApproved,
            "Deal approved".to_string(),
            format!("Your deal \"{}\" has been approved and is now live.", deal.title),
        )
        .await;
        for emitter in &self.producers.deal_approved_producer {
            emitter.publish_event(DealApprovedEvent::new(deal.clone())).await;
        }
        Ok(deal)
    }

    /// Reject a deal. Admin-only. The merchant can edit and re-submit.
    pub async fn reject_deal(
        &self,
        admin_id: i64,
        deal_id: i64,
        reason: Option<String>,
    ) -> Result<Deal, DealApiError> {
        self.require_role(admin_id, Role::Admin).await?;
        let deal = self.db.set_deal_status(deal_id, DealStatus::Rejected).await?.ok_or(DealApiError::DealNotFound)?;
        info!("🏷️ Deal #{deal_id} rejected by admin #{admin_id}");
        let message = match &reason {
            Some(r) => format!("Your deal \"{}\" was rejected: {r}", deal.title),
            None => format!("Your deal \"{}\" was rejected.", deal.title),
        };
        self.notify_merchant(&deal, NotificationType::DealRejected, "Deal rejected".to_string(), message).await;
        for emitter in &self.producers.deal_rejected_producer {
            emitter.publish_event(DealRejectedEvent::new(deal.clone(), reason.clone())).await;
        }
        Ok(deal)
    }

    /// Withdraw (soft-delete) a deal. Owner-only. Historical transactions keep referring to the deal.
    pub async fn withdraw_deal(&self, merchant_id: i64, deal_id: i64) -> Result<(), DealApiError> {
        if !self.db.soft_delete_deal(deal_id, merchant_id).await? {
            return Err(DealApiError::DealNotFound);
        }
        info!("🏷️ Deal #{deal_id} withdrawn by merchant #{merchant_id}");
        Ok(())
    }

    pub async fn fetch_deal(&self, deal_id: i64) -> Result<Deal, DealApiError> {
        self.db.fetch_deal(deal_id).await?.ok_or(DealApiError::DealNotFound)
    }

    /// A merchant's view of one of their own deals. Someone else's deal and a missing deal are both `DealNotFound`,
    /// so the call never leaks whether a given id exists.
    pub async fn merchant_deal(&self, merchant_id: i64, deal_id: i64) -> Result<Deal, DealApiError> {
        self.db.fetch_deal_for_merchant(deal_id, merchant_id).await?.ok_or(DealApiError::DealNotFound)
    }

    /// The public storefront view: approved, active, unexpired deals with stock remaining.
    pub async fn active_deals(&self, filter: DealQueryFilter) -> Result<Vec<Deal>, DealApiError> {
        let filter = filter.available_at(Utc::now());
        Ok(self.db.search_deals(filter).await?)
    }

    /// A merchant's own deals, in any status.
    pub async fn merchant_deals(&self, merchant_id: i64, filter: DealQueryFilter) -> Result<Vec<Deal>, DealApiError> {
        let filter = filter.with_merchant_id(merchant_id);
        Ok(self.db.search_deals(filter).await?)
    }

    /// The moderation queue.
    pub async fn pending_deals(&self) -> Result<Vec<Deal>, DealApiError> {
        let filter = DealQueryFilter::default().with_status(DealStatus::Pending);
        Ok(self.db.search_deals(filter).await?)
    }

    /// Public full-text-ish search over the storefront set.
    pub async fn search_deals(&self, term: String, filter: DealQueryFilter) -> Result<Vec<Deal>, DealApiError> {
        let filter = filter.with_term(term).available_at(Utc::now());
        Ok(self.db.search_deals(filter).await?)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, DealApiError> {
        Ok(self.db.categories().await?)
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    async fn require_role(&self, user_id: i64, role: Role) -> Result<(), DealApiError> {
        let user = self.db.fetch_user_by_id(user_id).await?.ok_or(DealApiError::UserNotFound)?;
        if user.role != role {
            warn!("🏷️ Account #{user_id} ({}) attempted an action requiring the {role} role", user.role);
            return Err(DealApiError::Forbidden);
        }
        Ok(())
    }

    async fn validate_draft(&self, deal: &NewDeal) -> Result<(), DealApiError> {
        if deal.title.trim().is_empty() {
            return Err(DealApiError::InvalidInput("Title is required".to_string()));
        }
        if deal.description.trim().is_empty() {
            return Err(DealApiError::InvalidInput("Description is required".to_string()));
        }
        if deal.end_date <= deal.start_date {
            return Err(DealApiError::InvalidInput("End date must be after the start date".to_string()));
        }
        if deal.original_price.value() <= 0 {
            return Err(DealApiError::InvalidInput("Original price must be positive".to_string()));
        }
        if deal.discount_price.value() <= 0 || deal.discount_price >= deal.original_price {
            return Err(DealApiError::InvalidInput(
                "Discount price must be positive and below the original price".to_string(),
            ));
        }
        if deal.images.len() > MAX_DEAL_IMAGES {
            return Err(DealApiError::InvalidInput(format!("A deal may carry at most {MAX_DEAL_IMAGES} images")));
        }
        if let Some(qty) = deal.max_quantity {
            if qty <= 0 {
                return Err(DealApiError::InvalidInput("Maximum quantity must be positive".to_string()));
            }
        }
        let category = self.db.fetch_category(deal.category_id).await?;
        match category {
            Some(c) if c.is_active => Ok(()),
            _ => Err(DealApiError::CategoryNotFound(deal.category_id)),
        }
    }

    /// Inline persistence of the merchant-facing notification. Failures are logged and swallowed; moderation must
    /// not roll back because a notification row could not be written.
    async fn notify_merchant(&self, deal: &Deal, kind: NotificationType, title: String, message: String) {
        let notification = NewNotification {
            user_id: deal.merchant_id,
            title,
            message,
            notification_type: kind,
            data: serde_json::json!({ "deal_id": deal.id }).to_string(),
        };
        if let Err(e) = self.db.insert_notification(&notification).await {
            warn!("🏷️ Could not write {kind} notification for deal #{}: {e}", deal.id);
        }
    }
}
