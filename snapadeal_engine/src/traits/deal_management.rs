use crate::{
    api::deal_objects::DealQueryFilter,
    db_types::{Category, Deal, DealStatus, NewDeal},
    traits::StorageError,
};

/// Storage operations for the deal catalogue and the moderation state machine.
///
/// Status is only ever written through [`DealManagement::set_deal_status`] and the implicit reset inside
/// [`DealManagement::update_deal`]. `Expired` is a derived condition and is never stored.
#[allow(async_fn_in_trait)]
pub trait DealManagement {
    /// Insert a merchant's draft as a new `Pending` deal. The discount percentage has already been derived by the
    /// caller; the store does not recompute it.
    async fn insert_deal(&self, deal: &NewDeal, merchant_id: i64, discount_percent: i64)
        -> Result<Deal, StorageError>;

    async fn fetch_deal(&self, id: i64) -> Result<Option<Deal>, StorageError>;

    /// Fetch a deal only when it belongs to the given merchant. Returns `None` both for a missing deal and for a
    /// deal owned by someone else, so callers cannot leak existence.
    async fn fetch_deal_for_merchant(&self, id: i64, merchant_id: i64) -> Result<Option<Deal>, StorageError>;

    /// Replace a deal's editable fields with the draft and reset its status to `Pending` in the same statement.
    /// Scoped to the owning merchant; returns `None` when the deal is missing or not theirs.
    async fn update_deal(
        &self,
        id: i64,
        merchant_id: i64,
        deal: &NewDeal,
        discount_percent: i64,
    ) -> Result<Option<Deal>, StorageError>;

    async fn set_deal_status(&self, id: i64, status: DealStatus) -> Result<Option<Deal>, StorageError>;

    /// Soft-delete a merchant's deal. Historical transactions keep referring to it. Returns false when the deal is
    /// missing or not theirs.
    async fn soft_delete_deal(&self, id: i64, merchant_id: i64) -> Result<bool, StorageError>;

    async fn search_deals(&self, query: DealQueryFilter) -> Result<Vec<Deal>, StorageError>;

    /// Atomically reserve `quantity` units of inventory. The increment only happens when it keeps
    /// `sold_quantity <= max_quantity`; otherwise nothing changes and `None` is returned.
    async fn try_reserve(&self, deal_id: i64, quantity: i64) -> Result<Option<Deal>, StorageError>;

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, StorageError>;

    async fn categories(&self) -> Result<Vec<Category>, StorageError>;
}
