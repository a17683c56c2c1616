use crate::{
    db_types::{NewTransaction, Transaction},
    traits::{SettlementOutcome, StorageError},
};

/// Storage operations for purchase transactions.
#[allow(async_fn_in_trait)]
pub trait TransactionManagement {
    /// Insert a new `Pending` transaction. The amount has been computed server-side and never changes afterwards.
    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<Transaction, StorageError>;

    async fn fetch_transaction(&self, id: i64) -> Result<Option<Transaction>, StorageError>;

    async fn fetch_transactions_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, StorageError>;

    /// Attach the gateway's payment reference to a pending transaction.
    async fn set_payment_reference(&self, id: i64, reference: &str) -> Result<(), StorageError>;

    /// Settle a transaction exactly once.
    ///
    /// The claim is a guarded update that only matches a `Pending` row; if it matches nothing the transaction has
    /// already been settled and [`SettlementOutcome::AlreadySettled`] is returned. On a successful claim with
    /// `success == true`, the inventory reservation runs inside the same database transaction; if the deal can no
    /// longer cover the quantity the transaction is settled as `Failed` and [`SettlementOutcome::SoldOut`] is
    /// returned.
    async fn settle_transaction(
        &self,
        id: i64,
        success: bool,
        payment_reference: Option<&str>,
    ) -> Result<SettlementOutcome, StorageError>;
}
