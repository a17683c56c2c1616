use crate::traits::{DealManagement, NotificationManagement, TransactionManagement, UserManagement};

/// The full set of storage capabilities a backend must provide to run the marketplace.
///
/// `Clone` is expected to be cheap (pool handles), since the APIs and event handlers each hold their own copy.
pub trait MarketplaceDatabase:
    Clone + UserManagement + DealManagement + TransactionManagement + NotificationManagement
{
    /// The connection URL for this database instance.
    fn url(&self) -> &str;
}
