use serde::{Deserialize, Serialize};

use crate::db_types::{Deal, Role, Transaction};

/// The result of applying a settlement signal to a transaction at the store boundary.
///
/// Settlement is a guarded, single-shot transition: only a `Pending` transaction can be settled, and the inventory
/// increment is part of the same database transaction as the status change. Every reconcile path funnels through
/// this one operation, which is what makes reconciliation idempotent.
#[derive(Debug, Clone)]
pub enum SettlementOutcome {
    /// The transaction was settled by this call. `deal` carries the updated deal record when inventory was applied
    /// (i.e. the transaction completed); it is `None` for a failed settlement.
    Settled { transaction: Transaction, deal: Option<Deal> },
    /// A success signal arrived, but the remaining inventory could no longer cover the transaction's quantity.
    /// The transaction has been settled as `Failed` with no inventory effect.
    SoldOut { transaction: Transaction },
    /// The transaction had already reached a terminal state before this call. Nothing was changed.
    AlreadySettled { transaction: Transaction },
}

/// Selects the recipients of a broadcast notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BroadcastAudience {
    Everyone,
    WithRole(Role),
    Users(Vec<i64>),
}

/// Partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone.is_none()
    }
}
