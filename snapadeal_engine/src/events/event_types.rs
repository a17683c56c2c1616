use serde::Serialize;

use crate::db_types::{Deal, Transaction};

/// Fired when an admin approves a deal and it goes live.
#[derive(Debug, Clone, Serialize)]
pub struct DealApprovedEvent {
    pub deal: Deal,
}

impl DealApprovedEvent {
    pub fn new(deal: Deal) -> Self {
        Self { deal }
    }
}

/// Fired when an admin rejects a deal.
#[derive(Debug, Clone, Serialize)]
pub struct DealRejectedEvent {
    pub deal: Deal,
    pub reason: Option<String>,
}

impl DealRejectedEvent {
    pub fn new(deal: Deal, reason: Option<String>) -> Self {
        Self { deal, reason }
    }
}

/// Fired when a purchase transaction settles successfully and inventory has been applied.
#[derive(Debug, Clone, Serialize)]
pub struct DealPurchasedEvent {
    pub deal: Deal,
    pub transaction: Transaction,
}

impl DealPurchasedEvent {
    pub fn new(deal: Deal, transaction: Transaction) -> Self {
        Self { deal, transaction }
    }
}
