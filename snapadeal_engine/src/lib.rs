//! Snapadeal Engine
//!
//! The core logic for the Snapadeal marketplace: merchants publish time-bounded discounted deals, admins moderate
//! them, and customers buy limited inventory through an external payment gateway. This library is server-agnostic;
//! an HTTP layer maps requests onto the APIs defined here.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`mod@sqlite`]). SQLite is the supported backend. You should never need to access the database
//!    directly; use the public APIs instead. The exception is the data types, which live in [`mod@db_types`] and are
//!    public.
//! 2. The public API ([`mod@api`]). Identity and credentials ([`AuthApi`]), the deal catalogue and its moderation
//!    machine ([`DealApi`]), the purchase and settlement flow ([`PurchaseFlowApi`]), and stored notifications
//!    ([`NotificationApi`]). Backends implement the traits in [`mod@traits`] to drive these APIs.
//!
//! The engine also emits events when deals are approved, rejected or purchased. A simple actor framework in
//! [`mod@events`] lets you hook into these and perform custom actions, such as sending email.

pub mod api;
pub mod config;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use config::EngineConfig;

pub use api::{
    auth_api::AuthApi,
    deal_api::DealApi,
    deal_objects,
    errors::{AuthApiError, DealApiError, NotificationApiError, PurchaseApiError},
    notification_api::NotificationApi,
    purchase_flow_api::{
        PaymentSignal,
        PurchaseFlowApi,
        PurchaseOutcome,
        PurchaseRequest,
        ReconcileOutcome,
    },
};
