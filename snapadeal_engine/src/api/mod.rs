//! The engine's public-facing APIs.
//!
//! Each API struct is generic over the storage traits it needs, so backends and test doubles are injected rather
//! than hard-wired. The server layer (not part of this crate) maps HTTP requests onto these calls.

pub mod auth_api;
pub mod deal_api;
pub mod deal_objects;
pub mod errors;
pub mod notification_api;
pub mod purchase_flow_api;
