//! Flutterwave client for the Snapadeal marketplace.
//!
//! Wraps the Flutterwave v3 REST API (hosted payment pages and payment verification) and implements the engine's
//! [`snapadeal_engine::traits::PaymentGateway`] trait, so the purchase flow can be constructed over a live gateway
//! instead of the unconfigured stub.

mod api;
mod config;
mod data_objects;
mod error;

pub use api::FlutterwaveApi;
pub use config::FlutterwaveConfig;
pub use data_objects::{
    CustomerPayload,
    Customizations,
    PaymentLink,
    PaymentMetaItem,
    PaymentPayload,
    PaymentResponse,
    VerifyData,
    VerifyResponse,
};
pub use error::FlutterwaveApiError;
