use serde::{Deserialize, Serialize};
use snap_common::Money;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("The payment gateway is not configured")]
    NotConfigured,
    #[error("Could not initialize the payment gateway client: {0}")]
    Initialization(String),
    #[error("The payment gateway request failed: {0}")]
    RequestFailed(String),
    #[error("The payment gateway declined the request: {0}")]
    Declined(String),
    #[error("The payment gateway returned a response we could not interpret: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub email: String,
    pub phone: String,
    pub name: String,
}

/// Correlation ids echoed back by the gateway with webhook and verification payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMeta {
    pub deal_id: i64,
    pub transaction_id: i64,
    pub user_id: i64,
}

/// Everything a gateway needs to open a hosted payment session for one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSessionRequest {
    /// Unique per transaction. Used to find the transaction again when the gateway reports back.
    pub tx_ref: String,
    pub amount: Money,
    pub currency: String,
    /// Where the gateway sends the customer after payment.
    pub redirect_url: String,
    pub payment_method: String,
    pub customer: CustomerInfo,
    pub title: String,
    pub description: String,
    pub meta: PaymentMeta,
}

/// An external payment provider. The purchase flow is generic over this trait, so the concrete provider (or a stub)
/// is injected at construction.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Open a hosted payment session and return the checkout link the customer should be sent to.
    async fn create_payment_session(&self, request: &PaymentSessionRequest) -> Result<String, GatewayError>;

    /// Ask the gateway whether the payment identified by `tx_ref` actually succeeded. Returns `Ok(false)` for a
    /// payment the gateway knows about but which did not succeed.
    async fn verify_by_reference(&self, tx_ref: &str) -> Result<bool, GatewayError>;
}

/// Stand-in gateway for deployments without provider credentials. Every call fails with
/// [`GatewayError::NotConfigured`], which sends the purchase flow down its local fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGateway;

impl PaymentGateway for UnconfiguredGateway {
    async fn create_payment_session(&self, _request: &PaymentSessionRequest) -> Result<String, GatewayError> {
        Err(GatewayError::NotConfigured)
    }

    async fn verify_by_reference(&self, _tx_ref: &str) -> Result<bool, GatewayError> {
        Err(GatewayError::NotConfigured)
    }
}
