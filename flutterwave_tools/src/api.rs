use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use snapadeal_engine::traits::{GatewayError, PaymentGateway, PaymentSessionRequest};

use crate::{
    config::FlutterwaveConfig,
    data_objects::{PaymentPayload, PaymentResponse, VerifyResponse},
    FlutterwaveApiError,
};

/// Flutterwave rejects slow clients anyway; a stuck request must not hold a purchase open longer than this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct FlutterwaveApi {
    config: FlutterwaveConfig,
    client: Arc<Client>,
}

impl FlutterwaveApi {
    pub fn new(config: FlutterwaveConfig) -> Result<Self, FlutterwaveApiError> {
        if !config.is_configured() {
            return Err(FlutterwaveApiError::NotConfigured);
        }
        let mut headers = HeaderMap::with_capacity(2);
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.secret_key.reveal()))
            .map_err(|e| FlutterwaveApiError::Initialization(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FlutterwaveApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Open a hosted payment page and return the checkout link.
    pub async fn create_payment(&self, payload: &PaymentPayload) -> Result<String, FlutterwaveApiError> {
        let url = self.url("/payments");
        debug!("Opening payment session [{}] for {} {}", payload.tx_ref, payload.amount, payload.currency);
        let response =
            self.client.post(url).json(payload).send().await.map_err(|e| FlutterwaveApiError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| FlutterwaveApiError::RequestError(e.to_string()))?;
            return Err(FlutterwaveApiError::QueryError { status, message });
        }
        let body =
            response.json::<PaymentResponse>().await.map_err(|e| FlutterwaveApiError::JsonError(e.to_string()))?;
        if body.status != "success" {
            return Err(FlutterwaveApiError::Declined(body.message));
        }
        let link = body.data.map(|d| d.link).ok_or_else(|| {
            FlutterwaveApiError::JsonError("Payment response carried no checkout link".to_string())
        })?;
        info!("Payment session [{}] opened", payload.tx_ref);
        Ok(link)
    }

    /// Ask Flutterwave whether the payment behind `tx_ref` actually went through.
    pub async fn verify_transaction(&self, tx_ref: &str) -> Result<bool, FlutterwaveApiError> {
        let url = self.url("/transactions/verify_by_reference");
        debug!("Verifying payment [{tx_ref}]");
        let response = self
            .client
            .get(url)
            .query(&[("tx_ref", tx_ref)])
            .send()
            .await
            .map_err(|e| FlutterwaveApiError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| FlutterwaveApiError::RequestError(e.to_string()))?;
            return Err(FlutterwaveApiError::QueryError { status, message });
        }
        let body =
            response.json::<VerifyResponse>().await.map_err(|e| FlutterwaveApiError::JsonError(e.to_string()))?;
        let verified = body.is_successful();
        info!("Payment [{tx_ref}] verification result: {verified}");
        Ok(verified)
    }
}

impl From<FlutterwaveApiError> for GatewayError {
    fn from(e: FlutterwaveApiError) -> Self {
        match e {
            FlutterwaveApiError::NotConfigured => GatewayError::NotConfigured,
            FlutterwaveApiError::Initialization(m) => GatewayError::Initialization(m),
            FlutterwaveApiError::Declined(m) => GatewayError::Declined(m),
            FlutterwaveApiError::QueryError { status, message } => {
                GatewayError::RequestFailed(format!("HTTP {status}: {message}"))
            },
            FlutterwaveApiError::JsonError(m) => GatewayError::InvalidResponse(m),
            FlutterwaveApiError::RequestError(m) => GatewayError::RequestFailed(m),
        }
    }
}

impl PaymentGateway for FlutterwaveApi {
    async fn create_payment_session(&self, request: &PaymentSessionRequest) -> Result<String, GatewayError> {
        let payload = PaymentPayload::from(request);
        Ok(self.create_payment(&payload).await?)
    }

    async fn verify_by_reference(&self, tx_ref: &str) -> Result<bool, GatewayError> {
        Ok(self.verify_transaction(tx_ref).await?)
    }
}
