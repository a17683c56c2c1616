use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlutterwaveApiError {
    #[error("The Flutterwave client is not configured")]
    NotConfigured,
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Request failed: {0}")]
    RequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Flutterwave declined the request: {0}")]
    Declined(String),
}
