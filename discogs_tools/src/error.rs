use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscogsApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Rate limit reached. Wait {wait_secs}s before retrying")]
    RateLimited { wait_secs: u64 },
    #[error("The catalog returned an empty response")]
    EmptyResponse,
}
