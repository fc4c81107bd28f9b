//! Shared reqwest client construction and error mapping.

use reqwest::Client;

use crate::config::ApiConfig;
use crate::ports::TransportError;

/// Builds the client used for every backend call.
///
/// No timeout is set unless one is configured.
pub fn build_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

pub(crate) fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

pub(crate) fn status_code(status: reqwest::StatusCode) -> Result<http::StatusCode, TransportError> {
    http::StatusCode::from_u16(status.as_u16()).map_err(|e| TransportError::Other(e.to_string()))
}
