// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, ApiEnvelope};

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ApiConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Send a request and unwrap the `{success, message, data}` envelope.
pub async fn send_enveloped<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    let url = response.url().to_string();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        // Error responses still carry the envelope message when the backend produced them.
        if let Ok(envelope) = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&bytes) {
            if let Some(message) = envelope.message {
                return Err(AppError::api(message));
            }
        }
        return Err(AppError::Status {
            status: status.as_u16(),
            url,
        });
    }

    let envelope: ApiEnvelope<T> = serde_json::from_slice(&bytes)?;
    envelope.into_data()
}
