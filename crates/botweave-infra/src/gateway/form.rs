//! Form-intake client for the booking wizard.
//!
//! Posts completed booking forms as JSON to an external intake endpoint
//! (a hosted form service). No authentication; the endpoint URL is the
//! only secret-adjacent piece and lives in config.

use reqwest::Client;

use botweave_core::booking::FormIntake;
use botweave_types::booking::BookingRequest;
use botweave_types::gateway::GatewayError;

/// HTTP client for the booking form endpoint.
#[derive(Debug, Clone)]
pub struct FormClient {
    client: Client,
    endpoint: String,
}

impl FormClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl FormIntake for FormClient {
    async fn submit(&self, request: &BookingRequest) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
