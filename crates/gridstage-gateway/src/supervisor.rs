use gridstage_core::gateway::{GatewayError, RunDataGateway};
use gridstage_core::model::{RunDefinition, RunStatus};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-over-HTTP gateway to the supervisor's store facade. Each staging
/// invocation builds one of these, issues at most two reads and one delete,
/// and exits; there is no connection reuse across invocations.
pub struct SupervisorGateway {
    client: Client,
    base_url: String,
}

impl SupervisorGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Unavailable(format!("http client init failed: {e}")))?;

        Ok(SupervisorGateway {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, resource: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, resource, key)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, key: &str) -> Result<T, GatewayError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(GatewayError::RunNotFound(key.to_string())),
            status if !status.is_success() => Err(GatewayError::Unavailable(format!(
                "GET {} returned HTTP {}",
                url,
                status.as_u16()
            ))),
            _ => {
                let body = response
                    .text()
                    .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
                Ok(serde_json::from_str(&body)?)
            }
        }
    }
}

impl RunDataGateway for SupervisorGateway {
    fn fetch_run_definition(&self, run_id: &str) -> Result<RunDefinition, GatewayError> {
        let url = self.endpoint("run-definition", run_id);
        tracing::debug!("Fetching run definition: {}", url);
        self.get_json(&url, run_id)
    }

    fn fetch_run_status(&self, request_group: &str) -> Result<RunStatus, GatewayError> {
        let url = self.endpoint("run-status", request_group);
        tracing::debug!("Fetching run status: {}", url);
        self.get_json(&url, request_group)
    }

    fn clear_previous_results(&self, run_id: &str) -> Result<(), GatewayError> {
        let url = self.endpoint("run-results", run_id);
        tracing::debug!("Clearing previous results: {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(GatewayError::Unavailable(format!(
                "DELETE {} returned HTTP {}",
                url,
                status.as_u16()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let gateway = SupervisorGateway::new("http://supervisor:8080/").unwrap();
        assert_eq!(
            gateway.endpoint("run-definition", "17"),
            "http://supervisor:8080/run-definition/17"
        );
    }

    #[test]
    fn test_endpoint_plain_base() {
        let gateway = SupervisorGateway::new("http://localhost:8080").unwrap();
        assert_eq!(
            gateway.endpoint("run-status", "build-42"),
            "http://localhost:8080/run-status/build-42"
        );
    }
}
