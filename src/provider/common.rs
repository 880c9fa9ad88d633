#![allow(dead_code)]
// Shared plumbing for remote timings providers: endpoint validation and
// resilient JSON fetching.

use crate::http_config::HttpConfig;
use crate::utils;
use crate::utils::circuit_breaker::get_circuit_breaker;
use anyhow::{anyhow, Result};
use url::Url;

/// Validates a timings API endpoint for security and format correctness
pub fn validate_endpoint_url(endpoint: &str) -> Result<()> {
    if endpoint.trim().is_empty() {
        return Err(anyhow!(
            "Timings endpoint cannot be empty. Please provide a valid API base URL."
        ));
    }

    let parsed_url = Url::parse(endpoint).map_err(|e| {
        anyhow!(
            "Invalid timings endpoint: {}. Please ensure the URL is properly formatted (e.g., https://api.aladhan.com/v1)",
            e
        )
    })?;

    // Enforce HTTPS; the requests embed the user's coordinates
    if parsed_url.scheme() != "https" {
        return Err(anyhow!(
            "Timings endpoint must use HTTPS. Your URL starts with '{}://'. \
             Please use an HTTPS URL instead.",
            parsed_url.scheme()
        ));
    }

    let domain = parsed_url.host_str().ok_or_else(|| {
        anyhow!(
            "Timings endpoint must have a valid domain name. The provided URL '{}' does not contain a valid host.",
            endpoint
        )
    })?;

    if domain.is_empty() {
        return Err(anyhow!("Timings endpoint domain cannot be empty."));
    }

    // Reject localhost and local network addresses
    if domain == "localhost"
        || domain.starts_with("127.")
        || domain.starts_with("192.168.")
        || domain.starts_with("10.")
        || domain.starts_with("172.16.")
    {
        return Err(anyhow!(
            "Timings endpoint cannot point to localhost or local network addresses. \
             Please use a publicly accessible API."
        ));
    }

    Ok(())
}

/// Fetch a JSON document with retry logic and a circuit breaker.
pub async fn fetch_json(request_url: &str, circuit_breaker_name: &str) -> Result<String> {
    let http_config = HttpConfig::timings_api();
    let retry_config = http_config.to_retry_config();

    let circuit_breaker = get_circuit_breaker(circuit_breaker_name).await;
    let request_url = request_url.to_string();

    circuit_breaker
        .execute(move || {
            let config = retry_config.clone();
            let http_config = http_config.clone();
            let url = request_url.clone();

            async move {
                utils::retry::retry_with_backoff(&config, move || {
                    let inner_url = url.clone();
                    let http_config = http_config.clone();
                    Box::pin(async move {
                        let client = http_config
                            .build_client()
                            .map_err(|e| anyhow!("Failed to build client: {}", e))?;

                        let response = client
                            .get(&inner_url)
                            .send()
                            .await
                            .map_err(|e| anyhow!("Request failed: {}", e))?;

                        if !response.status().is_success() {
                            let status = response.status();
                            let text = response.text().await.unwrap_or_else(|_| {
                                "Unable to read error response".to_string()
                            });
                            return Err(anyhow!("HTTP {}: {}", status, text));
                        }

                        let content = response
                            .text()
                            .await
                            .map_err(|e| anyhow!("Failed to read response body: {}", e))?;

                        // Catch captive portals and proxy error pages early
                        let trimmed = content.trim_start();
                        if trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<html") {
                            return Err(anyhow!(
                                "Invalid timings endpoint: the server returned HTML instead of JSON. \
                                 Please check the configured API base URL."
                            ));
                        }

                        if !trimmed.starts_with('{') {
                            log::warn!("Response body does not look like a JSON object");
                        }

                        Ok(content)
                    })
                })
                .await
            }
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint_url_valid() {
        assert!(validate_endpoint_url("https://api.aladhan.com/v1").is_ok());
    }

    #[test]
    fn test_validate_endpoint_url_invalid_scheme() {
        let result = validate_endpoint_url("http://api.aladhan.com/v1");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTPS"));
    }

    #[test]
    fn test_validate_endpoint_url_empty() {
        let result = validate_endpoint_url("   ");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_endpoint_url_localhost() {
        let result = validate_endpoint_url("https://localhost/v1");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("localhost"));
    }

    #[test]
    fn test_validate_endpoint_url_private_ip() {
        let result = validate_endpoint_url("https://192.168.1.10/v1");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("local network"));
    }
}
