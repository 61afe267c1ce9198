use crate::core::error::SitegenError;
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone)]
pub struct BaseApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    extra_headers: HashMap<String, String>,
}

impl BaseApiClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POSTs `payload` as JSON and fails on any non-2xx status, carrying the
    /// provider's error body in the message.
    pub async fn send_request<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, SitegenError> {
        let url = format!("{}/{}", self.endpoint, path);

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json");

        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }

        let response = request.json(payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable error body>".to_string());
            tracing::warn!(%status, "completion request rejected");
            return Err(SitegenError::Completion(format!(
                "API returned {}: {}",
                status,
                body.trim()
            )));
        }

        Ok(response)
    }
}
