//! Portal requests made with the user's session cookie

use anyhow::{Context, Result};
use async_trait::async_trait;
use recap_core::{FormSubmission, PortalError, PortalResponse, PortalTransport};
use reqwest::header::{CONTENT_TYPE, COOKIE};

pub struct HttpPortalTransport {
    client: reqwest::Client,
    cookie: Option<String>,
}

impl HttpPortalTransport {
    pub fn new(cookie: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, cookie })
    }

    fn with_cookie(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<PortalResponse, PortalError> {
        let response = self
            .with_cookie(request)
            .send()
            .await
            .map_err(|e| PortalError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PortalError::Transport(e.to_string()))?;

        tracing::debug!(content_type = %content_type, len = bytes.len(), "Portal response");
        Ok(PortalResponse::new(&content_type, bytes.to_vec()))
    }
}

#[async_trait(?Send)]
impl PortalTransport for HttpPortalTransport {
    async fn submit_form(&self, submission: &FormSubmission) -> Result<PortalResponse, PortalError> {
        let request = if submission.method.eq_ignore_ascii_case("get") {
            self.client.get(&submission.action).query(&submission.fields)
        } else {
            self.client.post(&submission.action).form(&submission.fields)
        };
        self.send(request).await
    }

    async fn fetch(&self, url: &str) -> Result<PortalResponse, PortalError> {
        self.send(self.client.get(url)).await
    }
}
