//! reqwest-backed request executor

use super::credentials::Credentials;
use super::types::{ExecRequest, ExecResponse, RequestExecutor, ResponseHeaders};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

/// Executes page requests over HTTP with reqwest
pub struct HttpExecutor {
    client: Client,
    credentials: Credentials,
}

impl HttpExecutor {
    /// Create an executor with the given credentials
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", crate::NAME, crate::VERSION))
            .build()?;

        Ok(Self {
            client,
            credentials,
        })
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, request: &ExecRequest) -> Result<ExecResponse> {
        let mut req = self
            .client
            .request(request.method.into(), request.url.clone())
            .timeout(request.timeout);

        if let Some(ref body) = request.body {
            req = req
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.clone());
        }

        req = self.credentials.apply(req);

        let response = req
            .send()
            .await
            .map_err(|e| transport_error(e, request))?;

        let status = response.status().as_u16();
        let headers = ResponseHeaders::from_header_map(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, request))?;

        debug!(
            "{} {} -> {} ({} bytes)",
            request.method,
            request.url,
            status,
            body.len()
        );

        Ok(ExecResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

fn transport_error(error: reqwest::Error, request: &ExecRequest) -> Error {
    if error.is_timeout() {
        Error::Timeout {
            timeout_ms: request.timeout.as_millis() as u64,
        }
    } else {
        Error::Http(error)
    }
}
