// src/core/net.rs
// Blocking HTTPS GET. One client per run, shared by the fetch workers.

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },
    #[error("HTTP error: {status} {url}")]
    Status { url: String, status: reqwest::StatusCode },
}

#[derive(Clone, Debug)]
pub struct Http {
    client: Client,
}

impl Http {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// GET `url` and return the body. Anything but 2xx is an error.
    pub fn get(&self, url: &str) -> Result<String, FetchError> {
        let request = |source| FetchError::Request { url: s!(url), source };

        let resp = self.client.get(url).send().map_err(request)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: s!(url), status });
        }
        resp.text().map_err(request)
    }
}
