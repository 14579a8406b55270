// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Remote Env Source
//!
//! Fetches a `.env` file by URL ahead of parsing. The fetch is a distinct,
//! separable operation: its failures are whole-operation errors, reported
//! to the caller as such and never folded into line-level parse warnings.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

/// Default per-request timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default response size cap (matches the import service's input cap)
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Remote server returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Remote file exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

/// HTTP source for remote `.env` files.
pub struct RemoteEnvSource {
    client: Client,
    timeout: Duration,
    max_bytes: usize,
}

impl RemoteEnvSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Fetch the file body. Timeouts surface as [`FetchError::Network`];
    /// any non-2xx status is an error. Decoding is left to the import
    /// service so encoding failures land in its error taxonomy.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(length) = response.content_length() {
            if length as usize > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        if body.len() > self.max_bytes {
            return Err(FetchError::TooLarge {
                limit: self.max_bytes,
            });
        }

        Ok(body.to_vec())
    }
}

impl Default for RemoteEnvSource {
    fn default() -> Self {
        Self::new()
    }
}
