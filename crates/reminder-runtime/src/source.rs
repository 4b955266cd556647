//! Authenticated access to the task API.

use async_trait::async_trait;
use reminder_core::Auth;
use reqwest::header::{AUTHORIZATION, COOKIE};
use reqwest::StatusCode;
use tracing::debug;

use crate::error::{Result, RuntimeError};

/// Where the pipeline reads iterations and tasks from.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// GETs `url` and returns the body of a 200 response.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Task source over HTTP.
pub struct HttpTaskSource {
    client: reqwest::Client,
    auth: Auth,
}

impl HttpTaskSource {
    /// Creates a source sending `auth` with every request.
    pub fn new(client: reqwest::Client, auth: Auth) -> Self {
        Self { client, auth }
    }
}

#[async_trait]
impl TaskSource for HttpTaskSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let request = match &self.auth {
            Auth::Cookie(cookie) => self.client.get(url).header(COOKIE, cookie),
            Auth::Token(token) => self.client.get(url).header(AUTHORIZATION, format!("Bearer {token}")),
        };

        let response = request.send().await?;
        let status = response.status();
        debug!(url, status = %status, "Fetched");
        if status != StatusCode::OK {
            return Err(RuntimeError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
