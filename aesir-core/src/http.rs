//! HTTP client abstraction for outbound API calls
//!
//! The live-status checker only needs a single GET whose body it treats as
//! opaque text. Going through this trait keeps the checker testable with a
//! mock that returns canned statuses and bodies, without any network.
//!
//! The default implementation wraps reqwest and applies no timeout of its own.

use async_trait::async_trait;
use reqwest;
use std::collections::HashMap;
use crate::Error;

/// Status code and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A generic trait for making HTTP requests.
///
/// `Err` is reserved for transport failures. A response that arrived with a
/// non-2xx status is still `Ok`, so callers can log the status and body.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error>;
}

#[derive(Clone, Default)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
        let mut request = self.client.get(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
