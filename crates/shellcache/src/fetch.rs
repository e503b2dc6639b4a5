//! # Fetch Model
//!
//! Request and response descriptors for intercepted fetches, plus the
//! [`Fetcher`] trait that abstracts the network transport. The production
//! implementation is [`HttpFetcher`] over reqwest; tests substitute a stub
//! to observe which requests actually reach the network.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use url::Url;

use crate::error::WorkerError;

/// One outgoing navigation or sub-resource request. Read-only from the
/// worker's perspective; it is matched or forwarded, never mutated.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// HTTP method of the request
    pub method: Method,
    /// Absolute URL of the request
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
}

impl FetchRequest {
    /// Create a request with the given method and absolute URL
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self, WorkerError> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            headers: HeaderMap::new(),
        })
    }

    /// Create a GET request for the given absolute URL
    pub fn get(url: impl AsRef<str>) -> Result<Self, WorkerError> {
        Self::new(Method::GET, url)
    }
}

/// A stored or live response snapshot: status, headers and a fully
/// buffered body.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body bytes
    pub body: Bytes,
}

impl FetchResponse {
    /// Whether the status code is in the 2xx range
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Content-Type header value, if present and valid UTF-8
    pub fn content_type(&self) -> Option<String> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }
}

/// Network transport used by the worker for manifest fetches and cache-miss
/// forwarding.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform the request against the network and buffer the full response
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, WorkerError>;
}

/// Production fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher around an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, WorkerError> {
        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_constructors() {
        let req = FetchRequest::get("https://app.example.com/web/app.html").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.as_str(), "https://app.example.com/web/app.html");
        assert!(req.headers.is_empty());

        let post = FetchRequest::new(Method::POST, "https://app.example.com/api").unwrap();
        assert_eq!(post.method, Method::POST);
    }

    #[test]
    fn test_request_invalid_url() {
        let err = FetchRequest::get("not a url").unwrap_err();
        assert!(matches!(err, WorkerError::UrlError(_)));
    }

    #[test]
    fn test_response_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            "text/html".parse().unwrap(),
        );
        let response = FetchResponse {
            status: StatusCode::OK,
            headers,
            body: Bytes::from_static(b"<html></html>"),
        };
        assert!(response.is_success());
        assert_eq!(response.content_type().as_deref(), Some("text/html"));
    }
}
