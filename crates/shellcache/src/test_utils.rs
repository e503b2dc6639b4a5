//! Test support: a canned-response fetcher that records how many requests
//! actually reached the "network".

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::error::WorkerError;
use crate::fetch::{FetchRequest, FetchResponse, Fetcher};

#[inline]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer() // Write to test output
        .try_init();
}

/// Stub network transport. URLs registered with [`respond`](Self::respond)
/// return 200 with the given body, URLs registered with
/// [`fail`](Self::fail) return a connection error, and everything else
/// returns 404. Every call increments the counter.
pub(crate) struct StubFetcher {
    responses: HashMap<String, Bytes>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self {
            responses: HashMap::new(),
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn respond(mut self, url: &str, body: &'static str) -> Self {
        self.responses
            .insert(url.to_owned(), Bytes::from_static(body.as_bytes()));
        self
    }

    pub(crate) fn fail(mut self, url: &str) -> Self {
        self.failing.insert(url.to_owned());
        self
    }

    /// Number of fetches that reached this stub
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, WorkerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let url = request.url.as_str();

        if self.failing.contains(url) {
            return Err(WorkerError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("connection refused: {url}"),
            )));
        }

        match self.responses.get(url) {
            Some(body) => Ok(FetchResponse {
                status: StatusCode::OK,
                headers: HeaderMap::new(),
                body: body.clone(),
            }),
            None => Ok(FetchResponse {
                status: StatusCode::NOT_FOUND,
                headers: HeaderMap::new(),
                body: Bytes::new(),
            }),
        }
    }
}
