use reqwest::Client;
use tracing::debug;

use crate::{WorkerConfig, WorkerError};

/// Create a reqwest Client with the provided configuration
pub fn create_client(config: &WorkerConfig) -> Result<Client, WorkerError> {
    let mut client_builder = Client::builder()
        .pool_max_idle_per_host(5) // Allow multiple connections to same host
        .user_agent(&config.user_agent)
        .default_headers(config.headers.clone())
        .redirect(if config.follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        });

    if !config.timeout.is_zero() {
        client_builder = client_builder.timeout(config.timeout);
    }

    if !config.connect_timeout.is_zero() {
        client_builder = client_builder.connect_timeout(config.connect_timeout);
    }

    debug!(
        user_agent = %config.user_agent,
        follow_redirects = config.follow_redirects,
        "Created HTTP client for worker fetches"
    );

    client_builder.build().map_err(WorkerError::from)
}
