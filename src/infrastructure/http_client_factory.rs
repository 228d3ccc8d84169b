use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the HTTP client used for upstream polls.
    ///
    /// No retry middleware: a failed poll is simply retried on the next
    /// scheduled tick. `request_timeout` of `None` leaves requests unbounded.
    pub fn create_client(request_timeout: Option<Duration>) -> Result<Client> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(2)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ));

        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().context("Failed to build HTTP client")
    }
}
