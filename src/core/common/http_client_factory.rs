use std::time::Duration;

use log::debug;
use reqwest::Client;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Creates the HTTP client used for camera requests.
///
/// Cameras serve self signed certificates, so certificate validation is
/// disabled. Every request carries a bounded timeout to avoid blocking the
/// polling loop indefinitely.
pub fn http_client_factory(timeout: Duration) -> Result<Client, ()> {
    debug!("creating HTTP client");

    let client = reqwest::ClientBuilder::new()
        .danger_accept_invalid_certs(true)
        .timeout(timeout)
        .user_agent(APP_USER_AGENT)
        .build()
        .expect("cannot create HTTP Client");
    Ok(client)
}
