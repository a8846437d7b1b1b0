use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;

use crate::core::{
    camera::{
        camera_error::{AuthenticationError, TransportError},
        common::{Credentials, LoginPayload, SnapshotSource},
    },
    common::http_client_factory::http_client_factory,
};

/// Single call flow for firmwares without the session API.
///
/// Credentials travel in the request body on every call, there is no login
/// step and no session state. Best effort fallback, the cookie session flow
/// is the authoritative variant.
#[derive(Clone)]
pub struct DirectClient {
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
}

impl DirectClient {
    pub fn new(base_url: String, credentials: Credentials, timeout: Duration) -> Self {
        Self {
            base_url,
            credentials,
            timeout,
        }
    }
}

#[async_trait]
impl SnapshotSource for DirectClient {
    async fn fetch_snapshot(&self) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        debug!("fetching snapshot over the direct api");

        let client = http_client_factory(self.timeout).unwrap();

        let payload = LoginPayload::from(&self.credentials);

        let resp = client
            .post(format!("{}/api/1.2/snapshot", self.base_url))
            .json(&payload)
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(Box::new(AuthenticationError::new(
                "invalid credentials".to_string(),
            )));
        }

        if !resp.status().is_success() {
            return Err(Box::new(TransportError::new(format!(
                "snapshot request failed with status {}",
                resp.status()
            ))));
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
