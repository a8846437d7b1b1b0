use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{
    header::{self, HeaderMap},
    StatusCode,
};
use tokio::sync::Mutex;

use crate::core::{
    camera::{
        camera_error::{AuthenticationError, SessionExpiredError, TransportError},
        common::{Credentials, LoginPayload, SnapshotSource, SESSION_COOKIE},
    },
    common::http_client_factory::http_client_factory,
};

/// Cookie session flow, the authoritative camera API variant.
///
/// The session token is an explicit field attached to each outgoing request,
/// there is no ambient cookie jar. At most one session is held at a time, a
/// new login overwrites the previous token.
#[derive(Clone)]
pub struct SessionClient {
    base_url: String,
    credentials: Credentials,
    session: Arc<Mutex<Option<String>>>,
    timeout: Duration,
}

enum SnapOutcome {
    Bytes(Vec<u8>),
    SessionRejected,
}

impl SessionClient {
    pub fn new(base_url: String, credentials: Credentials, timeout: Duration) -> Self {
        Self {
            base_url,
            credentials,
            session: Arc::new(Mutex::new(None)),
            timeout,
        }
    }

    /// Logs in to the camera and stores the session cookie.
    ///
    /// A 401 here means the credentials themselves were rejected, which is
    /// not retryable.
    pub async fn login(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        debug!("logging in");

        let client = http_client_factory(self.timeout).unwrap();

        let payload = LoginPayload::from(&self.credentials);

        let resp = client
            .post(format!("{}/api/1.1/login", self.base_url))
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
                "login failed with status {}",
                resp.status()
            ))));
        }

        let token = match extract_session_cookie(resp.headers()) {
            Some(t) => t,
            None => {
                return Err(Box::new(AuthenticationError::new(
                    "login response did not carry a session cookie".to_string(),
                )))
            }
        };

        let mut guard = self.session.lock().await;
        *guard = Some(token);

        Ok(())
    }

    pub async fn session_token(&self) -> Option<String> {
        (*self.session.lock().await).clone()
    }

    async fn clear_session(&self) {
        let mut guard = self.session.lock().await;
        *guard = None;
    }

    async fn try_snapshot(&self) -> Result<SnapOutcome, Box<dyn std::error::Error + Send + Sync>> {
        debug!("fetching snapshot");

        let client = http_client_factory(self.timeout).unwrap();

        let mut request = client.get(format!("{}/snap.jpeg", self.base_url));

        if let Some(token) = self.session_token().await {
            request = request.header(header::COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }

        let resp = request.send().await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Ok(SnapOutcome::SessionRejected);
        }

        if !resp.status().is_success() {
            return Err(Box::new(TransportError::new(format!(
                "snapshot request failed with status {}",
                resp.status()
            ))));
        }

        Ok(SnapOutcome::Bytes(resp.bytes().await?.to_vec()))
    }
}

#[async_trait]
impl SnapshotSource for SessionClient {
    /// Fetches one snapshot, recovering a single session expiry.
    ///
    /// The retry is an explicit two step transition: attempt, on rejection
    /// log in again and retry once, a second rejection is fatal.
    async fn fetch_snapshot(&self) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        if self.session_token().await.is_none() {
            self.login().await?;
        }

        match self.try_snapshot().await? {
            SnapOutcome::Bytes(bytes) => Ok(bytes),
            SnapOutcome::SessionRejected => {
                warn!("session was rejected by the camera, logging in again");

                self.clear_session().await;
                self.login().await?;

                match self.try_snapshot().await? {
                    SnapOutcome::Bytes(bytes) => Ok(bytes),
                    SnapOutcome::SessionRejected => Err(Box::new(SessionExpiredError::new(
                        "session rejected twice in a row".to_string(),
                    ))),
                }
            }
        }
    }
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::SET_COOKIE) {
        let raw = match value.to_str() {
            Ok(v) => v,
            Err(_) => continue,
        };

        let pair = raw.split(';').next().unwrap_or_default().trim();

        if let Some((name, token)) = pair.split_once('=') {
            if name == SESSION_COOKIE && !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    None
}
