use std::{path::Path, time::Duration};

use log::{debug, info};
use reqwest::StatusCode;

pub mod camera_error;
pub mod common;
pub mod direct_client;
pub mod session_client;

pub use session_client::SessionClient;

use crate::core::{
    common::http_client_factory::http_client_factory, configuration::CameraConfiguration, storage,
};
use common::{Credentials, SnapshotSource};
use direct_client::DirectClient;

const DEFAULT_USERNAME: &str = "ubnt";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Facade over the two firmware API variants.
pub struct Camera {
    source: Box<dyn SnapshotSource>,
}

impl Camera {
    pub fn new(source: Box<dyn SnapshotSource>) -> Self {
        Self { source }
    }

    /// Builds a camera client from the configuration.
    pub async fn connect(
        conf: &CameraConfiguration,
    ) -> Result<Camera, Box<dyn std::error::Error + Send + Sync>> {
        let host = match conf.host.to_owned() {
            Some(h) => h,
            None => {
                return Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "camera host is not configured",
                )))
            }
        };

        Camera::connect_to(format!("https://{}", host), conf).await
    }

    /// Builds a camera client against an explicit base URL, selecting the
    /// API variant from the configuration or by probing the camera.
    pub async fn connect_to(
        base_url: String,
        conf: &CameraConfiguration,
    ) -> Result<Camera, Box<dyn std::error::Error + Send + Sync>> {
        let credentials = build_credentials(conf)?;
        let timeout = Duration::from_secs(conf.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let api = conf.api.to_owned().unwrap_or_else(|| "auto".to_string());

        let source: Box<dyn SnapshotSource> = match api.as_str() {
            "session" => Box::new(SessionClient::new(base_url, credentials, timeout)),
            "direct" => Box::new(DirectClient::new(base_url, credentials, timeout)),
            "auto" => {
                if session_api_available(&base_url, timeout).await? {
                    info!("camera supports the session api");
                    Box::new(SessionClient::new(base_url, credentials, timeout))
                } else {
                    info!("camera has no login endpoint, falling back to the direct api");
                    Box::new(DirectClient::new(base_url, credentials, timeout))
                }
            }
            other => {
                return Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("unknown api variant: {}", other),
                )))
            }
        };

        Ok(Camera::new(source))
    }

    /// Fetches one JPEG snapshot, bytes are returned unmodified.
    pub async fn snapshot(&self) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        self.source.fetch_snapshot().await
    }

    /// Fetches one snapshot and writes it to `path`, overwriting an existing
    /// file. The fetch happens first, a failed fetch leaves the filesystem
    /// untouched.
    pub async fn save_snapshot(
        &self,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let bytes = self.snapshot().await?;

        storage::write_bytes(path, &bytes).await
    }
}

/// Builds a session flow client directly, used by the session diagnostic.
pub fn session_client(
    conf: &CameraConfiguration,
) -> Result<SessionClient, Box<dyn std::error::Error + Send + Sync>> {
    let host = match conf.host.to_owned() {
        Some(h) => h,
        None => {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "camera host is not configured",
            )))
        }
    };

    let credentials = build_credentials(conf)?;
    let timeout = Duration::from_secs(conf.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS));

    Ok(SessionClient::new(
        format!("https://{}", host),
        credentials,
        timeout,
    ))
}

fn build_credentials(
    conf: &CameraConfiguration,
) -> Result<Credentials, Box<dyn std::error::Error + Send + Sync>> {
    let username = conf
        .username
        .to_owned()
        .unwrap_or_else(|| DEFAULT_USERNAME.to_string());

    let password = match conf.password.to_owned() {
        Some(p) => p,
        None => {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "camera password is not configured",
            )))
        }
    };

    Ok(Credentials::new(username, password))
}

/// Probes the versioned login endpoint with an empty body, firmwares without
/// the session API answer 404 or 405 here. No credentials are sent.
async fn session_api_available(
    base_url: &str,
    timeout: Duration,
) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    debug!("probing the login endpoint");

    let client = http_client_factory(timeout).unwrap();

    let resp = client
        .post(format!("{}/api/1.1/login", base_url))
        .json(&serde_json::json!({}))
        .send()
        .await?;

    Ok(!matches!(
        resp.status(),
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED
    ))
}
