use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

/// Name of the session cookie issued by the login endpoint.
pub const SESSION_COOKIE: &str = "authId";

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

#[derive(Serialize, Debug)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

impl From<&Credentials> for LoginPayload {
    fn from(credentials: &Credentials) -> Self {
        Self {
            username: credentials.username.to_owned(),
            password: credentials.password.to_owned(),
        }
    }
}

/// A snapshot retrieval strategy, one implementation per firmware API variant.
#[automock]
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>;
}
