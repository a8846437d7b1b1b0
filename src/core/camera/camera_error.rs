#[derive(Debug)]
pub struct AuthenticationError {
    reason: String,
}

impl AuthenticationError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for AuthenticationError {}

#[derive(Debug)]
pub struct SessionExpiredError {
    reason: String,
}

impl SessionExpiredError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl std::fmt::Display for SessionExpiredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for SessionExpiredError {}

#[derive(Debug)]
pub struct TransportError {
    reason: String,
}

impl TransportError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for TransportError {}
