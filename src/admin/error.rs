use std::fmt;

/// Errors from talking to the panel's HTTP side.
#[derive(Debug)]
pub enum AdminError {
    /// Client could not be built, or a path didn't resolve against the base URL.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The panel answered with a non-success HTTP status.
    Api { status: u16, message: String },
    /// The panel's answer was not the JSON we expected.
    Parse(String),
    /// Login form was accepted but no login cookie came back.
    LoginRejected,
    /// The panel bounced the request to its login page.
    NotLoggedIn,
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::Config(msg) => write!(f, "config error: {msg}"),
            AdminError::Network(msg) => write!(f, "network error: {msg}"),
            AdminError::Api { status, message } => {
                write!(f, "panel error (HTTP {status}): {message}")
            }
            AdminError::Parse(msg) => write!(f, "parse error: {msg}"),
            AdminError::LoginRejected => write!(f, "wrong name or password"),
            AdminError::NotLoggedIn => write!(f, "not logged in, use /login first"),
        }
    }
}

impl std::error::Error for AdminError {}

impl From<url::ParseError> for AdminError {
    fn from(e: url::ParseError) -> Self {
        AdminError::Config(format!("bad panel URL: {e}"))
    }
}
