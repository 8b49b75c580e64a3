//! # Session
//!
//! The connection context shared by everything that talks to the panel:
//! the base URL the operator pointed us at, and the cookie jar that holds
//! the panel's `_xsrf` token and `player` login cookie.
//!
//! The admin HTTP client writes into the jar (every response may set
//! cookies); the WebSocket transport reads from it so the chat handshake
//! is authenticated the same way as the HTTP requests.

use regex::Regex;
use reqwest::cookie::{CookieStore, Jar};
use std::sync::Arc;
use url::Url;

/// Anti-forgery token cookie set by the panel on every rendered page.
pub const XSRF_COOKIE: &str = "_xsrf";
/// Login cookie set by the panel after a successful `POST /login`.
pub const LOGIN_COOKIE: &str = "player";

#[derive(Clone)]
pub struct Session {
    base_url: Url,
    jar: Arc<Jar>,
}

impl Session {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            jar: Arc::new(Jar::default()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// `host[:port]` of the panel, for display.
    pub fn host(&self) -> String {
        let host = self.base_url.host_str().unwrap_or("?");
        match self.base_url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Resolves a panel path. Relative paths (`ajax/playeraction`) resolve
    /// against the base URL, absolute ones (`/stopserver`) against its root.
    pub fn join(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    /// The live chat endpoint: same host as the panel, `/chat` path,
    /// `ws` for `http` and `wss` for `https`.
    pub fn chat_endpoint(&self) -> Result<Url, url::ParseError> {
        let scheme = match self.base_url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        let host = self.base_url.host_str().ok_or(url::ParseError::EmptyHost)?;
        let authority = match self.base_url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        Url::parse(&format!("{scheme}://{authority}/chat"))
    }

    /// The `Cookie` header the jar would send to the panel.
    pub fn cookie_header(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookie_header()
            .and_then(|header| cookie_value(&header, name))
    }
}

/// Looks up one cookie in a `Cookie` header string.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    let pattern = format!(r"\b{}=([^;]*)\b", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
