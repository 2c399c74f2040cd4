use serde::Deserialize;
use std::env;

pub mod assistants;
pub mod citations;
pub mod client;
pub mod config;
pub mod session;

pub use client::ApiClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Credentials for the hosted assistant service.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub base_url: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Reads `OPENAI_KEY`, and `OPENAI_BASE_URL` when set.
    ///
    /// ## Examples
    ///
    /// ```no_run
    /// use askdocs::Credentials;
    /// use dotenvy::dotenv;
    ///
    /// dotenv().ok();
    /// let credentials = Credentials::from_env().unwrap();
    /// ```
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key =
            env::var("OPENAI_KEY").map_err(|_| anyhow::anyhow!("OPENAI_KEY is not set"))?;
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(api_key, base_url))
    }
}

fn normalize_base_url(mut value: String) -> String {
    if !value.ends_with('/') {
        value.push('/');
    }
    value
}

/// The error envelope returned by the service, also used for transport and IO
/// failures so every fallible operation returns one error type.
#[derive(Deserialize, Debug, Clone)]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub param: Option<String>,
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type: error_type.into(),
            param: None,
            code: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::new(error.to_string(), "transport")
    }
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        Self::new(error.to_string(), "io")
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let credentials = Credentials::new("sk-test", "https://example.com/v1");
        assert_eq!(credentials.base_url, "https://example.com/v1/");

        let credentials = Credentials::new("sk-test", "https://example.com/v1/");
        assert_eq!(credentials.base_url, "https://example.com/v1/");
    }

    #[test]
    fn error_displays_service_message() {
        let error = ApiError::new("run not found", "invalid_request_error");
        assert_eq!(error.to_string(), "run not found");
    }

    #[test]
    fn io_errors_convert_with_io_type() {
        let error: ApiError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(error.error_type, "io");
        assert_eq!(error.message, "gone");
    }
}
