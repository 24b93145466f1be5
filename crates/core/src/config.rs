use reqwest::Url;

use crate::errors::CoreError;

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "PORTFOLIO_API_URL";

/// Client configuration. The backend base URL is the only recognized option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: String,
}

impl ClientConfig {
    /// Validate and normalize a base URL.
    ///
    /// The trailing slash is stripped so that every endpoint path
    /// (`/api/...`) joins onto the base exactly once.
    pub fn new(api_url: impl AsRef<str>) -> Result<Self, CoreError> {
        let raw = api_url.as_ref().trim();
        if raw.is_empty() {
            return Err(CoreError::Config("API URL must not be empty".into()));
        }

        let parsed = Url::parse(raw)
            .map_err(|e| CoreError::Config(format!("Invalid API URL '{raw}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "Unsupported API URL scheme '{}' (expected http or https)",
                parsed.scheme()
            )));
        }

        Ok(Self {
            api_url: raw.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_env() -> Result<Self, CoreError> {
        let url = std::env::var(API_URL_ENV)
            .map_err(|_| CoreError::Config(format!("Missing required env var: {API_URL_ENV}")))?;
        Self::new(url)
    }

    /// Base URL without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Absolute URL for an endpoint path such as `/api/dashboard/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}
