//! Application configuration. API endpoint, session path, presentation.

use serde::Deserialize;

/// Default per-request timeout for calls to the expense service.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Expense-service API root (e.g. "https://api.example.com").
    /// Read from SPLITFAIR_API_BASE_URL. When unset, the client runs
    /// against the in-memory mock gateway.
    pub api_base_url: Option<String>,

    /// Where the session token is stored between runs. Read from SPLITFAIR_SESSION_PATH.
    #[serde(default)]
    pub session_path: Option<String>,

    /// Per-request timeout in seconds. Read from SPLITFAIR_REQUEST_TIMEOUT_SECS.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Currency symbol used when rendering amounts. Read from SPLITFAIR_CURRENCY.
    #[serde(default)]
    pub currency: Option<String>,
}

impl AppConfig {
    /// Build the config from the process environment (and an optional file
    /// named by SPLITFAIR_CONFIG). `.env` loading happens once in main,
    /// before this runs.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("SPLITFAIR"));
        if let Ok(path) = std::env::var("SPLITFAIR_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns true when a real API endpoint is configured.
    pub fn is_api_configured(&self) -> bool {
        self.api_base_url
            .as_deref()
            .is_some_and(|url| !url.is_empty())
    }

    /// Returns the session file path. Defaults to "./session.json".
    pub fn session_path_or_default(&self) -> String {
        self.session_path
            .clone()
            .unwrap_or_else(|| "./session.json".to_string())
    }

    /// Returns the request timeout in seconds. Defaults to DEFAULT_REQUEST_TIMEOUT_SECS.
    pub fn request_timeout_secs_or_default(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Returns the currency symbol. Defaults to "₹", matching the service.
    pub fn currency_or_default(&self) -> String {
        self.currency.clone().unwrap_or_else(|| "₹".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = AppConfig::default();
        assert!(!cfg.is_api_configured());
        assert_eq!(cfg.session_path_or_default(), "./session.json");
        assert_eq!(
            cfg.request_timeout_secs_or_default(),
            DEFAULT_REQUEST_TIMEOUT_SECS
        );
        assert_eq!(cfg.currency_or_default(), "₹");
    }

    #[test]
    fn empty_base_url_counts_as_unconfigured() {
        let cfg = AppConfig {
            api_base_url: Some(String::new()),
            ..AppConfig::default()
        };
        assert!(!cfg.is_api_configured());
    }
}
