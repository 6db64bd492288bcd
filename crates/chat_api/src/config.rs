use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::ChatApiError;
use crate::url::DEFAULT_BASE_URL;

/// Environment variable overriding [`ChatApiConfig::base_url`].
pub const BASE_URL_ENV_VAR: &str = "CHAT_API_BASE_URL";
/// Environment variable holding a request timeout in whole seconds.
pub const TIMEOUT_SECS_ENV_VAR: &str = "CHAT_API_TIMEOUT_SECS";

/// Transport configuration for chat backend requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatApiConfig {
    /// Base URL the `/chat`, `/threads` and `/history` paths are joined onto.
    pub base_url: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into every request.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout. Expiry surfaces as a transport failure.
    pub timeout: Option<Duration>,
}

impl Default for ChatApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl ChatApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Build a config from `CHAT_API_BASE_URL` and `CHAT_API_TIMEOUT_SECS`.
    ///
    /// Unset or blank variables keep the defaults; a timeout that is not a
    /// whole number of seconds is rejected.
    pub fn from_env() -> Result<Self, ChatApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ChatApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_ENV_VAR).filter(|value| !value.trim().is_empty())
        {
            config.base_url = base_url.trim().to_owned();
        }

        if let Some(raw) = lookup(TIMEOUT_SECS_ENV_VAR).filter(|value| !value.trim().is_empty()) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ChatApiError::InvalidConfig(format!(
                    "{TIMEOUT_SECS_ENV_VAR} must be whole seconds, got {raw:?}"
                ))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.extra_headers.extend(headers);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{ChatApiConfig, BASE_URL_ENV_VAR, TIMEOUT_SECS_ENV_VAR};
    use crate::error::ChatApiError;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn env_lookup_overrides_defaults() {
        let config = ChatApiConfig::from_lookup(lookup(&[
            (BASE_URL_ENV_VAR, " http://chat.internal:9000 "),
            (TIMEOUT_SECS_ENV_VAR, "30"),
        ]))
        .expect("config");

        assert_eq!(config.base_url, "http://chat.internal:9000");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn blank_env_values_keep_defaults() {
        let config = ChatApiConfig::from_lookup(lookup(&[(BASE_URL_ENV_VAR, "  ")]))
            .expect("config");
        assert_eq!(config, ChatApiConfig::default());
    }

    #[test]
    fn builder_methods_compose() {
        let config = ChatApiConfig::default()
            .with_base_url("http://chat.internal:9000")
            .insert_header("x-request-source", "cli")
            .with_headers([
                ("x-trace".to_owned(), "abc".to_owned()),
                ("x-request-source".to_owned(), "test".to_owned()),
            ])
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.base_url, "http://chat.internal:9000");
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert_eq!(
            config.extra_headers.get("x-request-source").map(String::as_str),
            Some("test")
        );
        assert_eq!(
            config.extra_headers.get("x-trace").map(String::as_str),
            Some("abc")
        );
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let error = ChatApiConfig::from_lookup(lookup(&[(TIMEOUT_SECS_ENV_VAR, "soon")]))
            .expect_err("timeout should be rejected");
        assert!(matches!(error, ChatApiError::InvalidConfig(_)));
    }
}
