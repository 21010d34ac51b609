//! Home Assistant connection configuration.

use serde::Deserialize;

/// Configuration for the Home Assistant sink.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomeAssistantConfig {
    /// Base URL of the Home Assistant core, without the `/api` suffix.
    pub base_url: String,
    /// Bearer token. Blank means no credential.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HomeAssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "http://supervisor/core".to_string(),
            token: None,
            request_timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_target_supervisor_proxy_by_default() {
        let config = HomeAssistantConfig::default();
        assert_eq!(config.base_url, "http://supervisor/core");
        assert!(config.token.is_none());
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            base_url = "http://homeassistant.local:8123"
            token = "abc"
            request_timeout_secs = 3
        "#;
        let config: HomeAssistantConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "http://homeassistant.local:8123");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.request_timeout_secs, 3);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let config: HomeAssistantConfig = toml::from_str(r#"token = "abc""#).unwrap();
        assert_eq!(config.base_url, "http://supervisor/core");
        assert_eq!(config.request_timeout_secs, 10);
    }
}
