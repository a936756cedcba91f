//! # Client configuration — `receipts.toml`
//!
//! The web crate embeds this file at build time. Every section is optional; a
//! missing or empty file is equivalent to [`ClientConfig::default`], which runs the
//! client against the in-memory backend.
//!
//! ```toml
//! [api]
//! base_url = "https://api.example.com"   # POST /login, POST /search
//!
//! [storage]
//! upload_url = "https://uploads.example.com"
//!
//! [auth]
//! provider = "managed"                   # "fetch" | "managed" | "memory"
//!
//! [auth.managed]
//! endpoint = "https://cognito-idp.us-east-1.amazonaws.com/"
//! client_id = "app-client-id"
//!
//! [search]
//! ordering = "latest-request"            # or "latest-response"
//!
//! [notices]
//! dismiss_after_ms = 4000
//!
//! [logging]
//! level = "info"
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration stored in `receipts.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub notices: NoticeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Receipt API base URL; `/login` and `/search` hang off it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
}

/// Object-storage endpoint receiving multipart uploads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub upload_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub provider: AuthProvider,
    #[serde(default)]
    pub managed: ManagedConfig,
}

/// Which authentication backend the client talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// `POST {api}/login`; no signup.
    Fetch,
    /// Managed user pool with signup and email confirmation.
    Managed,
    /// In-process accounts, for offline development.
    #[default]
    Memory,
}

/// Managed user-pool settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManagedConfig {
    #[serde(default = "default_managed_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub client_id: String,
}

fn default_managed_endpoint() -> String {
    "https://cognito-idp.us-east-1.amazonaws.com/".to_string()
}

impl Default for ManagedConfig {
    fn default() -> Self {
        Self {
            endpoint: default_managed_endpoint(),
            client_id: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub ordering: OrderingPolicy,
}

/// What to do with a response that arrives after a newer one was applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderingPolicy {
    /// Apply a response only if it belongs to a newer request than the last applied one.
    #[default]
    LatestRequest,
    /// Apply every response as it arrives; the last one to arrive wins.
    LatestResponse,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// How long a transient notice stays on screen.
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u32,
}

fn default_dismiss_after_ms() -> u32 {
    4000
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: default_dismiss_after_ms(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

/// Log severity level
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ClientConfig {
    /// Config for the HTTP backends at the given endpoints.
    pub fn new(base_url: impl Into<String>, upload_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
            },
            storage: StorageConfig {
                upload_url: upload_url.into(),
            },
            auth: AuthConfig {
                provider: AuthProvider::Fetch,
                managed: ManagedConfig::default(),
            },
            ..Self::default()
        }
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "receipts.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// True when search and upload go over HTTP rather than to the memory backend.
    pub fn uses_http_receipts(&self) -> bool {
        self.auth.provider != AuthProvider::Memory
    }

    /// Check that every endpoint the selected backends need is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uses_http_receipts() {
            if self.api.base_url.trim().is_empty() {
                return Err(ConfigError::Missing("api.base_url"));
            }
            if self.storage.upload_url.trim().is_empty() {
                return Err(ConfigError::Missing("storage.upload_url"));
            }
        }
        if self.auth.provider == AuthProvider::Managed {
            if self.auth.managed.endpoint.trim().is_empty() {
                return Err(ConfigError::Missing("auth.managed.endpoint"));
            }
            if self.auth.managed.client_id.trim().is_empty() {
                return Err(ConfigError::Missing("auth.managed.client_id"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default_config() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.auth.provider, AuthProvider::Memory);
        assert_eq!(config.search.ordering, OrderingPolicy::LatestRequest);
        assert_eq!(config.notices.dismiss_after_ms, 4000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_full_file() {
        let config = ClientConfig::from_toml(
            r#"
            [api]
            base_url = "https://api.example.com"

            [storage]
            upload_url = "https://uploads.example.com"

            [auth]
            provider = "managed"

            [auth.managed]
            client_id = "abc123"

            [search]
            ordering = "latest-response"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.provider, AuthProvider::Managed);
        assert_eq!(config.auth.managed.client_id, "abc123");
        assert_eq!(
            config.auth.managed.endpoint,
            "https://cognito-idp.us-east-1.amazonaws.com/"
        );
        assert_eq!(config.search.ordering, OrderingPolicy::LatestResponse);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_provider_is_a_parse_error() {
        let err = ClientConfig::from_toml("[auth]\nprovider = \"ldap\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn validate_requires_endpoints_for_http_backends() {
        let config = ClientConfig::new("", "https://uploads.example.com");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("api.base_url"))
        ));

        let mut config =
            ClientConfig::new("https://api.example.com", "https://uploads.example.com");
        config.auth.provider = AuthProvider::Managed;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("auth.managed.client_id"))
        ));
    }

    #[test]
    fn toml_roundtrip_keeps_custom_settings() {
        let mut config =
            ClientConfig::new("https://api.example.com", "https://uploads.example.com");
        config.auth.provider = AuthProvider::Managed;
        config.auth.managed.client_id = "client".to_string();
        config.search.ordering = OrderingPolicy::LatestResponse;
        let text = config.to_toml().unwrap();
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }
}
