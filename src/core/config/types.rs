use std::path::PathBuf;

use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(super) server: ServerSettings,
    pub(super) runtime: RuntimeSettings,
    pub(super) page: PageSettings,
    pub(super) preferences: PreferenceSettings,
    pub(super) telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct ServerSettings {
    pub(super) base_url: BaseUrl,
    pub(super) ws_path: WsPath,
    pub(super) base_url_explicit: bool,
}

/// Values the server templates would have written into the page.
#[derive(Debug, Clone, Default)]
pub(crate) struct PageSettings {
    pub(crate) student_id: Option<String>,
    pub(crate) csrf_token: Option<String>,
    pub(crate) cookie: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct PreferenceSettings {
    pub(crate) path: PathBuf,
}

#[derive(Debug, Clone)]
pub(crate) struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct RuntimeSettings {
    pub(crate) environment: Environment,
    pub(crate) strict_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Environment {
    Development,
    Production,
    Staging,
    Test,
}

impl Environment {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Test => "test",
        }
    }

    pub(super) fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BaseUrl(pub(super) Url);

#[derive(Debug, Clone)]
pub(crate) struct WsPath(pub(super) String);

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid websocket path: {0}")]
    InvalidWsPath(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("{0} must be set explicitly in strict mode")]
    MissingSetting(&'static str),
}

impl BaseUrl {
    pub(super) fn parse(value: String) -> Result<Self, ConfigError> {
        let url = Url::parse(&value).map_err(|_| ConfigError::InvalidBaseUrl(value.clone()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl(value));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::InvalidBaseUrl(value));
        }

        Ok(Self(url))
    }

    pub(super) fn is_loopback(&self) -> bool {
        matches!(self.0.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"))
    }
}

impl WsPath {
    pub(super) fn parse(value: String) -> Result<Self, ConfigError> {
        if !value.starts_with('/') || value.len() < 2 || value.contains(['?', '#']) {
            return Err(ConfigError::InvalidWsPath(value));
        }

        Ok(Self(value.trim_end_matches('/').to_string()))
    }
}
