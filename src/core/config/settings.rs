use std::path::PathBuf;

use reqwest::Url;

use super::parsing::{env_optional, env_or_default, parse_bool, parse_environment, parse_log_level};
use super::types::{
    BaseUrl, ConfigError, PageSettings, PreferenceSettings, RuntimeSettings, ServerSettings,
    Settings, TelemetrySettings, WsPath,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8080/giiku";
const DEFAULT_WS_PATH: &str = "/ws";
const DEFAULT_PREFERENCES_PATH: &str = ".giiku/preferences.json";

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let base_url_raw = env_optional("GIIKU_BASE_URL");
        let base_url_explicit = base_url_raw.is_some();
        let base_url = base_url_raw.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let ws_path = env_or_default("GIIKU_WS_PATH", DEFAULT_WS_PATH);

        let environment =
            parse_environment(env_optional("GIIKU_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("GIIKU_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let student_id = env_optional("GIIKU_STUDENT_ID");
        let csrf_token = env_optional("GIIKU_CSRF_TOKEN");
        let cookie = env_optional("GIIKU_COOKIE");

        let preferences_path =
            PathBuf::from(env_or_default("GIIKU_PREFERENCES_PATH", DEFAULT_PREFERENCES_PATH));

        let raw_level = env_or_default("GIIKU_LOG_LEVEL", "info");
        let log_level = parse_log_level(raw_level.clone())
            .ok_or(ConfigError::InvalidValue { field: "GIIKU_LOG_LEVEL", value: raw_level })?;
        let json = env_optional("GIIKU_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                base_url: BaseUrl::parse(base_url)?,
                ws_path: WsPath::parse(ws_path)?,
                base_url_explicit,
            },
            runtime: RuntimeSettings { environment, strict_config },
            page: PageSettings { student_id, csrf_token, cookie },
            preferences: PreferenceSettings { path: preferences_path },
            telemetry: TelemetrySettings { log_level, json },
        };

        settings.validate()?;

        Ok(settings)
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.server.base_url.0
    }

    pub(crate) fn ws_path(&self) -> &str {
        &self.server.ws_path.0
    }

    pub(crate) fn page(&self) -> &PageSettings {
        &self.page
    }

    pub(crate) fn preferences(&self) -> &PreferenceSettings {
        &self.preferences
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if !self.server.base_url_explicit {
            return Err(ConfigError::MissingSetting("GIIKU_BASE_URL"));
        }

        if self.server.base_url.0.scheme() != "https" && !self.server.base_url.is_loopback() {
            return Err(ConfigError::InvalidValue {
                field: "GIIKU_BASE_URL",
                value: self.server.base_url.0.to_string(),
            });
        }

        Ok(())
    }
}
