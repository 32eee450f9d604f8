use std::sync::Arc;

use crate::api::{CurriculumApi, HttpCurriculumApi};
use crate::core::config::Settings;
use crate::dom::Document;
use crate::live::{LiveConnector, StompConnector};
use crate::pages;
use crate::services::preferences::{FilePreferences, MemoryPreferences, PreferenceStore};

/// Collaborators shared by every command: the HTTP API, the push channel and
/// the preference store.
#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    api: Arc<dyn CurriculumApi>,
    live: Arc<dyn LiveConnector>,
    preferences: Arc<dyn PreferenceStore>,
}

impl AppState {
    pub(crate) fn new(
        settings: Settings,
        api: Arc<dyn CurriculumApi>,
        live: Arc<dyn LiveConnector>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self { inner: Arc::new(InnerState { settings, api, live, preferences }) }
    }

    /// Wires the HTTP and STOMP clients. `ephemeral` keeps preferences in
    /// memory instead of the preferences file.
    pub(crate) fn from_settings(settings: Settings, ephemeral: bool) -> anyhow::Result<Self> {
        let api = HttpCurriculumApi::from_settings(&settings)?;
        let live = StompConnector::from_settings(&settings);
        let preferences: Arc<dyn PreferenceStore> = if ephemeral {
            tracing::debug!("Preferences kept in memory");
            Arc::new(MemoryPreferences::new())
        } else {
            let store = FilePreferences::from_settings(&settings)?;
            tracing::debug!(preferences = %store.path().display(), "Preferences file opened");
            Arc::new(store)
        };
        tracing::debug!(
            base_url = %settings.base_url(),
            ws_endpoint = %live.endpoint(),
            "Client state initialised"
        );
        Ok(Self::new(settings, Arc::new(api), Arc::new(live), preferences))
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn api(&self) -> Arc<dyn CurriculumApi> {
        self.inner.api.clone()
    }

    pub(crate) fn live(&self) -> Arc<dyn LiveConnector> {
        self.inner.live.clone()
    }

    pub(crate) fn preferences(&self) -> &dyn PreferenceStore {
        self.inner.preferences.as_ref()
    }

    /// Empty page at `location` carrying the configured CSRF token, cookie and
    /// student id.
    pub(crate) fn new_page(&self, location: &str) -> Document {
        let mut doc = Document::new(location);
        pages::shell(&mut doc, self.settings().page());
        doc
    }
}
