use crate::dom::Document;
use crate::services::preferences::{self, PreferenceStore, DARK_MODE_KEY};

pub(crate) const TOGGLE_ID: &str = "dark-mode-toggle";
const BODY_CLASS: &str = "dark-mode";

/// Page load: applies the saved preference. Pages without the toggle are left
/// alone and report `None`.
pub(crate) fn apply(doc: &mut Document, store: &dyn PreferenceStore) -> Option<bool> {
    let toggle = doc.element_by_id(TOGGLE_ID)?;
    let enabled = store.flag(DARK_MODE_KEY);
    if enabled {
        let body = doc.body();
        doc.add_class(body, BODY_CLASS);
        doc.set_checked(toggle, true);
    }
    Some(enabled)
}

/// The toggle changed.
pub(crate) fn set(doc: &mut Document, store: &dyn PreferenceStore, enabled: bool) {
    let body = doc.body();
    doc.set_class(body, BODY_CLASS, enabled);
    if let Some(toggle) = doc.element_by_id(TOGGLE_ID) {
        doc.set_checked(toggle, enabled);
    }
    preferences::remember(store, DARK_MODE_KEY, if enabled { "true" } else { "false" });
}

pub(crate) fn is_enabled(doc: &Document) -> bool {
    doc.has_class(doc.body(), BODY_CLASS)
}
