use crate::dom::{Document, NodeId};
use crate::services::preferences::{self, PreferenceStore};

pub(crate) const TAB_CLASS: &str = "tab";
pub(crate) const CONTENT_CLASS: &str = "tab-content";
pub(crate) const GROUP_CLASS: &str = "tabs-container";
const ACTIVE_CLASS: &str = "active";

/// Storage id of the page: last path segment without `.html`.
pub(crate) fn page_id(doc: &Document) -> String {
    let last = doc.pathname().rsplit('/').next().unwrap_or_default();
    last.replace(".html", "")
}

/// Activates `tab` within its tab group and remembers the choice for this page.
pub(crate) fn activate(doc: &mut Document, store: &dyn PreferenceStore, tab: NodeId) {
    let group = doc.closest_with_class(tab, GROUP_CLASS).unwrap_or(doc.root());
    let mut siblings = doc.elements_with_class(group, TAB_CLASS);
    siblings.extend(doc.elements_with_class(group, CONTENT_CLASS));
    for node in siblings {
        doc.remove_class(node, ACTIVE_CLASS);
    }

    doc.add_class(tab, ACTIVE_CLASS);
    let Some(target_id) = doc.data(tab, "tab").map(str::to_string) else {
        return;
    };
    if let Some(content) = doc.element_by_id(&target_id) {
        doc.add_class(content, ACTIVE_CLASS);
    }
    preferences::remember(store, &preferences::active_tab_key(&page_id(doc)), &target_id);
}

/// Page load: re-activates the remembered tab, or the first tab on the page.
pub(crate) fn restore(doc: &mut Document, store: &dyn PreferenceStore) -> Option<NodeId> {
    let saved = store.get(&preferences::active_tab_key(&page_id(doc)));
    let tab = saved
        .and_then(|saved| {
            doc.find_first(doc.root(), |doc, node| {
                doc.has_class(node, TAB_CLASS) && doc.data(node, "tab") == Some(saved.as_str())
            })
        })
        .or_else(|| doc.first_with_class(doc.root(), TAB_CLASS))?;

    activate(doc, store, tab);
    Some(tab)
}
