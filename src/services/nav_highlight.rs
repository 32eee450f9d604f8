use crate::dom::{Document, NodeId};

pub(crate) const NAV_CLASS: &str = "main-nav";
const ACTIVE_CLASS: &str = "active";

/// Marks `.main-nav` links pointing at the current page as active.
///
/// A link matches when the current path contains its href; `/` only matches
/// the site root. Links without an href are skipped.
pub(crate) fn highlight(doc: &mut Document) -> Vec<NodeId> {
    let current = doc.pathname().to_string();
    let links = doc.find_all(doc.root(), |doc, node| {
        doc.tag(node) == "a"
            && doc.parent(node).and_then(|parent| doc.closest_with_class(parent, NAV_CLASS)).is_some()
    });

    let mut active = Vec::new();
    for link in links {
        let Some(href) = doc.attr(link, "href").filter(|href| !href.is_empty()) else {
            continue;
        };
        let matches = if href == "/" { current == "/" } else { current.contains(href) };
        if matches {
            doc.add_class(link, ACTIVE_CLASS);
            active.push(link);
        }
    }
    active
}
