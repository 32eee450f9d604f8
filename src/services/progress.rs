use crate::dom::{Document, NodeId};
use crate::services::preferences::{self, PreferenceStore};

pub(crate) const BAR_CLASS: &str = "progress-bar";
pub(crate) const CHECKLIST_CLASS: &str = "checklist";
pub(crate) const ITEM_CLASS: &str = "checklist-item";

/// Page load: sizes `data-progress` bars, restores checklist ticks and
/// recomputes checklist completion.
pub(crate) fn init(doc: &mut Document, store: &dyn PreferenceStore) {
    for bar in doc.elements_with_class(doc.root(), BAR_CLASS) {
        let progress = doc.attr(bar, "data-progress").unwrap_or("0").to_string();
        set_bar(doc, bar, &progress);
    }

    let items = checklist_inputs(doc);
    if items.is_empty() {
        return;
    }
    for item in items {
        let Some(id) = doc.id(item).map(str::to_string) else {
            continue;
        };
        let checked = store.flag(&preferences::checklist_key(&id));
        doc.set_checked(item, checked);
    }
    update_checklists(doc);
}

/// A checklist box changed: persist it and recompute its list's progress.
pub(crate) fn set_item(doc: &mut Document, store: &dyn PreferenceStore, item: NodeId, checked: bool) {
    doc.set_checked(item, checked);
    match doc.id(item) {
        Some(id) => {
            let key = preferences::checklist_key(id);
            preferences::remember(store, &key, if checked { "true" } else { "false" });
        }
        None => tracing::debug!("Checklist item without id is not persisted"),
    }
    update_checklists(doc);
}

/// Checkbox inputs inside `.checklist-item` elements.
pub(crate) fn checklist_inputs(doc: &Document) -> Vec<NodeId> {
    doc.find_all(doc.root(), |doc, node| {
        is_checkbox(doc, node)
            && doc.parent(node).and_then(|parent| doc.closest_with_class(parent, ITEM_CLASS)).is_some()
    })
}

/// Recomputes `data-progress` and the bar of every `.checklist`.
pub(crate) fn update_checklists(doc: &mut Document) -> Vec<u32> {
    let mut percentages = Vec::new();
    for list in doc.elements_with_class(doc.root(), CHECKLIST_CLASS) {
        let boxes = doc.find_all(list, is_checkbox);
        if boxes.is_empty() {
            continue;
        }
        let checked = boxes.iter().filter(|node| doc.is_checked(**node)).count();
        let percent = (checked as f64 / boxes.len() as f64 * 100.0).round() as u32;
        let percent_text = percent.to_string();

        if let Some(bar) = doc.first_with_class(list, BAR_CLASS) {
            set_bar(doc, bar, &percent_text);
        }
        doc.set_attr(list, "data-progress", &percent_text);
        percentages.push(percent);
    }
    percentages
}

fn is_checkbox(doc: &Document, node: NodeId) -> bool {
    doc.tag(node) == "input" && doc.attr(node, "type") == Some("checkbox")
}

fn set_bar(doc: &mut Document, bar: NodeId, percent: &str) {
    doc.set_style(bar, "width", &format!("{percent}%"));
    doc.set_text_content(bar, &format!("{percent}%"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::preferences::MemoryPreferences;

    fn page(ids: &[Option<&str>]) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new("/curriculum/day5.html");
        let body = doc.body();
        let list = doc.create_element("ul");
        doc.set_class_name(list, CHECKLIST_CLASS);
        doc.append_child(body, list);
        let bar = doc.create_element("div");
        doc.set_class_name(bar, BAR_CLASS);
        doc.append_child(list, bar);

        let mut inputs = Vec::new();
        for id in ids {
            let item = doc.create_element("li");
            doc.set_class_name(item, ITEM_CLASS);
            doc.append_child(list, item);
            let input = doc.create_element("input");
            doc.set_attr(input, "type", "checkbox");
            if let Some(id) = id {
                doc.set_id(input, id);
            }
            doc.append_child(item, input);
            inputs.push(input);
        }
        (doc, list, inputs)
    }

    #[test]
    fn static_bars_take_their_declared_progress() {
        let mut doc = Document::new("/");
        let body = doc.body();
        let bar = doc.create_element("div");
        doc.set_class_name(bar, BAR_CLASS);
        doc.set_attr(bar, "data-progress", "40");
        doc.append_child(body, bar);
        let unset = doc.create_element("div");
        doc.set_class_name(unset, BAR_CLASS);
        doc.append_child(body, unset);

        init(&mut doc, &MemoryPreferences::new());

        assert_eq!(doc.style(bar, "width"), Some("40%"));
        assert_eq!(doc.text_content(bar), "40%");
        assert_eq!(doc.text_content(unset), "0%");
    }

    #[test]
    fn restores_ticks_and_rounds_percentage() {
        let store = MemoryPreferences::new();
        store.set("checklist_c1", "true").expect("set");
        store.set("checklist_c2", "false").expect("set");
        let (mut doc, list, inputs) = page(&[Some("c1"), Some("c2"), Some("c3")]);

        init(&mut doc, &store);

        assert!(doc.is_checked(inputs[0]));
        assert!(!doc.is_checked(inputs[1]));
        assert_eq!(doc.attr(list, "data-progress"), Some("33"));
        let bar = doc.first_with_class(list, BAR_CLASS).expect("bar");
        assert_eq!(doc.style(bar, "width"), Some("33%"));

        set_item(&mut doc, &store, inputs[1], true);
        assert_eq!(doc.attr(list, "data-progress"), Some("67"));
        assert_eq!(store.get("checklist_c2").as_deref(), Some("true"));
    }

    #[test]
    fn items_without_id_count_but_are_not_persisted() {
        let store = MemoryPreferences::new();
        let (mut doc, list, inputs) = page(&[None, Some("c2")]);
        init(&mut doc, &store);

        set_item(&mut doc, &store, inputs[0], true);
        assert_eq!(doc.attr(list, "data-progress"), Some("50"));
        assert_eq!(store.get("checklist_null"), None);
        assert_eq!(checklist_inputs(&doc).len(), 2);
    }
}
