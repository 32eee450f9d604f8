use crate::dom::{Document, NodeId};

pub(crate) const INPUT_ID: &str = "search-input";
pub(crate) const RESULTS_ID: &str = "search-results";
pub(crate) const NO_RESULTS: &str = "検索結果が見つかりませんでした。";

pub(crate) const SEARCHABLE_CLASS: &str = "searchable";
const MIN_TERM_CHARS: usize = 2;
const TITLE_CHARS: usize = 50;
const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchHit {
    pub(crate) title: String,
    pub(crate) url: String,
    pub(crate) excerpt: String,
}

/// Runs a search for `term` over `.searchable` elements and renders the hits
/// under the search box. Returns `None` when the page has no search box.
pub(crate) fn search(doc: &mut Document, term: &str) -> Option<Vec<SearchHit>> {
    let input = doc.element_by_id(INPUT_ID)?;
    doc.set_value(input, term);
    let results = results_element(doc, input);
    doc.clear_children(results);

    let needle = term.to_lowercase();
    if needle.chars().count() < MIN_TERM_CHARS {
        return Some(Vec::new());
    }

    let hits = find_hits(doc, &needle);
    if hits.is_empty() {
        let message = doc.create_text_element("p", "", NO_RESULTS);
        doc.append_child(results, message);
        return Some(hits);
    }

    let list = doc.create_element("ul");
    for hit in &hits {
        let item = doc.create_element("li");
        let link = doc.create_text_element("a", "", &hit.title);
        doc.set_attr(link, "href", &hit.url);
        doc.append_child(item, link);
        let excerpt = doc.create_text_element("p", "", &hit.excerpt);
        doc.append_child(item, excerpt);
        doc.append_child(list, item);
    }
    doc.append_child(results, list);
    Some(hits)
}

fn results_element(doc: &mut Document, input: NodeId) -> NodeId {
    if let Some(results) = doc.element_by_id(RESULTS_ID) {
        return results;
    }
    let results = doc.create_element("div");
    doc.set_id(results, RESULTS_ID);
    doc.set_class_name(results, "search-results");
    let parent = doc.parent(input).unwrap_or(doc.body());
    doc.append_child(parent, results);
    results
}

fn find_hits(doc: &Document, needle: &str) -> Vec<SearchHit> {
    doc.elements_with_class(doc.root(), SEARCHABLE_CLASS)
        .into_iter()
        .filter_map(|node| {
            let text = doc.text_content(node);
            let title = doc.attr(node, "data-title").unwrap_or_default();
            let matched =
                text.to_lowercase().contains(needle) || title.to_lowercase().contains(needle);
            if !matched {
                return None;
            }
            Some(SearchHit {
                title: if title.is_empty() {
                    format!("{}...", prefix(&text, TITLE_CHARS))
                } else {
                    title.to_string()
                },
                url: doc.attr(node, "data-url").unwrap_or("#").to_string(),
                excerpt: format!("{}...", prefix(&text, EXCERPT_CHARS)),
            })
        })
        .collect()
}

fn prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
