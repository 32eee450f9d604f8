//! Small DOM helpers shared by the answer widgets.

use crate::dom::{Document, NodeId};

pub(crate) const STUDENT_ID_INPUT: &str = "studentId";
pub(crate) const MISSING_STUDENT: &str = "受講者IDを取得できませんでした。";
pub(crate) const NO_ANSWERS: &str = "回答はまだありません";
pub(crate) const FETCH_FAILED: &str = "回答の取得に失敗しました";

const DEFAULT_COLUMNS: usize = 3;

/// What a monitor refresh left on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefreshOutcome {
    /// No monitor for the question on this page; nothing was fetched.
    NoTarget,
    Rendered(usize),
    Empty,
    Failed,
}

/// Trimmed value of the input with `id`; `None` when the input is missing or blank.
pub(crate) fn input_value(doc: &Document, id: &str) -> Option<String> {
    let input = doc.element_by_id(id)?;
    let value = doc.value(input).trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub(crate) fn student_id(doc: &Document) -> Option<String> {
    input_value(doc, STUDENT_ID_INPUT)
}

/// Replaces the text and the whole class list of a result element.
pub(crate) fn render_result(doc: &mut Document, node: Option<NodeId>, text: &str, class_name: &str) {
    if let Some(node) = node {
        doc.set_text_content(node, text);
        doc.set_class_name(node, class_name);
    }
}

/// Status line that keeps its other classes and switches between success and danger.
pub(crate) fn render_status(doc: &mut Document, node: NodeId, text: &str, success: Option<bool>) {
    doc.set_text_content(node, text);
    doc.remove_class(node, "text-success");
    doc.remove_class(node, "text-danger");
    match success {
        Some(true) => doc.add_class(node, "text-success"),
        Some(false) => doc.add_class(node, "text-danger"),
        None => {}
    }
}

/// Element with `class` whose `data-question-id` equals `question_id`.
pub(crate) fn find_monitor(doc: &Document, class: &str, question_id: &str) -> Option<NodeId> {
    doc.find_first(doc.root(), |doc, node| {
        doc.has_class(node, class) && doc.data(node, "questionId") == Some(question_id)
    })
}

/// One-cell row spanning every header column of the monitor table.
pub(crate) fn placeholder_row(doc: &mut Document, monitor: NodeId, text: &str) -> NodeId {
    let columns = match doc.elements_by_tag(monitor, "th").len() {
        0 => DEFAULT_COLUMNS,
        count => count,
    };
    let row = doc.create_element("tr");
    let cell = doc.create_text_element("td", "text-center text-muted", text);
    doc.set_attr(cell, "colspan", &columns.to_string());
    doc.append_child(row, cell);
    row
}
