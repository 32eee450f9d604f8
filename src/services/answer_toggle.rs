//! Show/hide for pre-rendered answer blocks.
//!
//! Visibility lives entirely in the `show` class of the target block; the
//! button pointing at it (`data-target-id`) mirrors that state in its icon and
//! label.

use crate::dom::{Document, NodeId};

const SHOWN_CLASS: &str = "show";
const LABEL_CLASS: &str = "answer-toggle-label";
const ICON_SHOWN: &str = "fas fa-eye-slash";
const ICON_HIDDEN: &str = "fas fa-eye";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ToggleKind {
    /// Plain answer: "回答を表示" / "回答を非表示".
    Answer,
    /// Sample answer: "回答例を表示" / "回答例を非表示".
    SampleAnswer,
}

impl ToggleKind {
    /// Value of the button's `data-toggle` attribute.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Answer => "answer",
            Self::SampleAnswer => "sample",
        }
    }

    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("sample") => Self::SampleAnswer,
            _ => Self::Answer,
        }
    }

    pub(crate) fn label(self, shown: bool) -> &'static str {
        match (self, shown) {
            (Self::Answer, false) => "回答を表示",
            (Self::Answer, true) => "回答を非表示",
            (Self::SampleAnswer, false) => "回答例を表示",
            (Self::SampleAnswer, true) => "回答例を非表示",
        }
    }
}

/// The `{show, toggle}` capability other widgets dispatch into.
///
/// Both return the visibility after the flip, or `None` when the page has no
/// element with that id.
pub(crate) trait AnswerVisibility {
    fn show(&self, doc: &mut Document, answer_id: &str) -> Option<bool>;
    fn toggle(&self, doc: &mut Document, answer_id: &str) -> Option<bool>;
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AnswerToggle;

impl AnswerToggle {
    fn flip(doc: &mut Document, answer_id: &str, kind: ToggleKind) -> Option<bool> {
        let target = doc.element_by_id(answer_id)?;
        let shown = doc.toggle_class(target, SHOWN_CLASS);

        if let Some(button) = toggle_button(doc, answer_id) {
            let icon = doc.first_by_tag(button, "i");
            let label = doc.first_with_class(button, LABEL_CLASS);
            if let (Some(icon), Some(label)) = (icon, label) {
                doc.set_class_name(icon, if shown { ICON_SHOWN } else { ICON_HIDDEN });
                doc.set_text_content(label, kind.label(shown));
            }
        }

        tracing::debug!(answer_id, shown, kind = kind.as_str(), "Answer visibility toggled");
        Some(shown)
    }
}

impl AnswerVisibility for AnswerToggle {
    fn show(&self, doc: &mut Document, answer_id: &str) -> Option<bool> {
        Self::flip(doc, answer_id, ToggleKind::Answer)
    }

    fn toggle(&self, doc: &mut Document, answer_id: &str) -> Option<bool> {
        Self::flip(doc, answer_id, ToggleKind::SampleAnswer)
    }
}

fn toggle_button(doc: &Document, answer_id: &str) -> Option<NodeId> {
    doc.find_first(doc.root(), |doc, node| doc.data(node, "targetId") == Some(answer_id))
}

/// Routes a click on a toggle button to `visibility` according to the
/// button's `data-toggle` kind.
pub(crate) fn dispatch_click(
    doc: &mut Document,
    button: NodeId,
    visibility: &dyn AnswerVisibility,
) -> Option<bool> {
    let answer_id = doc.data(button, "targetId")?.to_string();
    match ToggleKind::from_attr(doc.data(button, "toggle")) {
        ToggleKind::Answer => visibility.show(doc, &answer_id),
        ToggleKind::SampleAnswer => visibility.toggle(doc, &answer_id),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::pages;

    fn page(kind: ToggleKind) -> (Document, NodeId) {
        let mut doc = Document::new("/lecture/day3_lecture.html");
        let body = doc.body();
        let button = pages::answer_block(&mut doc, body, "answer-7", kind, "SELECT * FROM t;");
        (doc, button)
    }

    fn snapshot(doc: &Document) -> String {
        doc.inner_html(doc.body())
    }

    #[test]
    fn show_flips_class_icon_and_label() {
        let (mut doc, button) = page(ToggleKind::Answer);

        assert_eq!(AnswerToggle.show(&mut doc, "answer-7"), Some(true));
        let target = doc.element_by_id("answer-7").expect("target");
        assert!(doc.has_class(target, "show"));
        let icon = doc.first_by_tag(button, "i").expect("icon");
        assert_eq!(doc.class_name(icon), "fas fa-eye-slash");
        let label = doc.first_with_class(button, "answer-toggle-label").expect("label");
        assert_eq!(doc.text_content(label), "回答を非表示");
    }

    #[test]
    fn sample_answer_uses_its_own_labels() {
        let (mut doc, button) = page(ToggleKind::SampleAnswer);

        assert_eq!(AnswerToggle.toggle(&mut doc, "answer-7"), Some(true));
        let label = doc.first_with_class(button, "answer-toggle-label").expect("label");
        assert_eq!(doc.text_content(label), "回答例を非表示");

        assert_eq!(AnswerToggle.toggle(&mut doc, "answer-7"), Some(false));
        assert_eq!(doc.text_content(label), "回答例を表示");
    }

    #[test]
    fn double_toggle_restores_original_markup() {
        for kind in [ToggleKind::Answer, ToggleKind::SampleAnswer] {
            let (mut doc, button) = page(kind);
            let before = snapshot(&doc);

            dispatch_click(&mut doc, button, &AnswerToggle);
            assert_ne!(snapshot(&doc), before);
            dispatch_click(&mut doc, button, &AnswerToggle);
            assert_eq!(snapshot(&doc), before);
        }
    }

    #[test]
    fn missing_target_is_a_no_op() {
        let (mut doc, _) = page(ToggleKind::Answer);
        let before = snapshot(&doc);
        assert_eq!(AnswerToggle.show(&mut doc, "answer-404"), None);
        assert_eq!(snapshot(&doc), before);
    }

    #[test]
    fn dispatch_goes_through_the_given_capability() {
        #[derive(Default)]
        struct Recorder {
            calls: RefCell<Vec<(&'static str, String)>>,
        }

        impl AnswerVisibility for Recorder {
            fn show(&self, _doc: &mut Document, answer_id: &str) -> Option<bool> {
                self.calls.borrow_mut().push(("show", answer_id.to_string()));
                Some(true)
            }

            fn toggle(&self, _doc: &mut Document, answer_id: &str) -> Option<bool> {
                self.calls.borrow_mut().push(("toggle", answer_id.to_string()));
                Some(true)
            }
        }

        let recorder = Recorder::default();
        let (mut doc, button) = page(ToggleKind::SampleAnswer);
        dispatch_click(&mut doc, button, &recorder);

        let (mut doc, plain) = page(ToggleKind::Answer);
        dispatch_click(&mut doc, plain, &recorder);

        assert_eq!(
            recorder.calls.into_inner(),
            vec![("toggle", "answer-7".to_string()), ("show", "answer-7".to_string())]
        );
    }
}
