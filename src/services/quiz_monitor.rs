use std::sync::Arc;

use crate::api::CurriculumApi;
use crate::dom::{Document, NodeId};
use crate::schemas::quiz::QuizAnswerRow;
use crate::services::widgets::{self, RefreshOutcome, FETCH_FAILED, NO_ANSWERS};

pub(crate) const MONITOR_CLASS: &str = "quiz-answer-monitor";

const CORRECT_GLYPH: &str = "○";
const INCORRECT_GLYPH: &str = "×";

/// Table of who answered a quiz question and whether they got it right.
#[derive(Clone)]
pub(crate) struct QuizAnswerMonitor {
    api: Arc<dyn CurriculumApi>,
}

impl QuizAnswerMonitor {
    pub(crate) fn new(api: Arc<dyn CurriculumApi>) -> Self {
        Self { api }
    }

    /// Re-fetches the answers for `question_id` and replaces every row of its
    /// monitor. Safe to call when the page has no such monitor.
    pub(crate) async fn refresh(&self, doc: &mut Document, question_id: &str) -> RefreshOutcome {
        let Some(monitor) = widgets::find_monitor(doc, MONITOR_CLASS, question_id) else {
            return RefreshOutcome::NoTarget;
        };
        let Some(body) = doc.first_by_tag(monitor, "tbody") else {
            tracing::debug!(question_id, "Quiz monitor has no table body");
            return RefreshOutcome::NoTarget;
        };

        let result = self.api.quiz_answers(question_id).await;
        doc.clear_children(body);

        match result {
            Ok(rows) if rows.is_empty() => {
                let row = widgets::placeholder_row(doc, monitor, NO_ANSWERS);
                doc.append_child(body, row);
                RefreshOutcome::Empty
            }
            Ok(rows) => {
                for answer in &rows {
                    let row = answer_row(doc, answer);
                    doc.append_child(body, row);
                }
                RefreshOutcome::Rendered(rows.len())
            }
            Err(err) => {
                tracing::error!(error = %err, question_id, "Failed to fetch quiz answers");
                let row = widgets::placeholder_row(doc, monitor, FETCH_FAILED);
                doc.append_child(body, row);
                RefreshOutcome::Failed
            }
        }
    }

    /// Refreshes every quiz monitor on the page, in document order.
    pub(crate) async fn refresh_all(&self, doc: &mut Document) -> Vec<(String, RefreshOutcome)> {
        let question_ids: Vec<String> = doc
            .elements_with_class(doc.root(), MONITOR_CLASS)
            .into_iter()
            .filter_map(|monitor| doc.data(monitor, "questionId").map(str::to_string))
            .collect();

        let mut outcomes = Vec::with_capacity(question_ids.len());
        for question_id in question_ids {
            let outcome = self.refresh(doc, &question_id).await;
            outcomes.push((question_id, outcome));
        }
        outcomes
    }
}

fn answer_row(doc: &mut Document, answer: &QuizAnswerRow) -> NodeId {
    let row = doc.create_element("tr");
    let glyph = if answer.is_correct() { CORRECT_GLYPH } else { INCORRECT_GLYPH };
    let cells = [
        answer.student_name.as_deref().unwrap_or_default(),
        answer.answer_text.as_deref().unwrap_or_default(),
        glyph,
    ];
    for text in cells {
        let cell = doc.create_text_element("td", "", text);
        doc.append_child(row, cell);
    }
    row
}
