use std::sync::Arc;

use crate::api::CurriculumApi;
use crate::dom::{Document, NodeId};
use crate::services::widgets::{self, RefreshOutcome, FETCH_FAILED, NO_ANSWERS};

pub(crate) const MONITOR_CLASS: &str = "exercise-answer-monitor";
const LIST_CLASS: &str = "exercise-student-list";
const DISPLAY_CLASS: &str = "exercise-answer-display";
const ROSTER_ITEM_CLASS: &str = "list-group-item list-group-item-action";
const ANSWER_ATTR: &str = "answerText";

/// Roster of students who answered a free-text exercise. Picking a student
/// shows their answer in the display area.
#[derive(Clone)]
pub(crate) struct ExerciseAnswerMonitor {
    api: Arc<dyn CurriculumApi>,
}

impl ExerciseAnswerMonitor {
    pub(crate) fn new(api: Arc<dyn CurriculumApi>) -> Self {
        Self { api }
    }

    pub(crate) async fn refresh(&self, doc: &mut Document, question_id: &str) -> RefreshOutcome {
        let Some((list, display)) = parts(doc, question_id) else {
            return RefreshOutcome::NoTarget;
        };

        let result = self.api.exercise_answers(question_id).await;
        doc.clear_children(list);
        doc.set_text_content(display, "");

        match result {
            Ok(rows) if rows.is_empty() => {
                let item = doc.create_text_element("li", "list-group-item text-muted", NO_ANSWERS);
                doc.append_child(list, item);
                RefreshOutcome::Empty
            }
            Ok(rows) => {
                for row in &rows {
                    let name = row.student_name.as_deref().unwrap_or_default();
                    let item = doc.create_text_element("li", ROSTER_ITEM_CLASS, name);
                    doc.set_data(item, ANSWER_ATTR, row.answer_text.as_deref().unwrap_or_default());
                    doc.append_child(list, item);
                }
                RefreshOutcome::Rendered(rows.len())
            }
            Err(err) => {
                tracing::error!(error = %err, question_id, "Failed to fetch exercise answers");
                let item = doc.create_text_element("li", "list-group-item text-danger", FETCH_FAILED);
                doc.append_child(list, item);
                RefreshOutcome::Failed
            }
        }
    }

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

fn parts(doc: &Document, question_id: &str) -> Option<(NodeId, NodeId)> {
    let monitor = widgets::find_monitor(doc, MONITOR_CLASS, question_id)?;
    let list = doc.first_with_class(monitor, LIST_CLASS)?;
    let display = doc.first_with_class(monitor, DISPLAY_CLASS)?;
    Some((list, display))
}

/// Students currently listed in the roster, in server order.
pub(crate) fn roster(doc: &Document, question_id: &str) -> Vec<NodeId> {
    let Some((list, _)) = parts(doc, question_id) else {
        return Vec::new();
    };
    doc.child_elements(list)
        .into_iter()
        .filter(|item| doc.data(*item, ANSWER_ATTR).is_some())
        .collect()
}

/// Shows the answer of the `index`-th listed student. Returns the text shown.
pub(crate) fn select_student(doc: &mut Document, question_id: &str, index: usize) -> Option<String> {
    let (_, display) = parts(doc, question_id)?;
    let item = *roster(doc, question_id).get(index)?;
    let answer = doc.data(item, ANSWER_ATTR).unwrap_or_default().to_string();
    doc.set_text_content(display, &answer);
    Some(answer)
}
