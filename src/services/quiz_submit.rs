use std::sync::Arc;

use crate::api::CurriculumApi;
use crate::dom::Document;
use crate::schemas::quiz::QuizAnswerRequest;
use crate::services::csrf;
use crate::services::quiz_monitor::QuizAnswerMonitor;
use crate::services::widgets::{self, RefreshOutcome, MISSING_STUDENT};

pub(crate) const CORRECT_PREFIX: &str = "正解！ ";
pub(crate) const INCORRECT_PREFIX: &str = "不正解。";
pub(crate) const NO_SELECTION: &str = "回答を選択してください。";
pub(crate) const SUBMIT_FAILED: &str = "送信に失敗しました。";

const QUESTION_CLASS: &str = "quiz-question";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum QuizSubmitOutcome {
    NoSelection,
    MissingStudent,
    Failed,
    Scored { correct: bool, monitor: RefreshOutcome },
}

/// Posts the checked options of a quiz question and shows the verdict.
#[derive(Clone)]
pub(crate) struct QuizAnswerSubmitter {
    api: Arc<dyn CurriculumApi>,
    monitor: QuizAnswerMonitor,
}

impl QuizAnswerSubmitter {
    pub(crate) fn new(api: Arc<dyn CurriculumApi>) -> Self {
        Self { monitor: QuizAnswerMonitor::new(api.clone()), api }
    }

    pub(crate) async fn submit(&self, doc: &mut Document, question_id: &str) -> QuizSubmitOutcome {
        let result_el = doc.element_by_id(&format!("quiz-result-{question_id}"));

        let selected = selected_options(doc, question_id);
        if selected.is_empty() {
            widgets::render_result(doc, result_el, NO_SELECTION, "text-danger");
            return QuizSubmitOutcome::NoSelection;
        }
        let Some(student_id) = widgets::student_id(doc) else {
            widgets::render_result(doc, result_el, MISSING_STUDENT, "text-danger");
            return QuizSubmitOutcome::MissingStudent;
        };

        let request = QuizAnswerRequest {
            quiz_id: quiz_id(doc, question_id),
            student_id,
            answer: selected.join(","),
        };
        let token = csrf::read_token(doc);

        let result = match self.api.submit_quiz_answer(question_id, &request, token.as_deref()).await
        {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(error = %err, question_id, "Failed to submit quiz answer");
                widgets::render_result(doc, result_el, SUBMIT_FAILED, "text-danger");
                return QuizSubmitOutcome::Failed;
            }
        };

        let explanation = result.explanation.as_deref().unwrap_or_default();
        if result.correct {
            let text = format!("{CORRECT_PREFIX}{explanation}");
            widgets::render_result(doc, result_el, &text, "text-success");
        } else {
            let text = format!("{INCORRECT_PREFIX}{explanation}");
            widgets::render_result(doc, result_el, &text, "text-danger");
        }
        tracing::info!(question_id, correct = result.correct, "Quiz answer scored");

        let monitor = self.monitor.refresh(doc, question_id).await;
        QuizSubmitOutcome::Scored { correct: result.correct, monitor }
    }
}

/// Values of the checked `quiz-{id}` inputs, in document order.
fn selected_options(doc: &Document, question_id: &str) -> Vec<String> {
    let name = format!("quiz-{question_id}");
    doc.find_all(doc.root(), |doc, node| {
        doc.tag(node) == "input" && doc.attr(node, "name") == Some(name.as_str()) && doc.is_checked(node)
    })
    .into_iter()
    .map(|node| doc.value(node).to_string())
    .collect()
}

fn quiz_id(doc: &Document, question_id: &str) -> Option<String> {
    let question = widgets::find_monitor(doc, QUESTION_CLASS, question_id)?;
    doc.data(question, "quizId").filter(|id| !id.is_empty()).map(str::to_string)
}
