use std::sync::Arc;

use crate::api::CurriculumApi;
use crate::dom::Document;
use crate::schemas::exercise::ExerciseAnswerRequest;
use crate::services::csrf;
use crate::services::exercise_monitor::ExerciseAnswerMonitor;
use crate::services::widgets::{self, RefreshOutcome, MISSING_STUDENT};

pub(crate) const EMPTY_ANSWER: &str = "回答を入力してください";
pub(crate) const SUBMITTED: &str = "回答を送信しました";
pub(crate) const SUBMIT_FAILED: &str = "送信に失敗しました";

const QUESTION_CLASS: &str = "exercise-question";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExerciseSubmitOutcome {
    EmptyAnswer,
    MissingStudent,
    /// The page has no exercise question with that id, so no lecture to file under.
    UnknownQuestion,
    Failed,
    Submitted { monitor: RefreshOutcome },
}

#[derive(Clone)]
pub(crate) struct ExerciseAnswerSubmitter {
    api: Arc<dyn CurriculumApi>,
    monitor: ExerciseAnswerMonitor,
}

impl ExerciseAnswerSubmitter {
    pub(crate) fn new(api: Arc<dyn CurriculumApi>) -> Self {
        Self { monitor: ExerciseAnswerMonitor::new(api.clone()), api }
    }

    /// Submits `answer_text` as typed; only the emptiness check trims it.
    pub(crate) async fn submit(
        &self,
        doc: &mut Document,
        question_id: &str,
        lecture_id: &str,
        answer_text: &str,
    ) -> ExerciseSubmitOutcome {
        let result_el = doc.element_by_id(&format!("exercise-result-{question_id}"));

        if answer_text.trim().is_empty() {
            widgets::render_result(doc, result_el, EMPTY_ANSWER, "mt-2 text-danger");
            return ExerciseSubmitOutcome::EmptyAnswer;
        }
        let Some(student_id) = widgets::student_id(doc) else {
            widgets::render_result(doc, result_el, MISSING_STUDENT, "mt-2 text-danger");
            return ExerciseSubmitOutcome::MissingStudent;
        };

        let request = ExerciseAnswerRequest {
            lecture_id: lecture_id.to_string(),
            student_id,
            answer_text: answer_text.to_string(),
        };
        let token = csrf::read_token(doc);

        if let Err(err) =
            self.api.submit_exercise_answer(question_id, &request, token.as_deref()).await
        {
            tracing::error!(error = %err, question_id, "Failed to submit exercise answer");
            widgets::render_result(doc, result_el, SUBMIT_FAILED, "mt-2 text-danger");
            return ExerciseSubmitOutcome::Failed;
        }

        widgets::render_result(doc, result_el, SUBMITTED, "mt-2 text-success");
        tracing::info!(question_id, lecture_id, "Exercise answer submitted");

        let monitor = self.monitor.refresh(doc, question_id).await;
        ExerciseSubmitOutcome::Submitted { monitor }
    }

    /// Reads the lecture id and the answer textarea of `question_id` from the page.
    pub(crate) async fn submit_from_page(
        &self,
        doc: &mut Document,
        question_id: &str,
    ) -> ExerciseSubmitOutcome {
        let Some(question) = widgets::find_monitor(doc, QUESTION_CLASS, question_id) else {
            tracing::warn!(question_id, "No exercise question on the page");
            return ExerciseSubmitOutcome::UnknownQuestion;
        };
        let lecture_id = doc.data(question, "lectureId").unwrap_or_default().to_string();
        let answer_text = doc
            .element_by_id(&format!("exercise-answer-{question_id}"))
            .map(|textarea| doc.value(textarea).to_string())
            .unwrap_or_default();

        self.submit(doc, question_id, &lecture_id, &answer_text).await
    }
}
