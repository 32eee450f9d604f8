use async_trait::async_trait;

use super::ApiError;
use crate::schemas::exercise::{ExerciseAnswerRequest, ExerciseAnswerRow};
use crate::schemas::quiz::{QuizAnswerRequest, QuizAnswerResult, QuizAnswerRow, QuizAnswerSheet};

/// The server-side quiz and exercise endpoints the page components talk to.
///
/// `csrf_token` is attached as [`super::CSRF_HEADER`] when present and omitted
/// otherwise.
#[async_trait]
pub(crate) trait CurriculumApi: Send + Sync {
    async fn submit_quiz_answer(
        &self,
        question_id: &str,
        request: &QuizAnswerRequest,
        csrf_token: Option<&str>,
    ) -> Result<QuizAnswerResult, ApiError>;

    async fn quiz_answers(&self, question_id: &str) -> Result<Vec<QuizAnswerRow>, ApiError>;

    async fn submit_exercise_answer(
        &self,
        question_id: &str,
        request: &ExerciseAnswerRequest,
        csrf_token: Option<&str>,
    ) -> Result<(), ApiError>;

    async fn exercise_answers(&self, question_id: &str)
        -> Result<Vec<ExerciseAnswerRow>, ApiError>;

    async fn submit_quiz_answers(
        &self,
        quiz_id: &str,
        answers: &QuizAnswerSheet,
        csrf_token: Option<&str>,
    ) -> Result<(), ApiError>;
}
