use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of `POST /api/quizzes/questions/{questionId}/answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizAnswerRequest {
    pub(crate) quiz_id: Option<String>,
    pub(crate) student_id: String,
    /// Selected option values joined with `,`.
    pub(crate) answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct QuizAnswerResult {
    pub(crate) correct: bool,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
}

/// One respondent in `GET /api/quizzes/questions/{questionId}/answers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizAnswerRow {
    #[serde(default)]
    pub(crate) student_name: Option<String>,
    #[serde(default)]
    pub(crate) answer_text: Option<String>,
    #[serde(default)]
    pub(crate) correct: Option<bool>,
}

impl QuizAnswerRow {
    pub(crate) fn is_correct(&self) -> bool {
        self.correct.unwrap_or(false)
    }
}

/// Body of `POST /api/quizzes/{quizId}/answer`: question id to answer text.
pub(crate) type QuizAnswerSheet = BTreeMap<String, String>;
