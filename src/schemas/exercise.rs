use serde::{Deserialize, Serialize};

/// Body of `POST /api/question-banks/{questionId}/answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExerciseAnswerRequest {
    pub(crate) lecture_id: String,
    pub(crate) student_id: String,
    pub(crate) answer_text: String,
}

/// One respondent in `GET /api/question-banks/{questionId}/answers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExerciseAnswerRow {
    #[serde(default)]
    pub(crate) student_name: Option<String>,
    #[serde(default)]
    pub(crate) answer_text: Option<String>,
}
