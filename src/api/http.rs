use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::is_json_content_type;
use super::{ApiError, CurriculumApi, CSRF_HEADER};
use crate::core::config::Settings;
use crate::schemas::exercise::{ExerciseAnswerRequest, ExerciseAnswerRow};
use crate::schemas::quiz::{QuizAnswerRequest, QuizAnswerResult, QuizAnswerRow, QuizAnswerSheet};

/// reqwest-backed [`CurriculumApi`]. No client-side timeout and no retries.
#[derive(Debug, Clone)]
pub(crate) struct HttpCurriculumApi {
    client: Client,
    base_url: String,
}

impl HttpCurriculumApi {
    pub(crate) fn new(base_url: &Url) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("giiku-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build curriculum HTTP client")?;

        Ok(Self { client, base_url: base_url.as_str().trim_end_matches('/').to_string() })
    }

    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(settings.base_url())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        csrf_token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut request = self.client.post(self.endpoint(path)).json(body);
        if let Some(token) = csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let response = request.send().await?;
        ensure_success(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = ensure_success(response)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_json_content_type(&content_type) {
            return Err(ApiError::UnexpectedContentType(content_type));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    Ok(response)
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl CurriculumApi for HttpCurriculumApi {
    async fn submit_quiz_answer(
        &self,
        question_id: &str,
        request: &QuizAnswerRequest,
        csrf_token: Option<&str>,
    ) -> Result<QuizAnswerResult, ApiError> {
        let path = format!("/api/quizzes/questions/{}/answer", segment(question_id));
        let response = self.post_json(&path, request, csrf_token).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn quiz_answers(&self, question_id: &str) -> Result<Vec<QuizAnswerRow>, ApiError> {
        self.get_json(&format!("/api/quizzes/questions/{}/answers", segment(question_id))).await
    }

    async fn submit_exercise_answer(
        &self,
        question_id: &str,
        request: &ExerciseAnswerRequest,
        csrf_token: Option<&str>,
    ) -> Result<(), ApiError> {
        let path = format!("/api/question-banks/{}/answer", segment(question_id));
        self.post_json(&path, request, csrf_token).await?;
        Ok(())
    }

    async fn exercise_answers(
        &self,
        question_id: &str,
    ) -> Result<Vec<ExerciseAnswerRow>, ApiError> {
        self.get_json(&format!("/api/question-banks/{}/answers", segment(question_id))).await
    }

    async fn submit_quiz_answers(
        &self,
        quiz_id: &str,
        answers: &QuizAnswerSheet,
        csrf_token: Option<&str>,
    ) -> Result<(), ApiError> {
        let path = format!("/api/quizzes/{}/answer", segment(quiz_id));
        self.post_json(&path, answers, csrf_token).await?;
        Ok(())
    }
}
