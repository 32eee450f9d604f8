use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use axum::Router;
use reqwest::Url;
use tokio::net::TcpListener;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::api::{ApiError, CurriculumApi};
use crate::live::{LiveConnector, LiveError, LiveSource};
use crate::schemas::exercise::{ExerciseAnswerRequest, ExerciseAnswerRow};
use crate::schemas::quiz::{QuizAnswerRequest, QuizAnswerResult, QuizAnswerRow, QuizAnswerSheet};

/// Context path the server deploys the application under.
pub(crate) const APP_PATH: &str = "/giiku";

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<AsyncMutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(AsyncMutex::new(()))).clone();
    lock.lock_owned().await
}

/// Serves `router` under [`APP_PATH`] on an ephemeral port and returns the
/// application base URL.
pub(crate) async fn spawn_server(router: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    let app = Router::new().nest(APP_PATH, router);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test app");
    });
    Url::parse(&format!("http://{addr}{APP_PATH}")).expect("base url")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    SubmitQuiz { question_id: String, request: QuizAnswerRequest, csrf: Option<String> },
    QuizAnswers(String),
    SubmitExercise { question_id: String, request: ExerciseAnswerRequest, csrf: Option<String> },
    ExerciseAnswers(String),
    SubmitSheet { quiz_id: String, answers: QuizAnswerSheet, csrf: Option<String> },
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum FakeFailure {
    Status(u16),
    ContentType,
    Transport,
}

impl FakeFailure {
    async fn into_error(self) -> ApiError {
        match self {
            FakeFailure::Status(code) => ApiError::Status(code),
            FakeFailure::ContentType => ApiError::UnexpectedContentType("text/html".to_string()),
            FakeFailure::Transport => {
                let err = reqwest::Client::new()
                    .get("http://")
                    .send()
                    .await
                    .expect_err("request without host must fail");
                ApiError::Transport(err)
            }
        }
    }
}

/// Scripted [`CurriculumApi`] that records every call.
#[derive(Debug)]
pub(crate) struct FakeApi {
    quiz_result: Mutex<QuizAnswerResult>,
    quiz_rows: Mutex<Vec<QuizAnswerRow>>,
    exercise_rows: Mutex<Vec<ExerciseAnswerRow>>,
    read_failure: Mutex<Option<FakeFailure>>,
    submit_failure: Mutex<Option<FakeFailure>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            quiz_result: Mutex::new(QuizAnswerResult { correct: false, explanation: None }),
            quiz_rows: Mutex::new(Vec::new()),
            exercise_rows: Mutex::new(Vec::new()),
            read_failure: Mutex::new(None),
            submit_failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn with_quiz_result(self: Arc<Self>, result: QuizAnswerResult) -> Arc<Self> {
        *self.quiz_result.lock().expect("result lock") = result;
        self
    }

    pub(crate) fn with_quiz_rows(self: Arc<Self>, rows: Vec<QuizAnswerRow>) -> Arc<Self> {
        self.set_quiz_rows(rows);
        self
    }

    pub(crate) fn with_exercise_rows(self: Arc<Self>, rows: Vec<ExerciseAnswerRow>) -> Arc<Self> {
        *self.exercise_rows.lock().expect("rows lock") = rows;
        self
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn set_quiz_rows(&self, rows: Vec<QuizAnswerRow>) {
        *self.quiz_rows.lock().expect("rows lock") = rows;
    }

    pub(crate) fn fail_reads(&self, failure: FakeFailure) {
        *self.read_failure.lock().expect("failure lock") = Some(failure);
    }

    pub(crate) fn fail_submissions(&self, failure: FakeFailure) {
        *self.submit_failure.lock().expect("failure lock") = Some(failure);
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().expect("calls lock").push(call);
    }

    async fn check(slot: &Mutex<Option<FakeFailure>>) -> Result<(), ApiError> {
        let failure = *slot.lock().expect("failure lock");
        match failure {
            Some(failure) => Err(failure.into_error().await),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CurriculumApi for FakeApi {
    async fn submit_quiz_answer(
        &self,
        question_id: &str,
        request: &QuizAnswerRequest,
        csrf_token: Option<&str>,
    ) -> Result<QuizAnswerResult, ApiError> {
        self.record(ApiCall::SubmitQuiz {
            question_id: question_id.to_string(),
            request: request.clone(),
            csrf: csrf_token.map(str::to_string),
        });
        Self::check(&self.submit_failure).await?;
        Ok(self.quiz_result.lock().expect("result lock").clone())
    }

    async fn quiz_answers(&self, question_id: &str) -> Result<Vec<QuizAnswerRow>, ApiError> {
        self.record(ApiCall::QuizAnswers(question_id.to_string()));
        Self::check(&self.read_failure).await?;
        Ok(self.quiz_rows.lock().expect("rows lock").clone())
    }

    async fn submit_exercise_answer(
        &self,
        question_id: &str,
        request: &ExerciseAnswerRequest,
        csrf_token: Option<&str>,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::SubmitExercise {
            question_id: question_id.to_string(),
            request: request.clone(),
            csrf: csrf_token.map(str::to_string),
        });
        Self::check(&self.submit_failure).await
    }

    async fn exercise_answers(
        &self,
        question_id: &str,
    ) -> Result<Vec<ExerciseAnswerRow>, ApiError> {
        self.record(ApiCall::ExerciseAnswers(question_id.to_string()));
        Self::check(&self.read_failure).await?;
        Ok(self.exercise_rows.lock().expect("rows lock").clone())
    }

    async fn submit_quiz_answers(
        &self,
        quiz_id: &str,
        answers: &QuizAnswerSheet,
        csrf_token: Option<&str>,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::SubmitSheet {
            quiz_id: quiz_id.to_string(),
            answers: answers.clone(),
            csrf: csrf_token.map(str::to_string),
        });
        Self::check(&self.submit_failure).await
    }
}

/// [`LiveConnector`] handing out a scripted sequence of pushes.
#[derive(Debug)]
pub(crate) struct FakeConnector {
    bodies: Vec<String>,
    refuse: bool,
    subscriptions: Mutex<Vec<String>>,
    closed: Arc<AtomicUsize>,
}

impl FakeConnector {
    pub(crate) fn new(bodies: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            bodies,
            refuse: false,
            subscriptions: Mutex::new(Vec::new()),
            closed: Arc::default(),
        })
    }

    pub(crate) fn refusing() -> Arc<Self> {
        Arc::new(Self {
            bodies: Vec::new(),
            refuse: true,
            subscriptions: Mutex::new(Vec::new()),
            closed: Arc::default(),
        })
    }

    /// Number of sources closed so far.
    pub(crate) fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().expect("subscriptions lock").clone()
    }
}

#[async_trait]
impl LiveConnector for FakeConnector {
    async fn subscribe(&self, destination: &str) -> Result<Box<dyn LiveSource>, LiveError> {
        if self.refuse {
            return Err(LiveError::Broker("connection refused".to_string()));
        }
        self.subscriptions.lock().expect("subscriptions lock").push(destination.to_string());
        Ok(Box::new(FakeSource {
            bodies: self.bodies.iter().cloned().collect(),
            closed: self.closed.clone(),
        }))
    }
}

struct FakeSource {
    bodies: VecDeque<String>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl LiveSource for FakeSource {
    async fn next_body(&mut self) -> Result<Option<String>, LiveError> {
        Ok(self.bodies.pop_front())
    }

    async fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}
