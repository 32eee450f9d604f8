use std::sync::Arc;

use crate::api::CurriculumApi;
use crate::dom::{Document, NodeId};
use crate::live::LiveConnector;
use crate::schemas::quiz::QuizAnswerSheet;
use crate::services::csrf;
use crate::services::live_monitor::{LiveFeed, QUIZ_ID_INPUT};
use crate::services::widgets;

pub(crate) const QUESTION_ID_INPUT: &str = "question-id";
pub(crate) const ANSWER_INPUT: &str = "answer-text";
pub(crate) const STATUS_ID: &str = "answer-status";
pub(crate) const FEED_LIST: &str = "answer-feed";

pub(crate) const MISSING_IDS: &str = "クイズIDと問題IDを入力してください。";
pub(crate) const SUBMITTED: &str = "送信が完了しました。";
pub(crate) const REJECTED: &str = "送信に失敗しました。";
pub(crate) const ERRORED: &str = "送信中にエラーが発生しました。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DashboardSubmitOutcome {
    MissingIds,
    /// `feed_opened` is true when this submission started the live feed.
    Submitted { feed_opened: bool },
    Rejected,
    Errored,
}

/// Dashboard form that answers a single question and follows the quiz's live feed.
pub(crate) struct DashboardAnswerForm {
    api: Arc<dyn CurriculumApi>,
    connector: Arc<dyn LiveConnector>,
    feed: Option<LiveFeed>,
}

impl DashboardAnswerForm {
    pub(crate) fn new(api: Arc<dyn CurriculumApi>, connector: Arc<dyn LiveConnector>) -> Self {
        Self { api, connector, feed: None }
    }

    pub(crate) fn feed_mut(&mut self) -> Option<&mut LiveFeed> {
        self.feed.as_mut()
    }

    pub(crate) async fn submit(&mut self, doc: &mut Document) -> DashboardSubmitOutcome {
        let status = doc.element_by_id(STATUS_ID);
        let quiz_id = widgets::input_value(doc, QUIZ_ID_INPUT);
        let question_id = widgets::input_value(doc, QUESTION_ID_INPUT);
        let answer_text = widgets::input_value(doc, ANSWER_INPUT).unwrap_or_default();

        let (Some(quiz_id), Some(question_id)) = (quiz_id, question_id) else {
            show(doc, status, MISSING_IDS, false);
            return DashboardSubmitOutcome::MissingIds;
        };

        let sheet = QuizAnswerSheet::from([(question_id, answer_text)]);
        let token = csrf::read_token(doc);

        match self.api.submit_quiz_answers(&quiz_id, &sheet, token.as_deref()).await {
            Ok(()) => {
                show(doc, status, SUBMITTED, true);
                let feed_opened = self.follow(&quiz_id).await;
                DashboardSubmitOutcome::Submitted { feed_opened }
            }
            Err(err) if err.is_transport() => {
                tracing::error!(error = %err, quiz_id = %quiz_id, "Dashboard answer request failed");
                show(doc, status, ERRORED, false);
                DashboardSubmitOutcome::Errored
            }
            Err(err) => {
                tracing::warn!(error = %err, quiz_id = %quiz_id, "Dashboard answer rejected");
                show(doc, status, REJECTED, false);
                DashboardSubmitOutcome::Rejected
            }
        }
    }

    /// Opens the feed on the first successful submission only.
    async fn follow(&mut self, quiz_id: &str) -> bool {
        if self.feed.is_some() {
            return false;
        }
        match LiveFeed::open(self.connector.as_ref(), quiz_id, FEED_LIST).await {
            Ok(feed) => {
                self.feed = Some(feed);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, quiz_id, "Failed to open answer feed");
                false
            }
        }
    }
}

fn show(doc: &mut Document, status: Option<NodeId>, text: &str, success: bool) {
    if let Some(status) = status {
        widgets::render_status(doc, status, text, Some(success));
    }
}
