//! Instructor dashboard: live answer tallies pushed over STOMP.

use std::sync::Arc;

use crate::dom::{Document, NodeId};
use crate::live::{LiveConnector, LiveError, LiveSource};
use crate::schemas::live::AnswerTally;
use crate::services::widgets;

pub(crate) const QUIZ_ID_INPUT: &str = "quiz-id";
pub(crate) const CONNECT_BUTTON: &str = "connect-btn";
pub(crate) const ANSWERS_LIST: &str = "answers";
pub(crate) const STATUS_ID: &str = "monitor-status";

pub(crate) const MISSING_QUIZ_ID: &str = "クイズIDを入力してください";
pub(crate) const CONNECTED: &str = "接続しました";
pub(crate) const CONNECT_FAILED: &str = "接続に失敗しました";

pub(crate) fn answers_topic(quiz_id: &str) -> String {
    format!("/topic/answers/{quiz_id}")
}

/// An open subscription rendering into one list element.
///
/// Dropping it ends the subscription; a closed channel is never reopened.
pub(crate) struct LiveFeed {
    source: Box<dyn LiveSource>,
    list_id: &'static str,
    quiz_id: String,
}

impl LiveFeed {
    pub(crate) async fn open(
        connector: &dyn LiveConnector,
        quiz_id: &str,
        list_id: &'static str,
    ) -> Result<Self, LiveError> {
        let source = connector.subscribe(&answers_topic(quiz_id)).await?;
        Ok(Self { source, list_id, quiz_id: quiz_id.to_string() })
    }

    pub(crate) fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    /// Unsubscribes; the feed yields nothing useful afterwards.
    pub(crate) async fn close(&mut self) {
        tracing::info!(quiz_id = %self.quiz_id, "Leaving live answer feed");
        self.source.close().await;
    }

    /// Waits for the next push and re-renders the list from it.
    ///
    /// Returns the number of items rendered, or `None` once the channel has
    /// closed. Payloads that are not a JSON object are logged and skipped.
    pub(crate) async fn next_update(&mut self, doc: &mut Document) -> Result<Option<usize>, LiveError> {
        loop {
            let Some(body) = self.source.next_body().await? else {
                tracing::info!(quiz_id = %self.quiz_id, "Live answer feed closed");
                return Ok(None);
            };
            match serde_json::from_str::<AnswerTally>(&body) {
                Ok(tally) => {
                    let Some(list) = doc.element_by_id(self.list_id) else {
                        return Ok(Some(0));
                    };
                    render_tally(doc, list, &tally);
                    return Ok(Some(tally.entries().len()));
                }
                Err(err) => {
                    tracing::warn!(error = %err, quiz_id = %self.quiz_id, "Ignoring malformed answer push");
                }
            }
        }
    }
}

/// Replaces the contents of `list` with one `Q{id}: {value}` item per entry.
pub(crate) fn render_tally(doc: &mut Document, list: NodeId, tally: &AnswerTally) {
    doc.clear_children(list);
    for (question_id, value) in tally.entries() {
        let item = doc.create_text_element("li", "list-group-item", &format!("Q{question_id}: {value}"));
        doc.append_child(list, item);
    }
}

pub(crate) enum ConnectOutcome {
    MissingQuizId,
    Failed(LiveError),
    Connected(LiveFeed),
}

#[derive(Clone)]
pub(crate) struct DashboardMonitor {
    connector: Arc<dyn LiveConnector>,
}

impl DashboardMonitor {
    pub(crate) fn new(connector: Arc<dyn LiveConnector>) -> Self {
        Self { connector }
    }

    /// The "connect" button: validates the quiz id and subscribes to its topic.
    pub(crate) async fn connect(&self, doc: &mut Document) -> ConnectOutcome {
        let status = status_element(doc);

        let Some(quiz_id) = widgets::input_value(doc, QUIZ_ID_INPUT) else {
            widgets::render_status(doc, status, MISSING_QUIZ_ID, Some(false));
            return ConnectOutcome::MissingQuizId;
        };
        widgets::render_status(doc, status, "", None);

        match LiveFeed::open(self.connector.as_ref(), &quiz_id, ANSWERS_LIST).await {
            Ok(feed) => {
                widgets::render_status(doc, status, CONNECTED, Some(true));
                ConnectOutcome::Connected(feed)
            }
            Err(err) => {
                tracing::error!(error = %err, quiz_id = %quiz_id, "Failed to connect live answer feed");
                widgets::render_status(doc, status, CONNECT_FAILED, Some(false));
                ConnectOutcome::Failed(err)
            }
        }
    }
}

/// `#monitor-status`, created right after the connect button when the page lacks one.
fn status_element(doc: &mut Document) -> NodeId {
    if let Some(status) = doc.element_by_id(STATUS_ID) {
        return status;
    }
    let status = doc.create_element("div");
    doc.set_id(status, STATUS_ID);
    match doc.element_by_id(CONNECT_BUTTON) {
        Some(button) => doc.insert_after(button, status),
        None => {
            let body = doc.body();
            doc.append_child(body, status);
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages;
    use crate::test_support::FakeConnector;

    fn page(quiz_id: &str, with_status: bool) -> Document {
        let mut doc = Document::new("/dashboard");
        let body = doc.body();
        pages::dashboard_monitor(&mut doc, body, with_status);
        pages::set_input(&mut doc, QUIZ_ID_INPUT, quiz_id);
        doc
    }

    fn items(doc: &Document) -> Vec<String> {
        let list = doc.element_by_id(ANSWERS_LIST).expect("list");
        doc.child_elements(list).into_iter().map(|item| doc.text_content(item)).collect()
    }

    fn status(doc: &Document) -> (String, String) {
        let status = doc.element_by_id(STATUS_ID).expect("status");
        (doc.text_content(status), doc.class_name(status))
    }

    #[tokio::test]
    async fn blank_quiz_id_is_rejected_before_connecting() {
        let connector = FakeConnector::new(Vec::new());
        let mut doc = page("  ", true);

        let outcome = DashboardMonitor::new(connector.clone()).connect(&mut doc).await;

        assert!(matches!(outcome, ConnectOutcome::MissingQuizId));
        assert_eq!(status(&doc), (MISSING_QUIZ_ID.to_string(), "text-danger".to_string()));
        assert!(connector.subscriptions().is_empty());
    }

    #[tokio::test]
    async fn status_is_created_after_connect_button() {
        let connector = FakeConnector::new(Vec::new());
        let mut doc = page("7", false);

        let outcome = DashboardMonitor::new(connector.clone()).connect(&mut doc).await;

        assert!(matches!(outcome, ConnectOutcome::Connected(_)));
        assert_eq!(status(&doc), (CONNECTED.to_string(), "text-success".to_string()));
        let button = doc.element_by_id(CONNECT_BUTTON).expect("button");
        let parent = doc.parent(button).expect("parent");
        let siblings = doc.child_elements(parent);
        let position = siblings.iter().position(|node| *node == button).expect("button position");
        assert_eq!(doc.id(siblings[position + 1]), Some(STATUS_ID));
        assert_eq!(connector.subscriptions(), vec!["/topic/answers/7".to_string()]);
    }

    #[tokio::test]
    async fn each_push_replaces_the_list() {
        let connector = FakeConnector::new(vec![
            r#"{"2":"b","1":"a"}"#.to_string(),
            "not json".to_string(),
            r#"{"3":"<i>c</i>"}"#.to_string(),
        ]);
        let mut doc = page("7", true);

        let ConnectOutcome::Connected(mut feed) =
            DashboardMonitor::new(connector).connect(&mut doc).await
        else {
            panic!("expected connection");
        };
        assert_eq!(feed.quiz_id(), "7");

        assert_eq!(feed.next_update(&mut doc).await.expect("first"), Some(2));
        assert_eq!(items(&doc), vec!["Q1: a", "Q2: b"]);

        assert_eq!(feed.next_update(&mut doc).await.expect("second"), Some(1));
        assert_eq!(items(&doc), vec!["Q3: <i>c</i>"]);
        let list = doc.element_by_id(ANSWERS_LIST).expect("list");
        assert!(doc.first_by_tag(list, "i").is_none());

        assert_eq!(feed.next_update(&mut doc).await.expect("closed"), None);
        assert_eq!(items(&doc), vec!["Q3: <i>c</i>"]);
    }

    #[tokio::test]
    async fn closing_the_feed_closes_its_source() {
        let connector = FakeConnector::new(vec![r#"{"1":"a"}"#.to_string()]);
        let mut doc = page("7", true);

        let ConnectOutcome::Connected(mut feed) =
            DashboardMonitor::new(connector.clone()).connect(&mut doc).await
        else {
            panic!("expected connection");
        };
        assert_eq!(connector.closed(), 0);
        feed.close().await;

        assert_eq!(connector.closed(), 1);
    }

    #[tokio::test]
    async fn refused_connection_marks_status_failed() {
        let connector = FakeConnector::refusing();
        let mut doc = page("7", true);

        let outcome = DashboardMonitor::new(connector).connect(&mut doc).await;

        assert!(matches!(outcome, ConnectOutcome::Failed(LiveError::Broker(_))));
        assert_eq!(status(&doc), (CONNECT_FAILED.to_string(), "text-danger".to_string()));
    }

    #[test]
    fn repeated_pushes_do_not_grow_the_document() {
        let mut doc = page("7", true);
        let list = doc.element_by_id(ANSWERS_LIST).expect("list");
        let tally: AnswerTally = serde_json::from_str(r#"{"1":"a","2":"b","3":"c"}"#).expect("tally");

        render_tally(&mut doc, list, &tally);
        let after_first = doc.arena_len();
        for _ in 0..10_000 {
            render_tally(&mut doc, list, &tally);
        }

        assert_eq!(doc.arena_len(), after_first);
        assert_eq!(items(&doc), vec!["Q1: a", "Q2: b", "Q3: c"]);
    }
}
