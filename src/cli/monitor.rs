use anyhow::bail;

use super::output::{self, OutputFormat};
use super::Context;
use crate::core::shutdown;
use crate::dom::Document;
use crate::pages;
use crate::services::live_monitor::{self, ConnectOutcome, DashboardMonitor, LiveFeed};

pub(super) async fn run(ctx: &Context, quiz_id: &str) -> anyhow::Result<()> {
    let mut doc = ctx.page("/dashboard");
    let body = doc.body();
    pages::dashboard_monitor(&mut doc, body, false);
    pages::set_input(&mut doc, live_monitor::QUIZ_ID_INPUT, quiz_id);

    let outcome = DashboardMonitor::new(ctx.state.live()).connect(&mut doc).await;

    if let Some(status) = doc.element_by_id(live_monitor::STATUS_ID) {
        output::print_region(&doc, status, ctx.format);
    }
    match outcome {
        ConnectOutcome::Connected(mut feed) => {
            follow(&mut doc, &mut feed, live_monitor::ANSWERS_LIST, ctx.format).await
        }
        ConnectOutcome::MissingQuizId => bail!("a quiz id is required"),
        ConnectOutcome::Failed(err) => Err(err.into()),
    }
}

/// Prints the list after every push until the feed closes or the user stops.
pub(super) async fn follow(
    doc: &mut Document,
    feed: &mut LiveFeed,
    list_id: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    tracing::info!(quiz_id = feed.quiz_id(), "Following live answers");
    let stop = shutdown::stop_signal();
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = &mut stop => {
                feed.close().await;
                return Ok(());
            }
            update = feed.next_update(doc) => {
                match update {
                    Ok(Some(_)) => {
                        if let Some(list) = doc.element_by_id(list_id) {
                            output::print_heading(&format!("quiz {}", feed.quiz_id()), format);
                            output::print_region(doc, list, format);
                        }
                    }
                    Ok(None) => return Ok(()),
                    Err(err) => {
                        tracing::error!(error = %err, "Live answer feed failed");
                        return Err(err.into());
                    }
                }
            }
        }
    }
}
