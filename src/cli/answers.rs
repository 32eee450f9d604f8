use anyhow::bail;

use super::output::{self, OutputFormat};
use super::Context;
use crate::dom::{Document, NodeId};
use crate::pages;
use crate::services::exercise_monitor::{self, ExerciseAnswerMonitor};
use crate::services::quiz_monitor::{self, QuizAnswerMonitor};
use crate::services::table_sort;
use crate::services::widgets::{self, RefreshOutcome};

/// `order` is the zero-based column to sort by and whether it is ascending.
pub(super) async fn quiz(
    ctx: &Context,
    question_ids: &[String],
    order: Option<(usize, bool)>,
) -> anyhow::Result<()> {
    let mut doc = ctx.page("/quiz/answers");
    let body = doc.body();
    for question_id in question_ids {
        pages::quiz_monitor(&mut doc, body, question_id);
    }

    let outcomes = QuizAnswerMonitor::new(ctx.state.api()).refresh_all(&mut doc).await;

    let mut failed = 0;
    for (question_id, outcome) in &outcomes {
        let Some(monitor) = widgets::find_monitor(&doc, quiz_monitor::MONITOR_CLASS, question_id)
        else {
            continue;
        };
        if let Some((column, ascending)) = order {
            sort_monitor(&mut doc, monitor, column, ascending);
        }
        output::print_heading(&format!("Q{question_id}"), ctx.format);
        let region = match ctx.format {
            OutputFormat::Text => doc.first_by_tag(monitor, "tbody").unwrap_or(monitor),
            OutputFormat::Html => monitor,
        };
        output::print_region(&doc, region, ctx.format);
        if *outcome == RefreshOutcome::Failed {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("failed to fetch answers for {failed} of {} question(s)", outcomes.len());
    }
    Ok(())
}

fn sort_monitor(doc: &mut Document, monitor: NodeId, column: usize, ascending: bool) {
    if let Some(table) = doc.first_by_tag(monitor, "table") {
        table_sort::sort_table(doc, table, column, ascending);
    }
}

pub(super) async fn exercise(
    ctx: &Context,
    question_ids: &[String],
    select: Option<usize>,
) -> anyhow::Result<()> {
    let mut doc = ctx.page("/lecture/answers");
    let body = doc.body();
    for question_id in question_ids {
        pages::exercise_monitor(&mut doc, body, question_id);
    }

    let outcomes = ExerciseAnswerMonitor::new(ctx.state.api()).refresh_all(&mut doc).await;

    let mut failed = 0;
    for (question_id, outcome) in &outcomes {
        if let Some(index) = select {
            if exercise_monitor::select_student(&mut doc, question_id, index).is_none() {
                tracing::warn!(index, question_id = %question_id, "No student at that roster position");
            }
        }
        let Some(monitor) =
            widgets::find_monitor(&doc, exercise_monitor::MONITOR_CLASS, question_id)
        else {
            continue;
        };
        output::print_heading(&format!("Q{question_id}"), ctx.format);
        output::print_region(&doc, monitor, ctx.format);
        if *outcome == RefreshOutcome::Failed {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("failed to fetch answers for {failed} of {} exercise question(s)", outcomes.len());
    }
    Ok(())
}
