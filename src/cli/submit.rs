use anyhow::bail;

use super::output;
use super::{monitor, Context};
use crate::pages;
use crate::services::dashboard_answer::{self, DashboardAnswerForm, DashboardSubmitOutcome};
use crate::services::exercise_submit::{ExerciseAnswerSubmitter, ExerciseSubmitOutcome};
use crate::services::live_monitor::QUIZ_ID_INPUT;
use crate::services::quiz_monitor;
use crate::services::quiz_submit::{QuizAnswerSubmitter, QuizSubmitOutcome};
use crate::services::widgets;

pub(super) async fn quiz(
    ctx: &Context,
    question_id: &str,
    options: &[String],
    quiz_id: Option<&str>,
) -> anyhow::Result<()> {
    let mut doc = ctx.page(&format!("/quiz/question/{question_id}"));
    let body = doc.body();
    let choices: Vec<(&str, &str)> =
        options.iter().map(|option| (option.as_str(), option.as_str())).collect();
    pages::quiz_question(&mut doc, body, question_id, quiz_id, &choices);
    pages::quiz_monitor(&mut doc, body, question_id);
    for option in options {
        pages::check_option(&mut doc, question_id, option);
    }

    let outcome = QuizAnswerSubmitter::new(ctx.state.api()).submit(&mut doc, question_id).await;

    if let Some(result) = doc.element_by_id(&format!("quiz-result-{question_id}")) {
        output::print_region(&doc, result, ctx.format);
    }
    match outcome {
        QuizSubmitOutcome::Scored { .. } => {
            if let Some(monitor) =
                widgets::find_monitor(&doc, quiz_monitor::MONITOR_CLASS, question_id)
            {
                output::print_heading("answers", ctx.format);
                output::print_region(&doc, monitor, ctx.format);
            }
            Ok(())
        }
        other => bail!("quiz answer was not recorded ({other:?})"),
    }
}

pub(super) async fn exercise(
    ctx: &Context,
    question_id: &str,
    lecture_id: &str,
    answer: &str,
) -> anyhow::Result<()> {
    let mut doc = ctx.page(&format!("/lecture/{lecture_id}"));
    let body = doc.body();
    let textarea = pages::exercise_question(&mut doc, body, question_id, lecture_id);
    doc.set_value(textarea, answer);
    let monitor = pages::exercise_monitor(&mut doc, body, question_id);

    let outcome =
        ExerciseAnswerSubmitter::new(ctx.state.api()).submit_from_page(&mut doc, question_id).await;

    if let Some(result) = doc.element_by_id(&format!("exercise-result-{question_id}")) {
        output::print_region(&doc, result, ctx.format);
    }
    match outcome {
        ExerciseSubmitOutcome::Submitted { .. } => {
            output::print_heading("answers", ctx.format);
            output::print_region(&doc, monitor, ctx.format);
            Ok(())
        }
        other => bail!("exercise answer was not recorded ({other:?})"),
    }
}

pub(super) async fn dashboard(
    ctx: &Context,
    quiz_id: &str,
    question_id: &str,
    answer: &str,
    follow: bool,
) -> anyhow::Result<()> {
    let mut doc = ctx.page("/dashboard");
    let body = doc.body();
    pages::dashboard_answer_form(&mut doc, body);
    pages::set_input(&mut doc, QUIZ_ID_INPUT, quiz_id);
    pages::set_input(&mut doc, dashboard_answer::QUESTION_ID_INPUT, question_id);
    pages::set_input(&mut doc, dashboard_answer::ANSWER_INPUT, answer);

    let mut form = DashboardAnswerForm::new(ctx.state.api(), ctx.state.live());
    let outcome = form.submit(&mut doc).await;

    if let Some(status) = doc.element_by_id(dashboard_answer::STATUS_ID) {
        output::print_region(&doc, status, ctx.format);
    }
    if !matches!(outcome, DashboardSubmitOutcome::Submitted { .. }) {
        bail!("dashboard answer was not recorded ({outcome:?})");
    }

    if follow {
        match form.feed_mut() {
            Some(feed) => {
                monitor::follow(&mut doc, feed, dashboard_answer::FEED_LIST, ctx.format).await?
            }
            None => tracing::warn!(quiz_id, "Live feed is not available; not following"),
        }
    }
    Ok(())
}
