//! `giiku` command line: drives the page widgets against a live server and
//! prints the page regions they rendered.

mod answers;
mod lecture;
mod monitor;
mod output;
mod page;
mod submit;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::state::AppState;
pub(crate) use output::OutputFormat;

/// Client for the IT-training curriculum server
#[derive(Debug, Parser)]
#[command(name = "giiku", version)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// How rendered page regions are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub(crate) format: OutputFormat,

    /// Student id written into the page (overrides GIIKU_STUDENT_ID)
    #[arg(long, global = true)]
    pub(crate) student_id: Option<String>,

    /// Keep preferences in memory for this run instead of the preferences file
    #[arg(long, global = true)]
    pub(crate) ephemeral: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Show who answered quiz questions and whether they were right
    QuizAnswers {
        /// Question ids
        #[arg(required = true)]
        question_ids: Vec<String>,

        /// Sort each table by this column (zero-based)
        #[arg(long)]
        sort: Option<usize>,

        /// Sort in descending order
        #[arg(long, requires = "sort")]
        desc: bool,
    },

    /// Show the rosters of exercise questions
    ExerciseAnswers {
        /// Question ids
        #[arg(required = true)]
        question_ids: Vec<String>,

        /// Reveal the answer of the n-th listed student (zero-based) in each roster
        #[arg(long)]
        select: Option<usize>,
    },

    /// Answer a quiz question with one or more option values
    SubmitQuiz {
        question_id: String,

        /// Selected option value; repeat for multiple choices
        #[arg(long = "option")]
        options: Vec<String>,

        #[arg(long)]
        quiz_id: Option<String>,
    },

    /// Answer an exercise question with free text
    SubmitExercise {
        question_id: String,

        #[arg(long)]
        lecture_id: String,

        #[arg(long)]
        answer: String,
    },

    /// Post one answer through the dashboard form
    DashboardAnswer {
        #[arg(long, default_value = "")]
        quiz_id: String,

        #[arg(long, default_value = "")]
        question_id: String,

        #[arg(long, default_value = "")]
        answer: String,

        /// Keep following the quiz's live feed after submitting
        #[arg(long)]
        follow: bool,
    },

    /// Follow live answer tallies for a quiz until interrupted
    Monitor { quiz_id: String },

    /// Render the navigation chrome of a day page
    DayNav {
        /// Page path, e.g. /curriculum/day/day12.html
        path: String,
    },

    /// Read or write a stored UI preference
    #[command(subcommand)]
    Prefs(PrefsCommand),

    /// Show or change the dark mode preference
    DarkMode {
        #[arg(value_enum)]
        state: Option<Switch>,
    },

    /// Render an answer block and click its toggle button
    ToggleAnswer {
        answer_id: String,

        #[arg(long)]
        text: String,

        /// Render a sample-answer toggle instead of a plain answer toggle
        #[arg(long)]
        sample: bool,

        #[arg(long, default_value_t = 1)]
        clicks: usize,
    },

    /// Show the active tab of a page, or switch to another one
    Tabs {
        /// Page path; the remembered tab is keyed by its file name
        path: String,

        /// Tab ids in page order
        #[arg(required = true)]
        tab_ids: Vec<String>,

        #[arg(long)]
        activate: Option<String>,
    },

    /// Tick or untick checklist items and show the progress
    Checklist {
        /// Item ids in page order
        #[arg(required = true)]
        item_ids: Vec<String>,

        #[arg(long)]
        check: Vec<String>,

        #[arg(long)]
        uncheck: Vec<String>,
    },

    /// Search text files the way the site search box does
    Search {
        term: String,

        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },

    /// Show which navigation links are active on a page
    Nav {
        path: String,

        #[arg(required = true)]
        hrefs: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum PrefsCommand {
    Get { key: String },
    Set { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Switch {
    On,
    Off,
}

pub(crate) async fn execute(cli: Cli, state: AppState) -> anyhow::Result<()> {
    let ctx = Context { state, format: cli.format, student_id: cli.student_id };

    match cli.command {
        Command::QuizAnswers { question_ids, sort, desc } => {
            let order = sort.map(|column| (column, !desc));
            answers::quiz(&ctx, &question_ids, order).await
        }
        Command::ExerciseAnswers { question_ids, select } => {
            answers::exercise(&ctx, &question_ids, select).await
        }
        Command::SubmitQuiz { question_id, options, quiz_id } => {
            submit::quiz(&ctx, &question_id, &options, quiz_id.as_deref()).await
        }
        Command::SubmitExercise { question_id, lecture_id, answer } => {
            submit::exercise(&ctx, &question_id, &lecture_id, &answer).await
        }
        Command::DashboardAnswer { quiz_id, question_id, answer, follow } => {
            submit::dashboard(&ctx, &quiz_id, &question_id, &answer, follow).await
        }
        Command::Monitor { quiz_id } => monitor::run(&ctx, &quiz_id).await,
        Command::DayNav { path } => page::day_nav(&ctx, &path),
        Command::Prefs(PrefsCommand::Get { key }) => page::prefs_get(&ctx, &key),
        Command::Prefs(PrefsCommand::Set { key, value }) => page::prefs_set(&ctx, &key, &value),
        Command::DarkMode { state } => page::dark_mode(&ctx, state),
        Command::ToggleAnswer { answer_id, text, sample, clicks } => {
            lecture::toggle_answer(&ctx, &answer_id, &text, sample, clicks)
        }
        Command::Tabs { path, tab_ids, activate } => {
            lecture::tabs(&ctx, &path, &tab_ids, activate.as_deref())
        }
        Command::Checklist { item_ids, check, uncheck } => {
            lecture::checklist(&ctx, &item_ids, &check, &uncheck)
        }
        Command::Search { term, files } => lecture::search(&ctx, &term, &files),
        Command::Nav { path, hrefs } => lecture::nav(&ctx, &path, &hrefs),
    }
}

/// What every command handler needs.
pub(crate) struct Context {
    state: AppState,
    format: OutputFormat,
    student_id: Option<String>,
}

impl Context {
    /// Fresh page at `location` with the configured page context applied.
    fn page(&self, location: &str) -> crate::dom::Document {
        let mut doc = self.state.new_page(location);
        if let Some(student_id) = &self.student_id {
            crate::pages::student_id_input(&mut doc, Some(student_id));
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_repeated_quiz_options() {
        let cli = Cli::try_parse_from([
            "giiku", "submit-quiz", "5", "--option", "a", "--option", "c", "--format", "html",
        ])
        .expect("parse");

        assert_eq!(cli.format, OutputFormat::Html);
        match cli.command {
            Command::SubmitQuiz { question_id, options, quiz_id } => {
                assert_eq!(question_id, "5");
                assert_eq!(options, vec!["a", "c"]);
                assert_eq!(quiz_id, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quiz_answers_requires_a_question() {
        assert!(Cli::try_parse_from(["giiku", "quiz-answers"]).is_err());
    }

    #[test]
    fn prefs_and_dark_mode_subcommands() {
        let cli = Cli::try_parse_from(["giiku", "prefs", "set", "darkMode", "true"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::Prefs(PrefsCommand::Set { ref key, ref value }) if key == "darkMode" && value == "true"
        ));

        let cli = Cli::try_parse_from(["giiku", "--student-id", "7", "dark-mode", "on"]).expect("parse");
        assert_eq!(cli.student_id.as_deref(), Some("7"));
        assert!(matches!(cli.command, Command::DarkMode { state: Some(Switch::On) }));
    }

    #[test]
    fn quiz_answers_sort_options() {
        let cli = Cli::try_parse_from(["giiku", "quiz-answers", "5", "6", "--sort", "1", "--desc"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::QuizAnswers { ref question_ids, sort: Some(1), desc: true } if question_ids.len() == 2
        ));

        assert!(Cli::try_parse_from(["giiku", "quiz-answers", "5", "--desc"]).is_err());
    }

    #[test]
    fn widget_subcommands_parse() {
        let cli = Cli::try_parse_from([
            "giiku", "--ephemeral", "checklist", "c1", "c2", "--check", "c1", "--uncheck", "c2",
        ])
        .expect("parse");
        assert!(cli.ephemeral);
        match cli.command {
            Command::Checklist { item_ids, check, uncheck } => {
                assert_eq!(item_ids, vec!["c1", "c2"]);
                assert_eq!(check, vec!["c1"]);
                assert_eq!(uncheck, vec!["c2"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["giiku", "toggle-answer", "a1", "--text", "x", "--sample"])
            .expect("parse");
        assert!(matches!(cli.command, Command::ToggleAnswer { clicks: 1, sample: true, .. }));

        let cli = Cli::try_parse_from(["giiku", "tabs", "/day3.html", "a", "b", "--activate", "b"])
            .expect("parse");
        assert!(matches!(cli.command, Command::Tabs { activate: Some(ref tab), .. } if tab == "b"));

        assert!(Cli::try_parse_from(["giiku", "nav", "/day3.html"]).is_err());
        let cli = Cli::try_parse_from(["giiku", "search", "java", "--file", "a.md", "--file", "b.md"])
            .expect("parse");
        assert!(matches!(cli.command, Command::Search { ref files, .. } if files.len() == 2));
    }
}
