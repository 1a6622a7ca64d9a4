use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quiz_core::model::QuestionId;

#[derive(Debug, Parser)]
#[command(name = "quiz", version, about = "Multiple-choice quiz client")]
pub struct Cli {
    /// Base url of the quiz service (overrides config and QUIZ__API__BASE_URL)
    #[arg(long, global = true, env = "QUIZ_API_URL")]
    pub api_url: Option<String>,

    /// Settings file (defaults to ./quiz.toml when present)
    #[arg(long, global = true, env = "QUIZ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play the quiz in the terminal
    Play(PlayArgs),
    /// Show the top scores
    Ranking {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Sign in and print the account
    Login(Credentials),
    /// Create an account
    Register(Credentials),
    /// Manage the question bank
    #[command(subcommand)]
    Questions(QuestionsCommand),
}

#[derive(Debug, Args)]
pub struct Credentials {
    #[arg(long, env = "QUIZ_EMAIL", default_value = "")]
    pub email: String,
    #[arg(long, env = "QUIZ_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct PlayArgs {
    /// Sign in before playing
    #[arg(long, env = "QUIZ_EMAIL", requires = "password")]
    pub email: Option<String>,
    #[arg(long, env = "QUIZ_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum QuestionsCommand {
    /// List questions, optionally filtered
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a question with four options
    Add(QuestionFields),
    /// Change fields of an existing question
    Edit {
        id: QuestionId,
        #[command(flatten)]
        fields: QuestionFields,
    },
    /// Delete a question
    Delete { id: QuestionId },
}

#[derive(Debug, Args)]
pub struct QuestionFields {
    #[arg(long)]
    pub text: Option<String>,
    /// Repeat four times, in order (A to D)
    #[arg(long = "option")]
    pub options: Vec<String>,
    /// Index of the correct option, 0 to 3
    #[arg(long, allow_negative_numbers = true)]
    pub correct: Option<i64>,
    #[arg(long)]
    pub explanation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_edit_with_options() {
        let cli = Cli::try_parse_from([
            "quiz",
            "--api-url",
            "http://host/api",
            "questions",
            "edit",
            "7",
            "--option",
            "a",
            "--option",
            "b",
            "--correct",
            "1",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://host/api"));
        let Command::Questions(QuestionsCommand::Edit { id, fields }) = cli.command else {
            panic!("expected questions edit");
        };
        assert_eq!(id, QuestionId::new(7));
        assert_eq!(fields.options, vec!["a", "b"]);
        assert_eq!(fields.correct, Some(1));
    }
}
