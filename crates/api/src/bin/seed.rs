use std::path::PathBuf;
use std::time::Duration;

use api::{Api, DEFAULT_BASE_URL, QuestionRepository, RestConfig};
use clap::Parser;
use quiz_core::model::QuestionDraft;
use serde::Deserialize;

/// Upload sample questions to the quiz service.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// Base url of the quiz service.
    #[arg(long, env = "QUIZ_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// JSON file with an array of questions; built-in samples when omitted.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Validate and print, but do not upload.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Deserialize)]
struct SeedQuestion {
    text: String,
    options: [String; 4],
    correct_index: usize,
    #[serde(default)]
    explanation: String,
}

impl From<SeedQuestion> for QuestionDraft {
    fn from(q: SeedQuestion) -> Self {
        Self {
            text: q.text,
            options: q.options,
            correct_index: q.correct_index,
            explanation: q.explanation,
        }
    }
}

fn sample_questions() -> Vec<QuestionDraft> {
    let sample = |text: &str, options: [&str; 4], correct_index: usize, explanation: &str| {
        QuestionDraft {
            text: text.to_string(),
            options: options.map(str::to_string),
            correct_index,
            explanation: explanation.to_string(),
        }
    };
    vec![
        sample(
            "Which keyword introduces an immutable binding in Rust?",
            ["var", "let", "const mut", "bind"],
            1,
            "`let` creates a binding that is immutable unless marked `mut`.",
        ),
        sample(
            "What does HTTP status 404 mean?",
            ["Unauthorized", "Server error", "Not found", "Created"],
            2,
            "404 is returned when the requested resource does not exist.",
        ),
        sample(
            "Which planet is closest to the sun?",
            ["Mercury", "Venus", "Earth", "Mars"],
            0,
            "Mercury orbits at roughly 58 million km from the sun.",
        ),
        sample(
            "How many bits are in a byte?",
            ["4", "16", "10", "8"],
            3,
            "A byte is eight bits on every mainstream architecture.",
        ),
    ]
}

fn load_drafts(args: &Args) -> Result<Vec<QuestionDraft>, Box<dyn std::error::Error>> {
    let Some(path) = &args.file else {
        return Ok(sample_questions());
    };
    let raw = std::fs::read_to_string(path)?;
    let items: Vec<SeedQuestion> = serde_json::from_str(&raw)?;
    Ok(items.into_iter().map(QuestionDraft::from).collect())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let drafts = load_drafts(&args)?;

    let mut validated = Vec::with_capacity(drafts.len());
    for (i, draft) in drafts.into_iter().enumerate() {
        let question = draft
            .validate()
            .map_err(|e| format!("question #{}: {e}", i + 1))?;
        validated.push(question);
    }

    if args.dry_run {
        for question in &validated {
            println!("ok: {}", question.text());
        }
        println!("{} question(s) valid, nothing uploaded", validated.len());
        return Ok(());
    }

    let api = Api::rest(&RestConfig {
        base_url: args.api_url.clone(),
        timeout: Duration::from_secs(10),
    })?;
    for question in &validated {
        let created = api.question_store.create(question).await?;
        println!("created #{}: {}", created.id(), created.text());
    }
    println!("seeded {} question(s) into {}", validated.len(), args.api_url);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
