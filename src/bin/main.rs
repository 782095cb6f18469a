//! Benchmark evaluation CLI.
//!
//! Runs a chat-completion model over a multiple-choice question file and
//! reports accuracy plus every missed question.

use choicebench::{
    EvalError, EvaluationRunner, JsonDataset, LlmConfig, OpenAiClient, QueryAgent, RunProgress,
    RunSummary,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Evaluate a chat-completion model on a multiple-choice benchmark.
#[derive(Parser, Debug)]
#[command(name = "choicebench")]
#[command(about = "Evaluate a chat-completion model on a multiple-choice benchmark")]
#[command(version)]
struct Args {
    /// Path to the question file (JSON with a top-level "questions" array)
    #[arg(long, short = 'd')]
    dataset: PathBuf,

    /// Number of questions to evaluate (default: all)
    #[arg(long, short = 's')]
    sample: Option<usize>,

    /// Model identifier sent with every request
    #[arg(long, default_value = "gpt-3.5-turbo-0125")]
    model: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long, default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// API key (can also use the OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Attempt budget per question
    #[arg(long, default_value = "5")]
    retries: usize,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    llm_timeout: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Validate CLI arguments.
    fn validate(&self) -> Result<(), String> {
        if self.retries == 0 {
            return Err("retries must be greater than 0".to_string());
        }

        if !self.dataset.exists() {
            return Err(format!("Dataset file not found: {}", self.dataset.display()));
        }

        Ok(())
    }

    /// Build LlmConfig from CLI arguments.
    fn llm_config(&self) -> LlmConfig {
        LlmConfig::default()
            .with_model(&self.model)
            .with_base_url(&self.base_url)
            .with_timeout(Duration::from_secs(self.llm_timeout))
    }
}

/// Run the evaluation with a progress bar.
async fn run_evaluation(args: &Args) -> Result<RunSummary, EvalError> {
    let dataset = JsonDataset::new(args.dataset.clone());
    let questions = dataset.load(args.sample).await?;

    let client = Arc::new(OpenAiClient::new(args.api_key.clone(), args.llm_config()));
    let agent = QueryAgent::new(client).with_max_retries(args.retries);
    let runner = EvaluationRunner::new(agent);

    let progress_bar = ProgressBar::new(questions.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .expect("progress template is valid")
            .progress_chars("#>-"),
    );

    let summary = runner
        .run_with_progress(&questions, |progress| match progress {
            RunProgress::Started { total } => {
                progress_bar.set_length(total as u64);
                progress_bar.set_message("Evaluating...");
            }
            RunProgress::QuestionCompleted {
                completed,
                running_accuracy,
                ..
            } => {
                progress_bar.set_position(completed as u64);
                progress_bar.set_message(format!("Accuracy: {:.2}%", running_accuracy));
            }
            _ => {} // Handle future variants gracefully
        })
        .await;

    progress_bar.finish_with_message("Complete");
    Ok(summary)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    // Print configuration
    eprintln!("=== choicebench ===");
    eprintln!("Dataset: {}", args.dataset.display());
    eprintln!("Model: {}", args.model);
    eprintln!(
        "Sample size: {}",
        args.sample
            .map(|s| s.to_string())
            .unwrap_or_else(|| "all".to_string())
    );
    eprintln!("Retries per question: {}", args.retries);
    eprintln!();

    // Run evaluation
    match run_evaluation(&args).await {
        Ok(summary) => {
            summary.print_report();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
