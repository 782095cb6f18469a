//! # choicebench
//!
//! Multiple-choice benchmark evaluation for chat-completion models.
//!
//! Loads a question set where every question carries four labeled options
//! (A–D) and a known solution, asks a model each question, parses the
//! free-text reply into a single letter, and reports accuracy plus every
//! missed question.
//!
//! ## Architecture
//!
//! ```text
//! dataset (questions)          client (chat completions)
//!        \                          /
//!         runner ── agent ── extract
//! ```
//!
//! - [`extract_answer`] turns raw model text into a [`Choice`] or nothing.
//! - [`QueryAgent`] wraps one question in a bounded retry loop: exponential
//!   backoff on service errors, immediate retry on unparseable replies.
//! - [`EvaluationRunner`] walks the dataset sequentially, tallying correct
//!   answers and collecting mismatches into a [`RunSummary`].
//!
//! ## Quick start
//!
//! ```no_run
//! use choicebench::{
//!     EvaluationRunner, JsonDataset, LlmConfig, OpenAiClient, QueryAgent,
//! };
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = JsonDataset::new(PathBuf::from("questions.json"));
//! let questions = dataset.load(Some(100)).await?;
//!
//! let client = Arc::new(OpenAiClient::new("api-key", LlmConfig::default()));
//! let runner = EvaluationRunner::new(QueryAgent::new(client));
//!
//! let summary = runner.run(&questions).await;
//! summary.print_report();
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing without a network
//!
//! [`mock_llm::MockLlmClient`] replays a scripted sequence of completion
//! outcomes through the same [`LlmProvider`] seam the real client uses, so
//! retry and tally behavior is exercised deterministically.

pub mod agent;
pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod mock_llm;
pub mod runner;

// Re-export public API
pub use agent::QueryAgent;
pub use client::{ChatRequest, ChatResponse, LlmProvider, OpenAiClient};
pub use config::LlmConfig;
pub use dataset::{Choice, JsonDataset, Question};
pub use error::{DatasetError, EvalError, LlmError};
pub use extract::extract_answer;
pub use runner::{EvaluationOutcome, EvaluationRunner, RunProgress, RunSummary};
