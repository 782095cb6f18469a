//! Sequential evaluation over a question set.
//!
//! [`EvaluationRunner`] walks the dataset in order, one outstanding request
//! at a time, tallying correct answers and collecting mismatches. A question
//! the agent cannot answer is recorded as a mismatch, never a crash; only
//! dataset loading can abort a run, and that happens before the runner
//! starts.

use crate::agent::QueryAgent;
use crate::dataset::{Choice, Question};

/// Progress events emitted during a run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum RunProgress {
    /// Evaluation starting.
    Started {
        /// Total number of questions to evaluate.
        total: usize,
    },
    /// A question was evaluated.
    QuestionCompleted {
        /// Number of questions evaluated so far.
        completed: usize,
        /// Total number of questions.
        total: usize,
        /// Whether this question was answered correctly.
        correct: bool,
        /// Accuracy over the questions evaluated so far, in percent.
        running_accuracy: f64,
    },
}

/// Outcome of a single mismatched question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOutcome {
    /// The question that was asked
    pub question: String,

    /// The correct option
    pub expected: Choice,

    /// What the model answered; `None` when no parseable answer was obtained
    pub obtained: Option<Choice>,
}

/// Summary of an evaluation run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of questions evaluated
    pub total: usize,

    /// Number answered correctly
    pub correct: usize,

    /// Every mismatched question, in evaluation order
    pub mismatches: Vec<EvaluationOutcome>,
}

impl RunSummary {
    /// Final accuracy in percent. Zero for an empty run.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }

    /// Print the final accuracy and the itemized mismatch report to stdout.
    pub fn print_report(&self) {
        println!();
        if self.total == 0 {
            println!("No questions evaluated.");
            return;
        }

        println!(
            "Final accuracy: {:.2}% ({} of {} correct)",
            self.accuracy(),
            self.correct,
            self.total
        );

        if !self.mismatches.is_empty() {
            println!();
            println!("Incorrect answers:");
            for outcome in &self.mismatches {
                println!("Question: {}", outcome.question);
                println!(
                    "Expected: {}, Obtained: {}",
                    outcome.expected,
                    outcome
                        .obtained
                        .map_or_else(|| "none".to_string(), |c| c.to_string())
                );
                println!();
            }
        }
    }
}

/// Runs an agent over a question set and accumulates the tally.
pub struct EvaluationRunner {
    agent: QueryAgent,
}

impl EvaluationRunner {
    /// Create a runner over the given agent.
    pub fn new(agent: QueryAgent) -> Self {
        Self { agent }
    }

    /// Evaluate every question, in order.
    pub async fn run(&self, questions: &[Question]) -> RunSummary {
        self.run_with_progress(questions, |_| {}).await
    }

    /// Evaluate every question, invoking `on_progress` after each one.
    ///
    /// Questions are evaluated strictly sequentially, so the running
    /// accuracy reported in each event is well-defined and reproducible.
    pub async fn run_with_progress<F>(&self, questions: &[Question], on_progress: F) -> RunSummary
    where
        F: Fn(RunProgress),
    {
        let total = questions.len();
        on_progress(RunProgress::Started { total });

        let mut correct = 0;
        let mut mismatches = Vec::new();

        for (index, question) in questions.iter().enumerate() {
            let obtained = self.agent.ask(question).await;
            let is_correct = obtained == Some(question.solution);

            if is_correct {
                correct += 1;
            } else {
                mismatches.push(EvaluationOutcome {
                    question: question.question.clone(),
                    expected: question.solution,
                    obtained,
                });
            }

            let completed = index + 1;
            on_progress(RunProgress::QuestionCompleted {
                completed,
                total,
                correct: is_correct,
                running_accuracy: correct as f64 / completed as f64 * 100.0,
            });
        }

        log::info!(
            "Evaluated {} questions, {} correct, {} mismatched",
            total,
            correct,
            mismatches.len()
        );

        RunSummary {
            total,
            correct,
            mismatches,
        }
    }
}
