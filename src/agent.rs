//! The asking agent: one question in, one letter (or nothing) out.
//!
//! [`QueryAgent`] turns an unreliable free-form completion service into a
//! structured verdict. Each question gets a bounded attempt budget; service
//! failures back off exponentially, while well-formed replies that merely
//! lack a parseable answer are retried immediately. Exhausting the budget is
//! a normal outcome (`None`), not an error.

use crate::client::{ChatRequest, LlmProvider};
use crate::dataset::{Choice, Question};
use crate::extract::extract_answer;
use std::sync::Arc;
use std::time::Duration;

/// System instruction sent with every question.
const SYSTEM_PROMPT: &str = "You are a security expert who answers questions.";

/// Instruction appended to every prompt so replies stay machine-parseable.
const ANSWER_INSTRUCTION: &str =
    "Choose the correct answer (A, B, C, or D) only. Always return in this format: 'ANSWER: X'";

/// Maximum backoff between attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Asks one multiple-choice question per call, retrying until it gets a
/// parseable answer or exhausts its attempt budget.
pub struct QueryAgent {
    provider: Arc<dyn LlmProvider>,
    max_retries: usize,
    retry_base_delay: Duration,
}

impl QueryAgent {
    /// Create an agent over a shared provider.
    ///
    /// Defaults: 5 attempts per question, 1 second backoff base.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            max_retries: 5,
            retry_base_delay: Duration::from_secs(1),
        }
    }

    /// Set the attempt budget per question.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay for exponential backoff.
    #[must_use]
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Ask the model one question.
    ///
    /// Returns the extracted option letter, or `None` once the attempt
    /// budget is spent without a parseable answer. Service errors are
    /// absorbed here with exponential backoff (1, 2, 4, ... seconds);
    /// replies that arrive but do not contain `ANSWER: X` consume an attempt
    /// and retry immediately with no delay. Neither case ever propagates an
    /// error to the caller.
    pub async fn ask(&self, question: &Question) -> Option<Choice> {
        let prompt = build_prompt(question);

        for attempt in 0..self.max_retries {
            let request = ChatRequest::with_system(prompt.clone(), SYSTEM_PROMPT);

            match self.provider.complete(request).await {
                Ok(response) => match response.text() {
                    Some(text) => {
                        if let Some(letter) = extract_answer(text) {
                            return Some(letter);
                        }
                        log::info!(
                            "Incorrect answer format detected (attempt {}/{}), asking again",
                            attempt + 1,
                            self.max_retries
                        );
                    }
                    None => {
                        log::info!(
                            "Service returned no completion (attempt {}/{}), asking again",
                            attempt + 1,
                            self.max_retries
                        );
                    }
                },
                Err(e) => {
                    let delay = self.retry_delay(attempt as u32);
                    log::warn!(
                        "LLM request failed (attempt {}/{}): {}, retrying in {:?}",
                        attempt + 1,
                        self.max_retries,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        None
    }

    /// Backoff for a given attempt number (0-indexed): base * 2^attempt,
    /// capped so large budgets cannot overflow into unreasonable waits.
    fn retry_delay(&self, attempt: u32) -> Duration {
        let delay_ms = (self.retry_base_delay.as_millis() as u64)
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(MAX_RETRY_DELAY.as_millis() as u64);

        Duration::from_millis(delay_ms)
    }
}

/// Render the question and its options into a single prompt.
///
/// Options are rendered `"<label>) <text>"` in A→D order, joined by `", "`.
fn build_prompt(question: &Question) -> String {
    let options = question
        .answers
        .iter()
        .map(|(label, text)| format!("{}) {}", label, text))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Question: {}\nOptions: {}\n\n{}",
        question.question, options, ANSWER_INSTRUCTION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatResponse;
    use crate::error::LlmError;
    use crate::mock_llm::MockLlmClient;
    use std::collections::BTreeMap;

    fn sample_question() -> Question {
        let mut answers = BTreeMap::new();
        answers.insert(Choice::A, "FTP".to_string());
        answers.insert(Choice::B, "TLS".to_string());
        answers.insert(Choice::C, "SNMP".to_string());
        answers.insert(Choice::D, "DHCP".to_string());

        Question {
            question: "Which protocol secures HTTP traffic?".to_string(),
            answers,
            solution: Choice::B,
        }
    }

    fn service_error() -> LlmError {
        LlmError::Api {
            status: 503,
            message: "upstream overloaded".to_string(),
        }
    }

    #[test]
    fn prompt_renders_options_in_order() {
        let prompt = build_prompt(&sample_question());

        assert!(prompt.starts_with("Question: Which protocol secures HTTP traffic?"));
        assert!(prompt.contains("Options: A) FTP, B) TLS, C) SNMP, D) DHCP"));
        assert!(prompt.contains("'ANSWER: X'"));
    }

    #[test]
    fn retry_delay_doubles_per_attempt() {
        let agent = QueryAgent::new(Arc::new(MockLlmClient::from_script(vec![])));

        let delays: Vec<u64> = (0..5).map(|a| agent.retry_delay(a).as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 8, 16]);
    }

    #[test]
    fn retry_delay_is_capped() {
        let agent = QueryAgent::new(Arc::new(MockLlmClient::from_script(vec![])));

        assert_eq!(agent.retry_delay(10), Duration::from_secs(60));
        assert_eq!(agent.retry_delay(u32::MAX), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn returns_letter_on_first_parseable_reply() {
        let mock = Arc::new(MockLlmClient::from_texts(&["ANSWER: B"]));
        let agent = QueryAgent::new(mock.clone());

        let answer = agent.ask(&sample_question()).await;

        assert_eq!(answer, Some(Choice::B));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn sends_system_instruction_with_every_attempt() {
        let mock = Arc::new(MockLlmClient::from_texts(&["ANSWER: A"]));
        let agent = QueryAgent::new(mock.clone());

        agent.ask(&sample_question()).await;

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system.as_deref(), Some(SYSTEM_PROMPT));
    }

    #[tokio::test(start_paused = true)]
    async fn unparseable_replies_retry_immediately() {
        let mock = Arc::new(MockLlmClient::from_texts(&[
            "I am not sure about this one.",
            "It could be several of these.",
            "ANSWER: C",
        ]));
        let agent = QueryAgent::new(mock.clone());

        let start = tokio::time::Instant::now();
        let answer = agent.ask(&sample_question()).await;

        assert_eq!(answer, Some(Choice::C));
        assert_eq!(mock.call_count(), 3);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_completions_consume_attempts_without_delay() {
        let mock = Arc::new(MockLlmClient::from_script(vec![
            Ok(ChatResponse::empty()),
            Ok(ChatResponse::from_text("ANSWER: D")),
        ]));
        let agent = QueryAgent::new(mock.clone());

        let start = tokio::time::Instant::now();
        let answer = agent.ask(&sample_question()).await;

        assert_eq!(answer, Some(Choice::D));
        assert_eq!(mock.call_count(), 2);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn service_errors_back_off_exponentially() {
        let mock = Arc::new(MockLlmClient::from_script(vec![
            Err(service_error()),
            Err(service_error()),
            Err(service_error()),
            Err(service_error()),
            Err(service_error()),
        ]));
        let agent = QueryAgent::new(mock.clone());

        let start = tokio::time::Instant::now();
        let answer = agent.ask(&sample_question()).await;

        assert_eq!(answer, None);
        assert_eq!(mock.call_count(), 5);
        // 1 + 2 + 4 + 8 + 16 seconds of backoff across the five attempts
        assert_eq!(start.elapsed(), Duration::from_secs(31));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_error() {
        let mock = Arc::new(MockLlmClient::from_script(vec![
            Err(LlmError::RateLimit("try later".into())),
            Ok(ChatResponse::from_text("ANSWER: A")),
        ]));
        let agent = QueryAgent::new(mock.clone());

        let start = tokio::time::Instant::now();
        let answer = agent.ask(&sample_question()).await;

        assert_eq!(answer, Some(Choice::A));
        assert_eq!(mock.call_count(), 2);
        assert_eq!(start.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn exhausts_budget_on_unparseable_replies() {
        // Script runs dry after two replies; the mock then returns empty
        // completions, which also consume attempts.
        let mock = Arc::new(MockLlmClient::from_texts(&["no idea", "still no idea"]));
        let agent = QueryAgent::new(mock.clone());

        let answer = agent.ask(&sample_question()).await;

        assert_eq!(answer, None);
        assert_eq!(mock.call_count(), 5);
    }

    #[tokio::test]
    async fn respects_custom_attempt_budget() {
        let mock = Arc::new(MockLlmClient::from_script(vec![]));
        let agent = QueryAgent::new(mock.clone()).with_max_retries(2);

        let answer = agent.ask(&sample_question()).await;

        assert_eq!(answer, None);
        assert_eq!(mock.call_count(), 2);
    }
}
