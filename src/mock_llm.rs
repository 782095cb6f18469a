//! Scripted provider for offline, deterministic tests.
//!
//! [`MockLlmClient`] replays a fixed script of completion outcomes in order,
//! so retry behavior can be exercised without API calls or wall-clock
//! waiting. Once the script is exhausted it keeps returning responses with
//! no choices, which the asking agent treats as a non-match.

use crate::client::{ChatRequest, ChatResponse, LlmProvider};
use crate::error::LlmError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock provider replaying scripted completion outcomes.
pub struct MockLlmClient {
    script: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockLlmClient {
    /// Create a mock from an ordered script of outcomes.
    pub fn from_script(script: Vec<Result<ChatResponse, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that answers each call with the given text, in order.
    pub fn from_texts(texts: &[&str]) -> Self {
        Self::from_script(texts.iter().map(|t| Ok(ChatResponse::from_text(*t))).collect())
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlmClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("requests lock").push(request);

        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or_else(|| Ok(ChatResponse::empty()))
    }
}
