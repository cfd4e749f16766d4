//! Scripted `ModelGateway` double for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionRequest, GatewayError, ModelGateway};

/// A captured call, so tests can assert on what the stage sent.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub model: String,
}

/// Replays queued replies in order. Panics if called more often than scripted.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn fail(self, error: GatewayError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorded.lock().unwrap().push(RecordedCall {
            system: request.system.to_string(),
            user: request.user.to_string(),
            model: request.settings.model.clone(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedGateway called more times than scripted")
    }
}
