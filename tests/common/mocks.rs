//! Mock provider clients shared by the integration tests.

use async_trait::async_trait;
use ontopat::llm::{ProviderClient, ProviderKind};
use ontopat::types::{AppError, GenerationParams, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// One call received by a [`MockProviderClient`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub params: GenerationParams,
    pub schema: Option<Value>,
}

/// Provider client returning a canned reply and recording every call.
#[derive(Clone)]
pub struct MockProviderClient {
    kind: ProviderKind,
    reply: String,
    should_fail: bool,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProviderClient {
    /// A client for `kind` that always answers `reply`.
    pub fn new(kind: ProviderKind, reply: &str) -> Self {
        Self {
            kind,
            reply: reply.to_string(),
            should_fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A client for `kind` whose every call fails upstream.
    pub fn failing(kind: ProviderKind) -> Self {
        Self {
            should_fail: true,
            ..Self::new(kind, "")
        }
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ProviderClient for MockProviderClient {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn send(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
        schema: Option<&Value>,
    ) -> Result<String> {
        self.calls.lock().push(RecordedCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            params: *params,
            schema: schema.cloned(),
        });

        if self.should_fail {
            return Err(AppError::upstream(self.kind, "connection refused"));
        }
        Ok(self.reply.clone())
    }
}
