//! Scripted in-memory provider for exercising sessions without a backend.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use futures_util::Stream;

use localchat_types::llm::{CompletionRequest, LlmError, StopReason, StreamEvent, Usage};

use crate::llm::provider::LlmProvider;

type Script = Vec<Result<StreamEvent, LlmError>>;

/// Replays one pre-recorded event script per `stream` call, in order.
///
/// Every request is recorded so tests can inspect what history was sent.
/// Once the scripts run out, further calls yield an empty reply.
pub struct ScriptedProvider {
    model: String,
    scripts: Mutex<VecDeque<Script>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            scripts: Mutex::new(VecDeque::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful reply streamed as the given fragments.
    pub fn with_reply(self, fragments: &[&str]) -> Self {
        let mut script: Script = vec![Ok(StreamEvent::Connected)];
        for fragment in fragments {
            script.push(Ok(StreamEvent::TextDelta {
                text: fragment.to_string(),
            }));
        }
        script.push(Ok(StreamEvent::Usage(Usage {
            input_tokens: 12,
            output_tokens: fragments.len() as u32,
        })));
        script.push(Ok(StreamEvent::MessageDelta {
            stop_reason: StopReason::EndTurn,
        }));
        script.push(Ok(StreamEvent::Done));
        self.with_script(script)
    }

    /// Queue a reply that streams some fragments and then fails.
    pub fn with_failure_after(self, fragments: &[&str], error: LlmError) -> Self {
        let mut script: Script = vec![Ok(StreamEvent::Connected)];
        for fragment in fragments {
            script.push(Ok(StreamEvent::TextDelta {
                text: fragment.to_string(),
            }));
        }
        script.push(Err(error));
        self.with_script(script)
    }

    pub fn with_script(self, script: Script) -> Self {
        self.scripts.lock().unwrap().push_back(script);
        self
    }

    /// Shared handle to the recorded requests; survives boxing the provider.
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn version(&self) -> Result<String, LlmError> {
        Ok("0.0.0-test".to_string())
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.requests.lock().unwrap().push(request);
        let script = self.scripts.lock().unwrap().pop_front().unwrap_or_else(|| {
            vec![Ok(StreamEvent::Connected), Ok(StreamEvent::Done)]
        });
        Box::pin(futures_util::stream::iter(script))
    }
}
