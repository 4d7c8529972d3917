//! Scripted gateway for tests.
//!
//! Replies are queued per response shape, so a test can script the interpreter
//! call (object) and the synthesizer call (array) independently.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{parse_json_text, Gateway, LlmError, ResponseShape};

#[derive(Default)]
pub struct ScriptedGateway {
    objects: Mutex<VecDeque<Result<Value, LlmError>>>,
    arrays: Mutex<VecDeque<Result<Value, LlmError>>>,
    prompts: Mutex<Vec<(ResponseShape, String)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, reply: Result<Value, LlmError>) -> Self {
        self.objects.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_array(self, reply: Result<Value, LlmError>) -> Self {
        self.arrays.lock().unwrap().push_back(reply);
        self
    }

    /// Queues a raw model reply for the array call, parsed the way `LlmClient` parses it.
    pub fn with_array_text(self, reply: &str) -> Self {
        self.with_array(parse_json_text(reply))
    }

    /// Every prompt seen so far, in call order.
    pub fn prompts(&self) -> Vec<(ResponseShape, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn generate(&self, prompt: &str, shape: ResponseShape) -> Result<Value, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((shape, prompt.to_string()));

        let queue = match shape {
            ResponseShape::Object => &self.objects,
            ResponseShape::Array => &self.arrays,
        };
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}
