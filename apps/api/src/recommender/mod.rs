// Job recommendation pipeline.
// Interpreter → Synthesizer → Scorer, sequenced by the Orchestrator.
// All LLM calls go through the llm_client::Gateway trait.

pub mod handlers;
pub mod interpreter;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod scoring;
pub mod synthesizer;

use serde_json::Value;

/// Short name of a JSON value's type, for diagnostics.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
