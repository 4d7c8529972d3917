// Shared system prompts, one per expected response shape.
// Each pipeline stage defines its own user prompt in recommender/prompts.rs.

/// System prompt for calls that expect a single JSON object.
pub const JSON_OBJECT_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with a valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for calls that expect a JSON array.
pub const JSON_ARRAY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with a valid JSON array only. \
    Do NOT include any text before or after the array. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
