//! OpenTelemetry GenAI semantic-convention names used on generation spans.
//!
//! Span fields are written as dotted identifiers in `tracing` macros
//! (`gen_ai.request.model = ..`); these constants hold the matching names and
//! the operation/provider values so the two never drift.
//!
//! Span naming convention: `"{operation} {model}"` (e.g. `"generate mistral"`).

/// The name of the operation being performed.
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider.
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// The model requested.
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The sampling temperature for the request.
pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

/// The maximum number of output tokens requested.
pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

/// The number of output tokens generated, when the backend reports it.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

// --- Operation name values ---

/// Text generation for an agent or judge turn.
pub const OP_GENERATE: &str = "generate";

/// Embedding of memory text or recall queries.
pub const OP_EMBEDDINGS: &str = "embeddings";

// --- Provider name values ---

pub const PROVIDER_OLLAMA: &str = "ollama";

/// Build a span name following the `"{operation} {model}"` convention.
pub fn span_name(operation: &str, model: &str) -> String {
    format!("{operation} {model}")
}
