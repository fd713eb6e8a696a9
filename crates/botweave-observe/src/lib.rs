//! Observability support for Botweave: tracing subscriber setup and
//! OTel GenAI semantic-convention attribute constants.

pub mod genai_attrs;
pub mod tracing_setup;
