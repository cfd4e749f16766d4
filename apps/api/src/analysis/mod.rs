// Résumé analysis: extraction stage, matching stage, and the entry points that chain them.
// All model calls go through llm_client::ModelGateway; no direct HTTP calls here.

pub mod extractor;
pub mod handlers;
pub mod matcher;
pub mod pipeline;
pub mod prompts;
pub mod stage;
