use crate::analysis::pipeline::Analyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Extraction + matching entry points. Wraps the shared model gateway.
    pub analyzer: Analyzer,
    pub config: Config,
}
