//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::SessionRepository;
use crate::services::{AnalysisGate, NarrativeModel};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Session hand-off storage
    pub repository: Arc<dyn SessionRepository>,
    /// Language model; `None` when no credential is configured
    pub model: Option<Arc<dyn NarrativeModel>>,
    /// One in-flight analysis per session
    pub gate: AnalysisGate,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn SessionRepository>, config: AppConfig) -> Self {
        Self {
            repository,
            model: None,
            gate: AnalysisGate::new(),
            config: Arc::new(config),
        }
    }

    pub fn with_model(mut self, model: Arc<dyn NarrativeModel>) -> Self {
        self.model = Some(model);
        self
    }
}
