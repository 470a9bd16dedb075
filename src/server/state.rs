use std::sync::Arc;

use crate::ai::CompletionClient;
use crate::analysis::AnalysisService;
use crate::config::Settings;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
}

impl AppState {
    pub fn new(client: Arc<dyn CompletionClient>, settings: &Settings) -> Self {
        Self {
            service: Arc::new(AnalysisService::from_settings(client, settings)),
        }
    }
}
