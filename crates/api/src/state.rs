use std::sync::Arc;

use ambience_config::Settings;
use ambience_services::{BlobStorage, WorkflowEngine};
use ambience_store::RunStore;

/// Explicitly constructed shared state; no process-wide singletons. Tests
/// build it over an in-memory store and mock SaaS clients.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub runs: RunStore,
    pub storage: Arc<dyn BlobStorage>,
    pub engine: Arc<WorkflowEngine>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        runs: RunStore,
        storage: Arc<dyn BlobStorage>,
        engine: Arc<WorkflowEngine>,
    ) -> Self {
        Self {
            settings,
            runs,
            storage,
            engine,
        }
    }
}
