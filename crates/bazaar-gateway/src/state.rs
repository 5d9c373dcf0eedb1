//! Application state

use std::sync::Arc;

use bazaar_core::OfflineWorker;

use crate::routes::TargetRouter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub worker: Arc<OfflineWorker>,
    pub targets: Arc<TargetRouter>,
}

impl AppState {
    pub fn new(worker: Arc<OfflineWorker>, targets: Arc<TargetRouter>) -> Self {
        Self { worker, targets }
    }
}
