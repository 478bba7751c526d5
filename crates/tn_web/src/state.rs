use std::sync::Arc;

use tn_core::NewsStore;
use tn_sources::IngestionPipeline;

pub struct AppState {
    pub store: Arc<dyn NewsStore>,
    pub pipeline: Arc<IngestionPipeline>,
}
