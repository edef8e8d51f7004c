use std::sync::Arc;

use crate::config::Config;
use crate::engine::assignment::AssignmentEngine;
use crate::engine::distance::RandomDistance;
use crate::engine::ranking::RankingReporter;
use crate::error::AppError;
use crate::observability::metrics::Metrics;
use crate::store::MemoryStore;

pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub engine: AssignmentEngine,
    pub reporter: RankingReporter,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Fails when the configuration is invalid, before anything is wired.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        config.validate()?;

        let store = Arc::new(MemoryStore::new());
        let metrics = Arc::new(Metrics::new());
        let distance = Arc::new(RandomDistance::new(
            config.min_distance_km,
            config.max_distance_km,
        )?);

        Ok(Self {
            engine: AssignmentEngine::new(
                store.clone(),
                distance,
                metrics.clone(),
                config.conflict_retries,
            ),
            reporter: RankingReporter::new(store.clone()),
            store,
            metrics,
        })
    }
}
