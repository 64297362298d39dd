//! Shared application state for all routes. Built once at startup, read-only after.

use crate::config::Config;
use crate::extractors::{MatchedPathParams, ParamExtractor, PathParamSource};
use crate::service::ValidatorRegistry;
use crate::store::RowStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn RowStore>,
    pub params: ParamExtractor,
}

impl AppState {
    /// Production wiring: path parameters come from the matched route.
    pub fn new(config: Config, store: Arc<dyn RowStore>) -> Self {
        Self::with_path_source(config, store, Arc::new(MatchedPathParams))
    }

    pub fn with_path_source(
        config: Config,
        store: Arc<dyn RowStore>,
        path_source: Arc<dyn PathParamSource>,
    ) -> Self {
        let params = ParamExtractor::new(ValidatorRegistry::new(config.max_recs), path_source);
        AppState {
            config: Arc::new(config),
            store,
            params,
        }
    }
}
