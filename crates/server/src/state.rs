use std::sync::Arc;
use relocator_core::{Config, Relocator, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    relocator: Arc<Relocator>,
}

impl AppState {
    pub fn new(config: Config, relocator: Arc<Relocator>) -> Self {
        Self { config, relocator }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn relocator(&self) -> &Relocator {
        self.relocator.as_ref()
    }
}
