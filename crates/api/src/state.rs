use std::sync::Arc;

use rulecheck_core::catalog::RuleCatalog;
use rulecheck_core::error::RuleError;
use rulecheck_core::shapes;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Rule sets for every accepted input shape, built once at startup.
    pub catalog: Arc<RuleCatalog>,
}

impl AppState {
    /// Build the rule catalog from `config`.
    ///
    /// Fails if any rule set is malformed; callers should treat that as fatal.
    pub fn new(config: ServerConfig) -> Result<Self, RuleError> {
        let catalog = shapes::catalog(&config.shape_config())?;
        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        })
    }
}
