//! Application state for the Overtime Engine API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::reconcile::OvertimeReconciler;
use crate::store::{Backend, InMemoryStore};

/// Shared application state.
///
/// Holds the loaded configuration and the reconciler every handler goes
/// through.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    reconciler: Arc<OvertimeReconciler>,
}

impl AppState {
    /// Creates state backed by an in-memory store seeded from `config`.
    pub fn new(config: ConfigLoader) -> Self {
        let store = InMemoryStore::from_config(&config);
        Self::with_backend(config, Arc::new(store))
    }

    /// Creates state over an existing backend.
    pub fn with_backend(config: ConfigLoader, backend: Arc<dyn Backend>) -> Self {
        let reconciler = OvertimeReconciler::new(backend, config.policy().clone());
        Self {
            config: Arc::new(config),
            reconciler: Arc::new(reconciler),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the reconciler.
    pub fn reconciler(&self) -> &OvertimeReconciler {
        &self.reconciler
    }
}
