use bonus_sim::workflows::bonus::{BonusTables, RepositoryError, SessionRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Single editable session held in process memory, seeded with the defaults.
#[derive(Clone)]
pub(crate) struct InMemorySessionRepository {
    tables: Arc<Mutex<BonusTables>>,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::with_tables(BonusTables::seeded())
    }
}

impl InMemorySessionRepository {
    pub(crate) fn with_tables(tables: BonusTables) -> Self {
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn load(&self) -> Result<BonusTables, RepositoryError> {
        let guard = self
            .tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn store(&self, tables: BonusTables) -> Result<(), RepositoryError> {
        let mut guard = self
            .tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session mutex poisoned".to_string()))?;
        *guard = tables;
        Ok(())
    }
}
