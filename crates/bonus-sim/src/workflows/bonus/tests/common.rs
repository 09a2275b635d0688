use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::workflows::bonus::repository::{RepositoryError, SessionRepository};
use crate::workflows::bonus::{
    bonus_router, AccessGate, BonusService, BonusTables, CalculationSettings, CorporateAxis,
    InterpolationPolicy,
};

#[derive(Clone)]
pub(super) struct MemoryRepository {
    pub(super) tables: Arc<Mutex<BonusTables>>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self {
            tables: Arc::new(Mutex::new(BonusTables::seeded())),
        }
    }
}

impl MemoryRepository {
    pub(super) fn snapshot(&self) -> BonusTables {
        self.tables.lock().expect("repository mutex poisoned").clone()
    }
}

impl SessionRepository for MemoryRepository {
    fn load(&self) -> Result<BonusTables, RepositoryError> {
        Ok(self.snapshot())
    }

    fn store(&self, tables: BonusTables) -> Result<(), RepositoryError> {
        *self.tables.lock().expect("repository mutex poisoned") = tables;
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn load(&self) -> Result<BonusTables, RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }

    fn store(&self, _tables: BonusTables) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("session store offline".to_string()))
    }
}

/// Loads fine but refuses writes.
pub(super) struct ReadOnlyRepository;

impl SessionRepository for ReadOnlyRepository {
    fn load(&self) -> Result<BonusTables, RepositoryError> {
        Ok(BonusTables::seeded())
    }

    fn store(&self, _tables: BonusTables) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

pub(super) fn achievement_settings() -> CalculationSettings {
    CalculationSettings {
        policy: InterpolationPolicy::Linear,
        corporate_axis: CorporateAxis::Achievement,
    }
}

pub(super) fn build_service() -> (BonusService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = BonusService::new(repository.clone(), CalculationSettings::default());
    (service, repository)
}

pub(super) fn router_with_service(
    service: BonusService<MemoryRepository>,
    gate: AccessGate,
) -> axum::Router {
    bonus_router(Arc::new(service), gate)
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("valid request")
}

pub(super) fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
