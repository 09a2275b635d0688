use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

use super::access::{require_access, AccessGate};
use super::domain::{
    EmployeeId, EmployeeInput, IndividualGoal, KpiId, KpiInput, ScaleRow, Threshold,
};
use super::payroll::CalculationSettings;
use super::repository::SessionRepository;
use super::service::{BonusService, BonusServiceError};
use super::tables::TableError;

type SharedService<R> = Arc<BonusService<R>>;

/// Router exposing the editable tables and calculations, guarded by `gate`.
pub fn bonus_router<R>(service: SharedService<R>, gate: AccessGate) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/bonus/thresholds",
            get(thresholds_handler::<R>).put(replace_thresholds_handler::<R>),
        )
        .route(
            "/api/v1/bonus/role-scales",
            get(role_scales_handler::<R>).put(replace_role_scales_handler::<R>),
        )
        .route(
            "/api/v1/bonus/global-factor",
            get(global_factor_handler::<R>).put(set_global_factor_handler::<R>),
        )
        .route(
            "/api/v1/bonus/kpis",
            get(list_kpis_handler::<R>).post(create_kpi_handler::<R>),
        )
        .route(
            "/api/v1/bonus/kpis/:kpi_id",
            put(update_kpi_handler::<R>).delete(delete_kpi_handler::<R>),
        )
        .route(
            "/api/v1/bonus/employees",
            get(list_employees_handler::<R>).post(create_employee_handler::<R>),
        )
        .route(
            "/api/v1/bonus/employees/:employee_id",
            put(update_employee_handler::<R>).delete(delete_employee_handler::<R>),
        )
        .route(
            "/api/v1/bonus/employees/:employee_id/goals",
            get(goals_handler::<R>).put(replace_goals_handler::<R>),
        )
        .route("/api/v1/bonus/scorecard", get(scorecard_handler::<R>))
        .route("/api/v1/bonus/payroll", post(payroll_handler::<R>))
        .route_layer(middleware::from_fn_with_state(Arc::new(gate), require_access))
        .with_state(service)
}

fn error_response(error: BonusServiceError) -> Response {
    let status = match &error {
        BonusServiceError::Table(TableError::KpiNotFound(_) | TableError::EmployeeNotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        BonusServiceError::Table(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BonusServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, BonusServiceError>,
) -> Response {
    match result {
        Ok(value) => (status, Json(value)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn thresholds_handler<R>(State(service): State<SharedService<R>>) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.thresholds())
}

pub(crate) async fn replace_thresholds_handler<R>(
    State(service): State<SharedService<R>>,
    Json(rows): Json<Vec<Threshold>>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.replace_thresholds(rows) {
        Ok(thresholds) => {
            let payload = json!({
                "issues": thresholds.issues(),
                "thresholds": thresholds,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn role_scales_handler<R>(State(service): State<SharedService<R>>) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.role_scales())
}

pub(crate) async fn replace_role_scales_handler<R>(
    State(service): State<SharedService<R>>,
    Json(rows): Json<Vec<ScaleRow>>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.replace_role_scales(rows))
}

pub(crate) async fn global_factor_handler<R>(State(service): State<SharedService<R>>) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.global_factor())
}

/// Body is either four values or `null` to clear the factor.
pub(crate) async fn set_global_factor_handler<R>(
    State(service): State<SharedService<R>>,
    Json(values): Json<Option<[f64; 4]>>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.set_global_factor(values))
}

pub(crate) async fn list_kpis_handler<R>(State(service): State<SharedService<R>>) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.kpis())
}

pub(crate) async fn create_kpi_handler<R>(
    State(service): State<SharedService<R>>,
    Json(input): Json<KpiInput>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::CREATED, service.create_kpi(input))
}

pub(crate) async fn update_kpi_handler<R>(
    State(service): State<SharedService<R>>,
    Path(kpi_id): Path<u64>,
    Json(input): Json<KpiInput>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.update_kpi(KpiId(kpi_id), input))
}

pub(crate) async fn delete_kpi_handler<R>(
    State(service): State<SharedService<R>>,
    Path(kpi_id): Path<u64>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.delete_kpi(KpiId(kpi_id)))
}

pub(crate) async fn list_employees_handler<R>(State(service): State<SharedService<R>>) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.employees())
}

pub(crate) async fn create_employee_handler<R>(
    State(service): State<SharedService<R>>,
    Json(input): Json<EmployeeInput>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::CREATED, service.create_employee(input))
}

pub(crate) async fn update_employee_handler<R>(
    State(service): State<SharedService<R>>,
    Path(employee_id): Path<u64>,
    Json(input): Json<EmployeeInput>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.update_employee(EmployeeId(employee_id), input),
    )
}

pub(crate) async fn delete_employee_handler<R>(
    State(service): State<SharedService<R>>,
    Path(employee_id): Path<u64>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.delete_employee(EmployeeId(employee_id)))
}

pub(crate) async fn goals_handler<R>(
    State(service): State<SharedService<R>>,
    Path(employee_id): Path<u64>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.individual_scorecard(EmployeeId(employee_id)),
    )
}

pub(crate) async fn replace_goals_handler<R>(
    State(service): State<SharedService<R>>,
    Path(employee_id): Path<u64>,
    Json(goals): Json<Vec<IndividualGoal>>,
) -> Response
where
    R: SessionRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.replace_goals(EmployeeId(employee_id), goals),
    )
}

pub(crate) async fn scorecard_handler<R>(State(service): State<SharedService<R>>) -> Response
where
    R: SessionRepository + 'static,
{
    respond(StatusCode::OK, service.scorecard())
}

/// An empty body runs with the service settings; a JSON body overrides them.
pub(crate) async fn payroll_handler<R>(
    State(service): State<SharedService<R>>,
    body: Bytes,
) -> Response
where
    R: SessionRepository + 'static,
{
    let settings = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice::<CalculationSettings>(&body) {
            Ok(settings) => Some(settings),
            Err(error) => {
                let payload = json!({
                    "error": format!("invalid payroll settings: {error}"),
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
            }
        }
    };

    respond(StatusCode::OK, service.payroll(settings))
}
