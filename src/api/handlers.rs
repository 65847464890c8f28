//! HTTP request handlers for the Overtime Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::paginate;
use crate::error::EngineError;
use crate::models::{DayConfig, OvertimeSubmission};
use crate::reconcile::{CancelOutcome, UpsertOutcome};

use super::actor::CurrentActor;
use super::request::{DayConfigRequest, ListOvertimeQuery, PreviewRequest, SubmitOvertimeRequest};
use super::response::{ApiError, ApiErrorResponse, CancelResponse, HealthResponse};
use super::state::AppState;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/overtime", get(list_handler).put(submit_handler))
        .route("/overtime/preview", post(preview_handler))
        .route("/overtime/:user_id/:date", delete(cancel_handler))
        .route(
            "/overtime/summary/:user_id/:year/:month",
            get(summary_handler),
        )
        .route("/calendar/:year/:month", get(calendar_handler))
        .route("/day-configs/:date", put(day_config_handler))
        .with_state(state)
}

fn json_rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error)
}

fn path_rejection_error(correlation_id: Uuid, rejection: PathRejection) -> ApiErrorResponse {
    let message = rejection.body_text();
    warn!(correlation_id = %correlation_id, error = %message, "Invalid path parameter");
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, ApiError::validation_error(message))
}

fn query_rejection_error(correlation_id: Uuid, rejection: QueryRejection) -> ApiErrorResponse {
    let message = rejection.body_text();
    warn!(correlation_id = %correlation_id, error = %message, "Invalid query string");
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, ApiError::validation_error(message))
}

fn engine_failure(correlation_id: Uuid, err: EngineError, context: &str) -> ApiErrorResponse {
    if err.is_validation() {
        info!(correlation_id = %correlation_id, error = %err, "{}", context);
    } else {
        warn!(correlation_id = %correlation_id, error = %err, "{}", context);
    }
    err.into()
}

/// Handler for GET /health.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handler for POST /overtime/preview.
///
/// Computes payable hours for a window without storing anything.
async fn preview_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        actor_id = %actor.employee_id,
        "Processing overtime preview"
    );

    let Json(request) = payload.map_err(|r| json_rejection_error(correlation_id, r))?;

    let start = Instant::now();
    let window = request
        .window()
        .map_err(|e| engine_failure(correlation_id, e, "Invalid overtime window"))?;
    let preview = state
        .reconciler()
        .preview(&actor, request.user_id.as_deref(), request.date, window)
        .await
        .map_err(|e| engine_failure(correlation_id, e, "Overtime preview failed"))?;

    info!(
        correlation_id = %correlation_id,
        date = %request.date,
        hours = %preview.breakdown.payable_hours,
        duration_us = start.elapsed().as_micros(),
        "Overtime preview completed"
    );
    Ok((StatusCode::OK, Json(preview)).into_response())
}

/// Handler for PUT /overtime.
///
/// Creates the caller's record for the date, or overwrites it.
async fn submit_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    payload: Result<Json<SubmitOvertimeRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        actor_id = %actor.employee_id,
        "Processing overtime submission"
    );

    let Json(request) = payload.map_err(|r| json_rejection_error(correlation_id, r))?;
    let submission = OvertimeSubmission::try_from(request)
        .map_err(|e| engine_failure(correlation_id, e, "Invalid overtime window"))?;

    let outcome = state
        .reconciler()
        .upsert(&actor, submission)
        .await
        .map_err(|e| engine_failure(correlation_id, e, "Overtime submission failed"))?;

    let status = match outcome {
        UpsertOutcome::Created(_) => StatusCode::CREATED,
        UpsertOutcome::Updated(_) => StatusCode::OK,
    };
    let record = outcome.into_record();
    info!(
        correlation_id = %correlation_id,
        user_id = %record.user_id,
        date = %record.date,
        hours = %record.total_hours,
        status = status.as_u16(),
        "Overtime submission stored"
    );
    Ok((status, Json(record)).into_response())
}

/// Handler for DELETE /overtime/:user_id/:date.
async fn cancel_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    path: Result<Path<(String, NaiveDate)>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let Path((user_id, date)) = path.map_err(|r| path_rejection_error(correlation_id, r))?;
    info!(
        correlation_id = %correlation_id,
        actor_id = %actor.employee_id,
        user_id = %user_id,
        date = %date,
        "Processing overtime cancellation"
    );

    let outcome = state
        .reconciler()
        .cancel(&actor, &user_id, date)
        .await
        .map_err(|e| engine_failure(correlation_id, e, "Overtime cancellation failed"))?;

    let body = match outcome {
        CancelOutcome::Removed(record) => CancelResponse {
            cancelled: true,
            record: Some(record),
        },
        CancelOutcome::NotFound => CancelResponse {
            cancelled: false,
            record: None,
        },
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Handler for GET /overtime.
///
/// Non-admin callers only ever see their own records.
async fn list_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    query: Result<Query<ListOvertimeQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|r| query_rejection_error(correlation_id, r))?;

    let records = state
        .reconciler()
        .list(&actor, query.filter())
        .await
        .map_err(|e| engine_failure(correlation_id, e, "Overtime listing failed"))?;
    let page = paginate(records, query.page, query.per_page)
        .map_err(|e| engine_failure(correlation_id, e, "Overtime listing failed"))?;

    info!(
        correlation_id = %correlation_id,
        actor_id = %actor.employee_id,
        total = page.total,
        page = page.page,
        "Listed overtime"
    );
    Ok((StatusCode::OK, Json(page)).into_response())
}

/// Handler for GET /overtime/summary/:user_id/:year/:month.
async fn summary_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    path: Result<Path<(String, i32, u32)>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let Path((user_id, year, month)) = path.map_err(|r| path_rejection_error(correlation_id, r))?;

    let summary = state
        .reconciler()
        .monthly_summary(&actor, &user_id, year, month)
        .await
        .map_err(|e| engine_failure(correlation_id, e, "Monthly summary failed"))?;

    info!(
        correlation_id = %correlation_id,
        user_id = %user_id,
        year,
        month,
        hours = %summary.total_hours,
        "Built monthly summary"
    );
    Ok((StatusCode::OK, Json(summary)).into_response())
}

/// Handler for GET /calendar/:year/:month.
async fn calendar_handler(
    State(state): State<AppState>,
    path: Result<Path<(i32, u32)>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let Path((year, month)) = path.map_err(|r| path_rejection_error(correlation_id, r))?;

    let days = state
        .reconciler()
        .month_calendar(year, month)
        .await
        .map_err(|e| engine_failure(correlation_id, e, "Month calendar failed"))?;
    Ok((StatusCode::OK, Json(days)).into_response())
}

/// Handler for PUT /day-configs/:date.
async fn day_config_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    path: Result<Path<NaiveDate>, PathRejection>,
    payload: Result<Json<DayConfigRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let Path(date) = path.map_err(|r| path_rejection_error(correlation_id, r))?;
    let Json(request) = payload.map_err(|r| json_rejection_error(correlation_id, r))?;

    let stored = state
        .reconciler()
        .set_day_config(
            &actor,
            DayConfig {
                date,
                is_working_day: request.is_working_day,
            },
        )
        .await
        .map_err(|e| engine_failure(correlation_id, e, "Day configuration update failed"))?;
    Ok((StatusCode::OK, Json(stored)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::actor::{EMPLOYEE_ID_HEADER, EMPLOYEE_ROLE_HEADER};
    use crate::calculation::{CalendarDay, MonthlySummary, Page};
    use crate::config::ConfigLoader;
    use crate::models::OvertimeRequest;
    use crate::reconcile::OvertimePreview;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/default").expect("Failed to load config");
        AppState::new(config)
    }

    fn request(method: &str, uri: &str, actor: Option<(&str, &str)>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((id, role)) = actor {
            builder = builder
                .header(EMPLOYEE_ID_HEADER, id)
                .header(EMPLOYEE_ROLE_HEADER, role);
        }
        match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    const USER: Option<(&str, &str)> = Some(("emp_001", "user"));
    const ADMIN: Option<(&str, &str)> = Some(("adm_001", "admin"));

    fn submission_body(user_id: &str, date: &str, start: &str, end: &str) -> String {
        serde_json::json!({
            "user_id": user_id,
            "date": date,
            "start_time": start,
            "end_time": end,
            "reason": "Inventory count",
        })
        .to_string()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(request("GET", "/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthResponse = body_json(response).await;
        assert_eq!(health.status, "ok");
    }

    #[tokio::test]
    async fn test_preview_returns_breakdown() {
        let router = create_router(create_test_state());
        let body = r#"{"date": "2026-01-17", "start_time": "08:00", "end_time": "20:00"}"#;

        let response = router
            .oneshot(request("POST", "/overtime/preview", USER, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let preview: OvertimePreview = body_json(response).await;
        assert_eq!(preview.breakdown.payable_hours, dec("11.00"));
        assert_eq!(preview.breakdown.audit_step.rule_id, "overtime_hours");
    }

    #[tokio::test]
    async fn test_preview_of_colleague_record_is_forbidden() {
        let router = create_router(create_test_state());
        let body = submission_body("emp_001", "2026-01-15", "17:30", "20:00");
        let response = router
            .clone()
            .oneshot(request("PUT", "/overtime", USER, Some(&body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = r#"{"user_id": "emp_001", "date": "2026-01-15", "start_time": "17:30", "end_time": "20:00"}"#;
        let response = router
            .clone()
            .oneshot(request("POST", "/overtime/preview", Some(("emp_002", "user")), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "FORBIDDEN");

        let response = router
            .oneshot(request("POST", "/overtime/preview", ADMIN, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let preview: OvertimePreview = body_json(response).await;
        assert_eq!(preview.existing.unwrap().user_id, "emp_001");
    }

    #[tokio::test]
    async fn test_preview_without_headers_is_unauthorized() {
        let router = create_router(create_test_state());
        let body = r#"{"date": "2026-01-17", "start_time": "08:00", "end_time": "20:00"}"#;
        let response = router
            .oneshot(request("POST", "/overtime/preview", None, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_clock_text_is_invalid_time() {
        let router = create_router(create_test_state());
        let body = submission_body("emp_001", "2026-01-15", "25:00", "20:00");
        let response = router
            .clone()
            .oneshot(request("PUT", "/overtime", USER, Some(&body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_TIME");

        let body = r#"{"date": "2026-01-17", "start_time": "08:00", "end_time": "8pm"}"#;
        let response = router
            .oneshot(request("POST", "/overtime/preview", USER, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_TIME");
    }

    #[tokio::test]
    async fn test_submit_creates_then_updates() {
        let router = create_router(create_test_state());
        let body = submission_body("emp_001", "2026-01-15", "17:30", "20:00");

        let response = router
            .clone()
            .oneshot(request("PUT", "/overtime", USER, Some(&body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: OvertimeRequest = body_json(response).await;
        assert_eq!(created.total_hours, dec("2.50"));

        let body = submission_body("emp_001", "2026-01-15", "17:30", "23:00");
        let response = router
            .oneshot(request("PUT", "/overtime", USER, Some(&body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: OvertimeRequest = body_json(response).await;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.total_hours, dec("4.50"));
    }

    #[tokio::test]
    async fn test_submit_without_headers_is_unauthorized() {
        let router = create_router(create_test_state());
        let body = submission_body("emp_001", "2026-01-15", "17:30", "20:00");
        let response = router
            .oneshot(request("PUT", "/overtime", None, Some(&body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_submit_for_other_user_is_forbidden() {
        let router = create_router(create_test_state());
        let body = submission_body("emp_002", "2026-01-15", "17:30", "20:00");
        let response = router
            .oneshot(request("PUT", "/overtime", USER, Some(&body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_reversed_window_is_unprocessable() {
        let router = create_router(create_test_state());
        let body = submission_body("emp_001", "2026-01-15", "20:00", "18:00");
        let response = router
            .oneshot(request("PUT", "/overtime", USER, Some(&body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_HOURS");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(request("PUT", "/overtime", USER, Some("{invalid json")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let router = create_router(create_test_state());
        let body = r#"{"user_id": "emp_001", "date": "2026-01-15", "start_time": "17:30"}"#;
        let response = router
            .oneshot(request("PUT", "/overtime", USER, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("end_time"));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let router = create_router(create_test_state());
        let body = submission_body("emp_001", "2026-01-15", "17:30", "20:00");
        router
            .clone()
            .oneshot(request("PUT", "/overtime", USER, Some(&body)))
            .await
            .unwrap();

        let response = router
            .clone()
            .oneshot(request("DELETE", "/overtime/emp_001/2026-01-15", USER, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cancelled: CancelResponse = body_json(response).await;
        assert!(cancelled.cancelled);

        let response = router
            .oneshot(request("DELETE", "/overtime/emp_001/2026-01-15", USER, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cancelled: CancelResponse = body_json(response).await;
        assert!(!cancelled.cancelled);
    }

    #[tokio::test]
    async fn test_cancel_with_bad_date_is_validation_error() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(request("DELETE", "/overtime/emp_001/not-a-date", USER, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_paginated() {
        let router = create_router(create_test_state());
        for date in ["2026-01-13", "2026-01-14", "2026-01-15"] {
            let body = submission_body("emp_001", date, "18:00", "20:00");
            router
                .clone()
                .oneshot(request("PUT", "/overtime", USER, Some(&body)))
                .await
                .unwrap();
        }
        let body = submission_body("emp_002", "2026-01-15", "18:00", "20:00");
        router
            .clone()
            .oneshot(request("PUT", "/overtime", ADMIN, Some(&body)))
            .await
            .unwrap();

        let response = router
            .clone()
            .oneshot(request("GET", "/overtime?page=1&per_page=2", USER, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page: Page<OvertimeRequest> = body_json(response).await;
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|r| r.user_id == "emp_001"));
        assert_eq!(page.items[0].employee_code.as_deref(), Some("NV001"));

        let response = router
            .oneshot(request("GET", "/overtime", ADMIN, None))
            .await
            .unwrap();
        let page: Page<OvertimeRequest> = body_json(response).await;
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_monthly_summary_endpoint() {
        let router = create_router(create_test_state());
        for (date, start, end) in [
            ("2026-01-15", "17:30", "20:00"),
            ("2026-01-17", "08:00", "20:00"),
        ] {
            let body = submission_body("emp_001", date, start, end);
            router
                .clone()
                .oneshot(request("PUT", "/overtime", USER, Some(&body)))
                .await
                .unwrap();
        }

        let response = router
            .oneshot(request("GET", "/overtime/summary/emp_001/2026/1", USER, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let summary: MonthlySummary = body_json(response).await;
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.total_hours, dec("13.50"));
    }

    #[tokio::test]
    async fn test_day_config_update_requires_admin() {
        let router = create_router(create_test_state());
        let body = r#"{"is_working_day": false}"#;

        let response = router
            .clone()
            .oneshot(request("PUT", "/day-configs/2026-01-20", USER, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = router
            .clone()
            .oneshot(request("PUT", "/day-configs/2026-01-20", ADMIN, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(request("GET", "/calendar/2026/1", None, None))
            .await
            .unwrap();
        let days: Vec<CalendarDay> = body_json(response).await;
        let tuesday = days
            .iter()
            .find(|d| d.date == NaiveDate::from_ymd_opt(2026, 1, 20).unwrap())
            .unwrap();
        assert!(!tuesday.day_kind.is_working());
        assert!(tuesday.overridden);
    }

    #[tokio::test]
    async fn test_calendar_invalid_month_is_400() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(request("GET", "/calendar/2026/13", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
