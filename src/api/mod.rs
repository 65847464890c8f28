//! HTTP API module for the Overtime Engine.
//!
//! This module provides the REST endpoints for previewing, submitting,
//! cancelling and listing overtime, and for managing day overrides.

mod actor;
mod handlers;
mod request;
mod response;
mod state;

pub use actor::{CurrentActor, EMPLOYEE_ID_HEADER, EMPLOYEE_ROLE_HEADER};
pub use handlers::create_router;
pub use request::{DayConfigRequest, ListOvertimeQuery, PreviewRequest, SubmitOvertimeRequest};
pub use response::{ApiError, ApiErrorResponse, CancelResponse, HealthResponse};
pub use state::AppState;
