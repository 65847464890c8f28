//! Core data models for the Overtime Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod clock_time;
mod day_config;
mod employee;
mod overtime_request;

pub use audit::AuditStep;
pub use clock_time::ClockTime;
pub use day_config::{DayConfig, DayOverrides};
pub use employee::{Actor, Employee, Role};
pub use overtime_request::{
    NewOvertimeRequest, OvertimeChanges, OvertimeFilter, OvertimeRequest, OvertimeStatus,
    OvertimeSubmission,
};
