//! Overtime Engine
//!
//! This crate calculates payable overtime hours and keeps one overtime
//! record per employee and date. Working and rest days follow the weekday
//! calendar unless an administrator overrides a date; payable hours are
//! capped at a daily credit cutoff and reduced by an unpaid break that
//! depends on the window length and the kind of day.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod store;
