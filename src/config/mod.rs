//! Configuration loading and management for the Overtime Engine.
//!
//! This module loads the service configuration from YAML files: server
//! settings, the overtime policy, reference employees and seed day
//! overrides.
//!
//! # Example
//!
//! ```no_run
//! use overtime_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded {} employees", config.employees().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_CREDIT_CUTOFF, DayOverridesFile, EmployeesFile, OvertimePolicy, ServerConfig,
    ServiceConfig, ServiceFile,
};
