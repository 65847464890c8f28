//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading service
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{DayConfig, Employee};

use super::types::{
    DayOverridesFile, EmployeesFile, OvertimePolicy, ServerConfig, ServiceConfig, ServiceFile,
};

/// Loads and provides access to service configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── service.yaml        # Server settings and overtime policy
/// ├── employees.yaml      # Reference employees
/// └── day_overrides.yaml  # Seed working/rest day overrides (optional)
/// ```
///
/// # Example
///
/// ```no_run
/// use overtime_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Listening on {}", loader.server().bind_address);
/// println!("Credit cutoff {}", loader.policy().credit_cutoff);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ServiceConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `service.yaml` or `employees.yaml` is missing,
    /// if any file contains invalid YAML, or if the overtime policy is
    /// inconsistent. A missing `day_overrides.yaml` means no seed overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let service_path = path.join("service.yaml");
        let service = Self::load_yaml::<ServiceFile>(&service_path)?;
        service
            .policy
            .validate()
            .map_err(|message| EngineError::ConfigParseError {
                path: service_path.display().to_string(),
                message,
            })?;

        let employees = Self::load_yaml::<EmployeesFile>(&path.join("employees.yaml"))?;

        let overrides_path = path.join("day_overrides.yaml");
        let overrides = if overrides_path.exists() {
            Self::load_yaml::<DayOverridesFile>(&overrides_path)?.overrides
        } else {
            Vec::new()
        };

        debug!(
            config_dir = %path.display(),
            employees = employees.employees.len(),
            day_overrides = overrides.len(),
            "Loaded service configuration"
        );

        Ok(Self {
            config: ServiceConfig::new(
                service.server,
                service.policy,
                employees.employees,
                overrides,
            ),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: ServiceConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        self.config.server()
    }

    /// Returns the overtime policy.
    pub fn policy(&self) -> &OvertimePolicy {
        self.config.policy()
    }

    /// Returns the reference employees.
    pub fn employees(&self) -> &[Employee] {
        self.config.employees()
    }

    /// Returns the seed day overrides.
    pub fn day_overrides(&self) -> &[DayConfig] {
        self.config.day_overrides()
    }

    /// Gets an employee by id.
    pub fn get_employee(&self, id: &str) -> EngineResult<&Employee> {
        self.employees()
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| EngineError::EmployeeNotFound {
                user_id: id.to_string(),
            })
    }
}
