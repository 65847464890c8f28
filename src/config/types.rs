//! Configuration types for the overtime service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{ClockTime, DayConfig, Employee};

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Overtime ending after this time is not credited.
pub const DEFAULT_CREDIT_CUTOFF: ClockTime = ClockTime::hm(22, 0);

/// Break-deduction and cutoff rules for overtime windows.
///
/// The defaults are the house rules: nothing after 22:00 is credited, a
/// window of 8 hours or more loses a 1 hour break, and a window over
/// 4 hours loses a 30 minute break when it falls on a rest day or runs over
/// 5 hours.
///
/// # Example
///
/// ```
/// use overtime_engine::config::OvertimePolicy;
/// use rust_decimal::Decimal;
///
/// let policy = OvertimePolicy::default();
/// assert_eq!(policy.credit_cutoff.to_string(), "22:00");
/// assert_eq!(policy.full_break_deduction_hours, Decimal::ONE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OvertimePolicy {
    /// Latest credited end time; later end times are capped to it.
    pub credit_cutoff: ClockTime,
    /// Windows at or above this many hours lose the full break.
    pub full_break_threshold_hours: Decimal,
    /// Hours deducted for the full break.
    pub full_break_deduction_hours: Decimal,
    /// Windows strictly above this many hours on a rest day lose the short break.
    pub short_break_threshold_hours: Decimal,
    /// Windows strictly above this many hours on a working day lose the short break.
    pub working_day_short_break_threshold_hours: Decimal,
    /// Hours deducted for the short break.
    pub short_break_deduction_hours: Decimal,
}

impl Default for OvertimePolicy {
    fn default() -> Self {
        Self {
            credit_cutoff: DEFAULT_CREDIT_CUTOFF,
            full_break_threshold_hours: Decimal::from(8),
            full_break_deduction_hours: Decimal::ONE,
            short_break_threshold_hours: Decimal::from(4),
            working_day_short_break_threshold_hours: Decimal::from(5),
            short_break_deduction_hours: Decimal::new(5, 1),
        }
    }
}

impl OvertimePolicy {
    /// Checks that thresholds are ordered and deductions are non-negative.
    pub fn validate(&self) -> Result<(), String> {
        if self.short_break_threshold_hours < Decimal::ZERO {
            return Err("short_break_threshold_hours must not be negative".to_string());
        }
        if self.short_break_threshold_hours > self.working_day_short_break_threshold_hours {
            return Err(
                "short_break_threshold_hours must not exceed working_day_short_break_threshold_hours"
                    .to_string(),
            );
        }
        if self.working_day_short_break_threshold_hours > self.full_break_threshold_hours {
            return Err(
                "working_day_short_break_threshold_hours must not exceed full_break_threshold_hours"
                    .to_string(),
            );
        }
        if self.full_break_deduction_hours < Decimal::ZERO
            || self.short_break_deduction_hours < Decimal::ZERO
        {
            return Err("break deductions must not be negative".to_string());
        }
        Ok(())
    }
}

/// Structure of `service.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceFile {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Overtime policy.
    #[serde(default)]
    pub policy: OvertimePolicy,
}

/// Structure of `employees.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeesFile {
    /// Reference employees.
    pub employees: Vec<Employee>,
}

/// Structure of `day_overrides.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DayOverridesFile {
    /// Seed overrides.
    #[serde(default)]
    pub overrides: Vec<DayConfig>,
}

/// The complete service configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    server: ServerConfig,
    policy: OvertimePolicy,
    employees: Vec<Employee>,
    day_overrides: Vec<DayConfig>,
}

impl ServiceConfig {
    /// Creates a new ServiceConfig from its component parts.
    pub fn new(
        server: ServerConfig,
        policy: OvertimePolicy,
        employees: Vec<Employee>,
        day_overrides: Vec<DayConfig>,
    ) -> Self {
        let mut sorted_overrides = day_overrides;
        sorted_overrides.sort_by_key(|c| c.date);
        Self {
            server,
            policy,
            employees,
            day_overrides: sorted_overrides,
        }
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Returns the overtime policy.
    pub fn policy(&self) -> &OvertimePolicy {
        &self.policy
    }

    /// Returns the reference employees.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Returns the seed day overrides, oldest first.
    pub fn day_overrides(&self) -> &[DayConfig] {
        &self.day_overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(OvertimePolicy::default().validate().is_ok());
    }

    #[test]
    fn test_partial_policy_falls_back_to_defaults() {
        let yaml = "credit_cutoff: \"21:30\"\n";
        let policy: OvertimePolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.credit_cutoff, ClockTime::from_hm(21, 30).unwrap());
        assert_eq!(policy.full_break_threshold_hours, Decimal::from(8));
    }

    #[test]
    fn test_misordered_thresholds_are_rejected() {
        let policy = OvertimePolicy {
            working_day_short_break_threshold_hours: Decimal::from(9),
            ..OvertimePolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_negative_deduction_is_rejected() {
        let policy = OvertimePolicy {
            short_break_deduction_hours: Decimal::new(-5, 1),
            ..OvertimePolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_service_file_defaults() {
        let file: ServiceFile = serde_yaml::from_str("{}").unwrap();
        assert_eq!(file.server.bind_address, "127.0.0.1:8080");
        assert_eq!(file.policy, OvertimePolicy::default());
    }
}
