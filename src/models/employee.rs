//! Employee reference data and acting identities.
//!
//! Employees are read-only from the overtime engine's point of view; they
//! are only consulted to check that a record's owner exists and to join
//! display fields onto listings.

use serde::{Deserialize, Serialize};

/// The role an employee holds in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages employees, day overrides and other users' overtime.
    Admin,
    /// Files and views their own overtime.
    User,
}

impl Role {
    /// Parses a role name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

/// An employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The code the employee signs in with (e.g., "NV001").
    pub employee_code: String,
    /// Name shown in listings.
    pub display_name: String,
    /// The employee's role.
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

/// The identity performing an operation.
///
/// # Examples
///
/// ```
/// use overtime_engine::models::{Actor, Role};
///
/// let user = Actor::new("emp_001", Role::User);
/// assert!(user.can_act_for("emp_001"));
/// assert!(!user.can_act_for("emp_002"));
///
/// let admin = Actor::new("adm_001", Role::Admin);
/// assert!(admin.can_act_for("emp_002"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The acting employee's id.
    pub employee_id: String,
    /// The acting employee's role.
    pub role: Role,
}

impl Actor {
    /// Creates an actor.
    pub fn new(employee_id: impl Into<String>, role: Role) -> Self {
        Self {
            employee_id: employee_id.into(),
            role,
        }
    }

    /// Returns true if the actor is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true if the actor owns `user_id`'s records or is an admin.
    pub fn can_act_for(&self, user_id: &str) -> bool {
        self.is_admin() || self.employee_id == user_id
    }
}
