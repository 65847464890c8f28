//! Persistence seam for overtime records, day overrides and employees.
//!
//! The engine talks to its backend only through these traits. Every method
//! is async so a remote table service can stand behind them; the bundled
//! [`InMemoryStore`] serves the binary and the tests.

mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    DayConfig, Employee, NewOvertimeRequest, OvertimeChanges, OvertimeFilter, OvertimeRequest,
};

pub use memory::InMemoryStore;

/// Overtime record storage.
///
/// Implementations must treat (user_id, date) as a unique key:
/// [`insert_overtime`](OvertimeStore::insert_overtime) fails with
/// [`EngineError::DuplicateOvertime`](crate::error::EngineError::DuplicateOvertime)
/// when a record already exists for the pair.
#[async_trait]
pub trait OvertimeStore: Send + Sync {
    /// Lists matching records ordered by date, newest first, with the
    /// owner's employee code and name filled in.
    async fn list_overtime(&self, filter: &OvertimeFilter) -> EngineResult<Vec<OvertimeRequest>>;

    /// Finds the record for a user and date.
    async fn find_overtime(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<OvertimeRequest>>;

    /// Inserts a new record.
    async fn insert_overtime(&self, new: NewOvertimeRequest) -> EngineResult<OvertimeRequest>;

    /// Overwrites the editable fields of an existing record.
    async fn update_overtime(
        &self,
        id: Uuid,
        changes: OvertimeChanges,
    ) -> EngineResult<OvertimeRequest>;

    /// Deletes a record, returning it if it existed.
    async fn delete_overtime(&self, id: Uuid) -> EngineResult<Option<OvertimeRequest>>;
}

/// Day override storage.
#[async_trait]
pub trait DayConfigStore: Send + Sync {
    /// Returns the overrides dated between `from` and `to` inclusive.
    async fn day_configs_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<DayConfig>>;

    /// Creates or replaces the override for `config.date`.
    async fn upsert_day_config(&self, config: DayConfig) -> EngineResult<DayConfig>;
}

/// Read-only employee lookup.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Finds an employee by id.
    async fn find_employee(&self, id: &str) -> EngineResult<Option<Employee>>;
}

/// Everything the reconciler needs from a backend.
pub trait Backend: OvertimeStore + DayConfigStore + EmployeeDirectory {}

impl<T> Backend for T where T: OvertimeStore + DayConfigStore + EmployeeDirectory {}
