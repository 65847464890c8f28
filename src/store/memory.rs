//! In-memory backend.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    DayConfig, Employee, NewOvertimeRequest, OvertimeChanges, OvertimeFilter, OvertimeRequest,
};

use super::{DayConfigStore, EmployeeDirectory, OvertimeStore};

#[derive(Debug, Default)]
struct Tables {
    overtime: HashMap<Uuid, OvertimeRequest>,
    by_user_date: HashMap<(String, NaiveDate), Uuid>,
    day_configs: BTreeMap<NaiveDate, bool>,
    employees: HashMap<String, Employee>,
}

impl Tables {
    fn joined(&self, record: &OvertimeRequest) -> OvertimeRequest {
        let mut record = record.clone();
        if let Some(employee) = self.employees.get(&record.user_id) {
            record.employee_code = Some(employee.employee_code.clone());
            record.employee_name = Some(employee.display_name.clone());
        }
        record
    }
}

/// A [`Backend`](super::Backend) held in process memory.
///
/// # Example
///
/// ```
/// use overtime_engine::store::{EmployeeDirectory, InMemoryStore};
/// use overtime_engine::models::{Employee, Role};
///
/// let store = InMemoryStore::new(
///     vec![Employee {
///         id: "emp_001".to_string(),
///         employee_code: "NV001".to_string(),
///         display_name: "Tran Van An".to_string(),
///         role: Role::User,
///     }],
///     Vec::new(),
/// );
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let found = runtime.block_on(store.find_employee("emp_001")).unwrap();
/// assert!(found.is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates a store seeded with employees and day overrides.
    pub fn new(employees: Vec<Employee>, day_configs: Vec<DayConfig>) -> Self {
        let tables = Tables {
            employees: employees.into_iter().map(|e| (e.id.clone(), e)).collect(),
            day_configs: day_configs
                .into_iter()
                .map(|c| (c.date, c.is_working_day))
                .collect(),
            ..Tables::default()
        };
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Creates a store seeded from loaded configuration.
    pub fn from_config(config: &ConfigLoader) -> Self {
        debug!(
            employees = config.employees().len(),
            day_overrides = config.day_overrides().len(),
            "Seeding in-memory store"
        );
        Self::new(
            config.employees().to_vec(),
            config.day_overrides().to_vec(),
        )
    }
}

#[async_trait]
impl OvertimeStore for InMemoryStore {
    async fn list_overtime(&self, filter: &OvertimeFilter) -> EngineResult<Vec<OvertimeRequest>> {
        let tables = self.tables.read().await;
        let mut records: Vec<OvertimeRequest> = tables
            .overtime
            .values()
            .filter(|r| filter.matches(r))
            .map(|r| tables.joined(r))
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.user_id.cmp(&b.user_id)));
        Ok(records)
    }

    async fn find_overtime(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<OvertimeRequest>> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_user_date
            .get(&(user_id.to_string(), date))
            .and_then(|id| tables.overtime.get(id))
            .map(|r| tables.joined(r)))
    }

    async fn insert_overtime(&self, new: NewOvertimeRequest) -> EngineResult<OvertimeRequest> {
        let mut tables = self.tables.write().await;
        let key = (new.user_id.clone(), new.date);
        if tables.by_user_date.contains_key(&key) {
            return Err(EngineError::DuplicateOvertime {
                user_id: new.user_id,
                date: new.date,
            });
        }

        let record = OvertimeRequest {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            total_hours: new.total_hours,
            reason: new.reason,
            status: new.status,
            created_at: Some(Utc::now()),
            employee_code: None,
            employee_name: None,
        };
        tables.by_user_date.insert(key, record.id);
        tables.overtime.insert(record.id, record.clone());
        Ok(tables.joined(&record))
    }

    async fn update_overtime(
        &self,
        id: Uuid,
        changes: OvertimeChanges,
    ) -> EngineResult<OvertimeRequest> {
        let mut tables = self.tables.write().await;
        let record = tables
            .overtime
            .get_mut(&id)
            .ok_or(EngineError::OvertimeNotFound { id })?;

        record.start_time = changes.start_time;
        record.end_time = changes.end_time;
        record.total_hours = changes.total_hours;
        record.reason = changes.reason;
        record.status = changes.status;

        let record = record.clone();
        Ok(tables.joined(&record))
    }

    async fn delete_overtime(&self, id: Uuid) -> EngineResult<Option<OvertimeRequest>> {
        let mut tables = self.tables.write().await;
        let removed = tables.overtime.remove(&id);
        if let Some(record) = &removed {
            tables
                .by_user_date
                .remove(&(record.user_id.clone(), record.date));
        }
        Ok(removed)
    }
}

#[async_trait]
impl DayConfigStore for InMemoryStore {
    async fn day_configs_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<DayConfig>> {
        if from > to {
            return Ok(Vec::new());
        }
        let tables = self.tables.read().await;
        Ok(tables
            .day_configs
            .range(from..=to)
            .map(|(date, is_working_day)| DayConfig {
                date: *date,
                is_working_day: *is_working_day,
            })
            .collect())
    }

    async fn upsert_day_config(&self, config: DayConfig) -> EngineResult<DayConfig> {
        let mut tables = self.tables.write().await;
        tables.day_configs.insert(config.date, config.is_working_day);
        Ok(config)
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryStore {
    async fn find_employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClockTime, OvertimeStatus, Role};
    use rust_decimal::Decimal;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn employee(id: &str, code: &str) -> Employee {
        Employee {
            id: id.to_string(),
            employee_code: code.to_string(),
            display_name: format!("Employee {}", code),
            role: Role::User,
        }
    }

    fn create_test_store() -> InMemoryStore {
        InMemoryStore::new(
            vec![employee("emp_001", "NV001"), employee("emp_002", "NV002")],
            vec![DayConfig {
                date: make_date("2026-01-24"),
                is_working_day: true,
            }],
        )
    }

    fn new_request(user_id: &str, date: &str) -> NewOvertimeRequest {
        NewOvertimeRequest {
            user_id: user_id.to_string(),
            date: make_date(date),
            start_time: ClockTime::hm(17, 30),
            end_time: ClockTime::hm(20, 0),
            total_hours: Decimal::new(250, 2),
            reason: "Stocktake".to_string(),
            status: OvertimeStatus::Approved,
        }
    }

    #[tokio::test]
    async fn test_insert_then_find_joins_employee() {
        let store = create_test_store();
        store
            .insert_overtime(new_request("emp_001", "2026-01-15"))
            .await
            .unwrap();

        let found = store
            .find_overtime("emp_001", make_date("2026-01-15"))
            .await
            .unwrap()
            .expect("record should exist");
        assert_eq!(found.employee_code.as_deref(), Some("NV001"));
        assert!(found.created_at.is_some());
        assert_eq!(found.status, OvertimeStatus::Approved);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let store = create_test_store();
        store
            .insert_overtime(new_request("emp_001", "2026-01-15"))
            .await
            .unwrap();

        match store
            .insert_overtime(new_request("emp_001", "2026-01-15"))
            .await
        {
            Err(EngineError::DuplicateOvertime { user_id, date }) => {
                assert_eq!(user_id, "emp_001");
                assert_eq!(date, make_date("2026-01-15"));
            }
            other => panic!("Expected DuplicateOvertime, got {:?}", other),
        }

        // Another user on the same date is fine
        assert!(
            store
                .insert_overtime(new_request("emp_002", "2026-01-15"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let store = create_test_store();
        let id = Uuid::new_v4();
        let changes = OvertimeChanges {
            start_time: ClockTime::hm(18, 0),
            end_time: ClockTime::hm(20, 0),
            total_hours: Decimal::from(2),
            reason: String::new(),
            status: OvertimeStatus::Approved,
        };
        match store.update_overtime(id, changes).await {
            Err(EngineError::OvertimeNotFound { id: missing }) => assert_eq!(missing, id),
            other => panic!("Expected OvertimeNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let store = create_test_store();
        let created = store
            .insert_overtime(new_request("emp_001", "2026-01-15"))
            .await
            .unwrap();

        let updated = store
            .update_overtime(
                created.id,
                OvertimeChanges {
                    start_time: ClockTime::hm(18, 0),
                    end_time: ClockTime::hm(21, 0),
                    total_hours: Decimal::new(300, 2),
                    reason: "Release".to_string(),
                    status: OvertimeStatus::Approved,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.total_hours, Decimal::new(300, 2));
        assert_eq!(updated.reason, "Release");
    }

    #[tokio::test]
    async fn test_delete_frees_the_slot() {
        let store = create_test_store();
        let created = store
            .insert_overtime(new_request("emp_001", "2026-01-15"))
            .await
            .unwrap();

        let removed = store.delete_overtime(created.id).await.unwrap();
        assert_eq!(removed.map(|r| r.id), Some(created.id));
        assert!(store.delete_overtime(created.id).await.unwrap().is_none());

        assert!(
            store
                .insert_overtime(new_request("emp_001", "2026-01-15"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let store = create_test_store();
        for (user, date) in [
            ("emp_001", "2026-01-05"),
            ("emp_001", "2026-01-20"),
            ("emp_002", "2026-01-10"),
            ("emp_001", "2026-02-02"),
        ] {
            store.insert_overtime(new_request(user, date)).await.unwrap();
        }

        let filter = OvertimeFilter {
            user_id: Some("emp_001".to_string()),
            from: Some(make_date("2026-01-01")),
            to: Some(make_date("2026-01-31")),
        };
        let records = store.list_overtime(&filter).await.unwrap();
        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![make_date("2026-01-20"), make_date("2026-01-05")]);
        assert!(records.iter().all(|r| r.employee_name.is_some()));

        let everything = store.list_overtime(&OvertimeFilter::default()).await.unwrap();
        assert_eq!(everything.len(), 4);
    }

    #[tokio::test]
    async fn test_day_configs_range_and_upsert() {
        let store = create_test_store();
        store
            .upsert_day_config(DayConfig {
                date: make_date("2026-01-19"),
                is_working_day: false,
            })
            .await
            .unwrap();
        store
            .upsert_day_config(DayConfig {
                date: make_date("2026-01-24"),
                is_working_day: false,
            })
            .await
            .unwrap();

        let january = store
            .day_configs_between(make_date("2026-01-01"), make_date("2026-01-31"))
            .await
            .unwrap();
        assert_eq!(january.len(), 2);
        assert_eq!(january[0].date, make_date("2026-01-19"));
        assert!(!january[1].is_working_day);

        let empty = store
            .day_configs_between(make_date("2026-01-31"), make_date("2026-01-01"))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_from_config_seeds_reference_data() {
        let loader = ConfigLoader::load("./config/default").unwrap();
        let store = InMemoryStore::from_config(&loader);

        assert!(store.find_employee("adm_001").await.unwrap().is_some());
        assert!(store.find_employee("ghost").await.unwrap().is_none());

        let seeded = store
            .day_configs_between(make_date("2026-01-24"), make_date("2026-01-24"))
            .await
            .unwrap();
        assert_eq!(seeded.len(), 1);
        assert!(seeded[0].is_working_day);
    }
}
