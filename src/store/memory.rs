use super::{EmployeeDirectory, LeaveRequestStore, StoreResult};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};
use anyhow::Context;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

/// Directory held in process memory. Used when no database is configured
/// and by the test suites.
#[derive(Default)]
pub struct InMemoryDirectory {
    employees: RwLock<BTreeMap<u64, Employee>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let directory = Self::new();
        for employee in employees {
            directory.upsert(employee);
        }
        directory
    }

    /// Loads a JSON array of employees, e.g. an export of the HR directory.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read employees file {}", path.display()))?;
        let employees: Vec<Employee> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid employees file {}", path.display()))?;

        tracing::info!(count = employees.len(), "Loaded employees into in-memory directory");
        Ok(Self::with_employees(employees))
    }

    pub fn upsert(&self, employee: Employee) {
        self.employees
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(employee.id, employee);
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryDirectory {
    async fn find_by_id(&self, employee_id: u64) -> StoreResult<Option<Employee>> {
        let employees = self.employees.read().unwrap_or_else(PoisonError::into_inner);
        Ok(employees.get(&employee_id).cloned())
    }

    async fn find_by_manager(&self, manager_id: u64) -> StoreResult<Vec<Employee>> {
        let employees = self.employees.read().unwrap_or_else(PoisonError::into_inner);
        Ok(employees
            .values()
            .filter(|e| e.manager_id == Some(manager_id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct LeaveTable {
    next_id: u64,
    // ids are handed out in increasing order, so key order is insertion order
    rows: BTreeMap<u64, LeaveRequest>,
}

#[derive(Default)]
pub struct InMemoryLeaveStore {
    table: RwLock<LeaveTable>,
}

impl InMemoryLeaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&self, filter: impl Fn(&LeaveRequest) -> bool) -> Vec<LeaveRequest> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.rows.values().filter(|r| filter(r)).cloned().collect()
    }
}

#[async_trait]
impl LeaveRequestStore for InMemoryLeaveStore {
    async fn find_by_id(&self, request_id: u64) -> StoreResult<Option<LeaveRequest>> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Ok(table.rows.get(&request_id).cloned())
    }

    async fn find_by_employee(&self, employee_id: u64) -> StoreResult<Vec<LeaveRequest>> {
        Ok(self.select(|r| r.employee_id == employee_id))
    }

    async fn find_by_employee_and_status(
        &self,
        employee_id: u64,
        status: LeaveStatus,
    ) -> StoreResult<Vec<LeaveRequest>> {
        Ok(self.select(|r| r.employee_id == employee_id && r.status == status))
    }

    async fn find_by_employees(&self, employee_ids: &[u64]) -> StoreResult<Vec<LeaveRequest>> {
        Ok(self.select(|r| employee_ids.contains(&r.employee_id)))
    }

    async fn find_all(&self) -> StoreResult<Vec<LeaveRequest>> {
        Ok(self.select(|_| true))
    }

    async fn insert(&self, request: NewLeaveRequest) -> StoreResult<LeaveRequest> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.next_id += 1;
        let stored = request.into_request(table.next_id);
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_status(
        &self,
        request_id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> StoreResult<Option<LeaveRequest>> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        match table.rows.get_mut(&request_id) {
            Some(row) if row.status == from => {
                row.status = to;
                Ok(Some(row.clone()))
            }
            _ => Ok(None),
        }
    }
}
