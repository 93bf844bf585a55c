pub mod cached;
pub mod memory;
pub mod mysql;

use crate::error::StorageError;
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};
use async_trait::async_trait;

pub use cached::CachedDirectory;
pub use memory::{InMemoryDirectory, InMemoryLeaveStore};
pub use mysql::{MySqlDirectory, MySqlLeaveStore};

pub type StoreResult<T> = Result<T, StorageError>;

/// Read-only employee lookup owned by the HR directory.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn find_by_id(&self, employee_id: u64) -> StoreResult<Option<Employee>>;

    /// Direct reports of `manager_id`.
    async fn find_by_manager(&self, manager_id: u64) -> StoreResult<Vec<Employee>>;
}

/// Durable collection of leave requests.
///
/// Every list method returns records in insertion order.
#[async_trait]
pub trait LeaveRequestStore: Send + Sync {
    async fn find_by_id(&self, request_id: u64) -> StoreResult<Option<LeaveRequest>>;

    async fn find_by_employee(&self, employee_id: u64) -> StoreResult<Vec<LeaveRequest>>;

    async fn find_by_employee_and_status(
        &self,
        employee_id: u64,
        status: LeaveStatus,
    ) -> StoreResult<Vec<LeaveRequest>>;

    async fn find_by_employees(&self, employee_ids: &[u64]) -> StoreResult<Vec<LeaveRequest>>;

    async fn find_all(&self) -> StoreResult<Vec<LeaveRequest>>;

    /// Persists a new request and returns it with its assigned id.
    async fn insert(&self, request: NewLeaveRequest) -> StoreResult<LeaveRequest>;

    /// Moves a request from `from` to `to`.
    ///
    /// Returns `None` when the request is missing or no longer in `from`,
    /// leaving the stored record untouched.
    async fn update_status(
        &self,
        request_id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> StoreResult<Option<LeaveRequest>>;
}
