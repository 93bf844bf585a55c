use crate::error::{LeaveError, LeaveResult};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::leave_summary::LeaveSummary;
use crate::store::{EmployeeDirectory, LeaveRequestStore};
use std::sync::Arc;

/// Annual leave allowance applied when nothing else is configured.
pub const DEFAULT_ANNUAL_LEAVE_DAYS: i64 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeavePolicy {
    pub annual_allowance: i64,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            annual_allowance: DEFAULT_ANNUAL_LEAVE_DAYS,
        }
    }
}

impl LeavePolicy {
    pub fn new(annual_allowance: i64) -> Self {
        Self { annual_allowance }
    }

    pub fn remaining(&self, taken: i64) -> i64 {
        self.annual_allowance - taken
    }
}

/// Sum of inclusive durations. Overlapping ranges are counted once per request.
pub fn taken_days<'a>(approved: impl IntoIterator<Item = &'a LeaveRequest>) -> i64 {
    approved.into_iter().map(LeaveRequest::duration_days).sum()
}

/// Read-only view over approved leave history.
#[derive(Clone)]
pub struct LeaveAccounting {
    directory: Arc<dyn EmployeeDirectory>,
    store: Arc<dyn LeaveRequestStore>,
    policy: LeavePolicy,
}

impl LeaveAccounting {
    pub fn new(
        directory: Arc<dyn EmployeeDirectory>,
        store: Arc<dyn LeaveRequestStore>,
        policy: LeavePolicy,
    ) -> Self {
        Self {
            directory,
            store,
            policy,
        }
    }

    pub fn policy(&self) -> LeavePolicy {
        self.policy
    }

    /// Days consumed by the employee's `APPROVED` requests.
    ///
    /// The caller is expected to have resolved the employee already.
    pub async fn compute_taken_days(&self, employee_id: u64) -> LeaveResult<i64> {
        let approved = self
            .store
            .find_by_employee_and_status(employee_id, LeaveStatus::Approved)
            .await?;

        Ok(taken_days(&approved))
    }

    pub async fn compute_summary(&self, employee_id: u64) -> LeaveResult<LeaveSummary> {
        let employee = self.resolve_employee(employee_id).await?;
        let taken = self.compute_taken_days(employee_id).await?;

        Ok(self.summarize(&employee, taken))
    }

    pub(crate) fn summarize(&self, employee: &Employee, taken: i64) -> LeaveSummary {
        LeaveSummary {
            employee_id: employee.id,
            employee_name: employee.full_name(),
            total_leave_days: self.policy.annual_allowance,
            taken_leaves: taken,
            remaining_leaves: self.policy.remaining(taken),
        }
    }

    pub(crate) async fn resolve_employee(&self, employee_id: u64) -> LeaveResult<Employee> {
        self.directory
            .find_by_id(employee_id)
            .await?
            .ok_or(LeaveError::EmployeeNotFound { employee_id })
    }
}
