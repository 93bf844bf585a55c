use super::{EmployeeDirectory, LeaveRequestStore, StoreResult};
use crate::error::StorageError;
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySqlPool};
use std::str::FromStr;
use tracing::{debug, error};

const EMPLOYEE_COLUMNS: &str = "id, first_name, last_name, email, department_id, manager_id";
const LEAVE_COLUMNS: &str = "id, employee_id, start_date, end_date, reason, status, manager_id";

pub struct MySqlDirectory {
    pool: MySqlPool,
}

impl MySqlDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeDirectory for MySqlDirectory {
    async fn find_by_id(&self, employee_id: u64) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?");
        sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, employee_id, "Failed to fetch employee");
                e.into()
            })
    }

    async fn find_by_manager(&self, manager_id: u64) -> StoreResult<Vec<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE manager_id = ? ORDER BY id");
        sqlx::query_as::<_, Employee>(&sql)
            .bind(manager_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, manager_id, "Failed to fetch direct reports");
                e.into()
            })
    }
}

/// Row shape of `leave_requests`; status is stored as its string literal.
#[derive(FromRow)]
struct LeaveRequestRow {
    id: u64,
    employee_id: u64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: String,
    status: String,
    manager_id: Option<u64>,
}

impl TryFrom<LeaveRequestRow> for LeaveRequest {
    type Error = StorageError;

    fn try_from(row: LeaveRequestRow) -> Result<Self, Self::Error> {
        let status = LeaveStatus::from_str(&row.status).map_err(|_| StorageError::Corrupt {
            id: row.id,
            reason: format!("unknown status '{}'", row.status),
        })?;

        Ok(LeaveRequest {
            id: row.id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            status,
            manager_id: row.manager_id,
        })
    }
}

fn into_requests(rows: Vec<LeaveRequestRow>) -> StoreResult<Vec<LeaveRequest>> {
    rows.into_iter().map(LeaveRequest::try_from).collect()
}

pub struct MySqlLeaveStore {
    pool: MySqlPool,
}

impl MySqlLeaveStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveRequestStore for MySqlLeaveStore {
    async fn find_by_id(&self, request_id: u64) -> StoreResult<Option<LeaveRequest>> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?");
        let row = sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, request_id, "Failed to fetch leave request");
                StorageError::from(e)
            })?;

        row.map(LeaveRequest::try_from).transpose()
    }

    async fn find_by_employee(&self, employee_id: u64) -> StoreResult<Vec<LeaveRequest>> {
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE employee_id = ? ORDER BY id"
        );
        let rows = sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, employee_id, "Failed to fetch employee leave requests");
                StorageError::from(e)
            })?;

        into_requests(rows)
    }

    async fn find_by_employee_and_status(
        &self,
        employee_id: u64,
        status: LeaveStatus,
    ) -> StoreResult<Vec<LeaveRequest>> {
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE employee_id = ? AND status = ? ORDER BY id"
        );
        let rows = sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .bind(employee_id)
            .bind(status.as_ref())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, employee_id, %status, "Failed to fetch leave requests by status");
                StorageError::from(e)
            })?;

        into_requests(rows)
    }

    async fn find_by_employees(&self, employee_ids: &[u64]) -> StoreResult<Vec<LeaveRequest>> {
        if employee_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; employee_ids.len()].join(", ");
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE employee_id IN ({placeholders}) ORDER BY id"
        );
        debug!(sql = %sql, employee_ids = ?employee_ids, "Fetching leave requests for employees");

        let mut query = sqlx::query_as::<_, LeaveRequestRow>(&sql);
        for id in employee_ids {
            query = query.bind(*id);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            error!(error = %e, "Failed to fetch leave requests for employees");
            StorageError::from(e)
        })?;

        into_requests(rows)
    }

    async fn find_all(&self) -> StoreResult<Vec<LeaveRequest>> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests ORDER BY id");
        let rows = sqlx::query_as::<_, LeaveRequestRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch leave list");
                StorageError::from(e)
            })?;

        into_requests(rows)
    }

    async fn insert(&self, request: NewLeaveRequest) -> StoreResult<LeaveRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, start_date, end_date, reason, status, manager_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.employee_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.reason)
        .bind(LeaveStatus::Pending.as_ref())
        .bind(request.manager_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = request.employee_id, "Failed to create leave request");
            StorageError::from(e)
        })?;

        Ok(request.into_request(result.last_insert_id()))
    }

    async fn update_status(
        &self,
        request_id: u64,
        from: LeaveStatus,
        to: LeaveStatus,
    ) -> StoreResult<Option<LeaveRequest>> {
        let result = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?
            WHERE id = ?
            AND status = ?
            "#,
        )
        .bind(to.as_ref())
        .bind(request_id)
        .bind(from.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, request_id, %to, "Leave status update failed");
            StorageError::from(e)
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(request_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> LeaveRequestRow {
        LeaveRequestRow {
            id: 3,
            employee_id: 8,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date"),
            reason: "trip".to_string(),
            status: status.to_string(),
            manager_id: None,
        }
    }

    #[test]
    fn row_status_literal_is_parsed() {
        let request = LeaveRequest::try_from(row("APPROVED")).expect("valid row");
        assert_eq!(request.status, LeaveStatus::Approved);
        assert_eq!(request.duration_days(), 2);
    }

    #[test]
    fn unknown_status_literal_is_reported_as_corrupt() {
        let err = LeaveRequest::try_from(row("approved")).expect_err("lowercase is not a status");
        assert!(matches!(err, StorageError::Corrupt { id: 3, .. }));
    }
}
