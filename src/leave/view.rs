use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::leave_summary::LeaveSummary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Leave request payload. Any `status` sent by the caller is ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    pub reason: String,
    /// Free text, never validated.
    #[serde(default)]
    #[schema(nullable = true, example = "PENDING")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee_id": 1000,
    "start_date": "2026-01-01",
    "end_date": "2026-01-05",
    "reason": "Family trip",
    "status": "PENDING",
    "manager_id": 12
}))]
pub struct LeaveRequestView {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    #[schema(nullable = true)]
    pub manager_id: Option<u64>,
}

impl From<LeaveRequest> for LeaveRequestView {
    fn from(request: LeaveRequest) -> Self {
        Self {
            id: request.id,
            employee_id: request.employee_id,
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason,
            status: request.status,
            manager_id: request.manager_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "employee_id": 1000,
    "employee_name": "John Doe",
    "total_leave_days": 27,
    "taken_leaves": 5,
    "remaining_leaves": 22
}))]
pub struct LeaveSummaryView {
    pub employee_id: u64,
    pub employee_name: String,
    pub total_leave_days: i64,
    pub taken_leaves: i64,
    pub remaining_leaves: i64,
}

impl From<LeaveSummary> for LeaveSummaryView {
    fn from(summary: LeaveSummary) -> Self {
        Self {
            employee_id: summary.employee_id,
            employee_name: summary.employee_name,
            total_leave_days: summary.total_leave_days,
            taken_leaves: summary.taken_leaves,
            remaining_leaves: summary.remaining_leaves,
        }
    }
}
