use serde::Serialize;

/// Point-in-time leave balance for one employee. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveSummary {
    pub employee_id: u64,
    pub employee_name: String,
    pub total_leave_days: i64,
    pub taken_leaves: i64,
    /// May go negative if the allowance was lowered after leave was approved.
    pub remaining_leaves: i64,
}
