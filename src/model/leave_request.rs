use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle status of a leave request. `Approved` and `Denied` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Denied,
}

impl LeaveStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    /// Reviewer of record, copied from the employee's manager at creation.
    pub manager_id: Option<u64>,
}

impl LeaveRequest {
    /// Inclusive length of the leave in calendar days.
    pub fn duration_days(&self) -> i64 {
        inclusive_days(self.start_date, self.end_date)
    }
}

/// A leave request that has not been stored yet. Always starts out `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeaveRequest {
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub manager_id: Option<u64>,
}

impl NewLeaveRequest {
    pub fn into_request(self, id: u64) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_id: self.employee_id,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
            status: LeaveStatus::Pending,
            manager_id: self.manager_id,
        }
    }
}

pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn duration_counts_both_endpoints() {
        assert_eq!(inclusive_days(date(2024, 1, 1), date(2024, 1, 5)), 5);
        assert_eq!(inclusive_days(date(2024, 3, 10), date(2024, 3, 10)), 1);
        // leap day
        assert_eq!(inclusive_days(date(2024, 2, 28), date(2024, 3, 1)), 3);
    }

    #[test]
    fn status_uses_uppercase_literals() {
        assert_eq!(LeaveStatus::Pending.to_string(), "PENDING");
        assert_eq!(LeaveStatus::Denied.as_ref(), "DENIED");
        assert_eq!(LeaveStatus::from_str("APPROVED").ok(), Some(LeaveStatus::Approved));
        assert!(LeaveStatus::from_str("approved").is_err());
        assert_eq!(
            serde_json::to_string(&LeaveStatus::Approved).expect("serializes"),
            "\"APPROVED\""
        );
    }

    #[test]
    fn new_request_is_pending() {
        let request = NewLeaveRequest {
            employee_id: 7,
            start_date: date(2024, 5, 1),
            end_date: date(2024, 5, 2),
            reason: "family".to_string(),
            manager_id: Some(3),
        }
        .into_request(11);

        assert_eq!(request.id, 11);
        assert_eq!(request.status, LeaveStatus::Pending);
        assert!(!request.status.is_terminal());
        assert_eq!(request.duration_days(), 2);
    }
}
