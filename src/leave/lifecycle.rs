use super::accounting::{LeaveAccounting, LeavePolicy};
use super::locks::EmployeeLocks;
use super::view::{CreateLeave, LeaveRequestView, LeaveSummaryView};
use crate::error::{LeaveError, LeaveResult};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};
use crate::store::{EmployeeDirectory, LeaveRequestStore};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Creates, approves and denies leave requests.
///
/// Every mutation runs under the owning employee's lock, so the balance check
/// in [`LeaveService::approve`] always sees that employee's full approved
/// history and nothing else can approve in between.
///
/// The locks live in this process. Several instances sharing one database
/// still serialize each status change through the conditional
/// `PENDING -> X` write, but two of them may each approve a different
/// request for the same employee and together overdraw the allowance.
pub struct LeaveService {
    directory: Arc<dyn EmployeeDirectory>,
    store: Arc<dyn LeaveRequestStore>,
    accounting: LeaveAccounting,
    locks: EmployeeLocks,
}

impl LeaveService {
    pub fn new(
        directory: Arc<dyn EmployeeDirectory>,
        store: Arc<dyn LeaveRequestStore>,
        policy: LeavePolicy,
    ) -> Self {
        let accounting = LeaveAccounting::new(directory.clone(), store.clone(), policy);

        Self {
            directory,
            store,
            accounting,
            locks: EmployeeLocks::new(),
        }
    }

    pub fn accounting(&self) -> &LeaveAccounting {
        &self.accounting
    }

    #[instrument(name = "leave_create", skip(self, payload))]
    pub async fn create(
        &self,
        employee_id: u64,
        payload: CreateLeave,
    ) -> LeaveResult<LeaveRequestView> {
        let employee = self.accounting.resolve_employee(employee_id).await?;

        if payload.start_date > payload.end_date {
            info!("Validation failed: start_date after end_date");
            return Err(LeaveError::InvalidRange {
                start_date: payload.start_date,
                end_date: payload.end_date,
            });
        }

        if let Some(status) = payload
            .status
            .as_deref()
            .filter(|s| *s != LeaveStatus::Pending.as_ref())
        {
            debug!(status, "Ignoring caller supplied status");
        }

        let _guard = self.locks.acquire(employee_id).await;

        let stored = self
            .store
            .insert(NewLeaveRequest {
                employee_id,
                start_date: payload.start_date,
                end_date: payload.end_date,
                reason: payload.reason,
                manager_id: employee.manager_id,
            })
            .await?;

        info!(request_id = stored.id, days = stored.duration_days(), "Leave request submitted");
        Ok(stored.into())
    }

    #[instrument(name = "leave_approve", skip(self))]
    pub async fn approve(&self, request_id: u64) -> LeaveResult<LeaveRequestView> {
        let employee_id = self.find_request(request_id).await?.employee_id;
        let _guard = self.locks.acquire(employee_id).await;

        // status may have moved while waiting for the lock
        let request = self.find_request(request_id).await?;
        ensure_pending(&request)?;

        let taken = self.accounting.compute_taken_days(employee_id).await?;
        let requested = request.duration_days();
        let remaining = self.accounting.policy().remaining(taken);

        if remaining - requested < 0 {
            warn!(employee_id, taken, requested, remaining, "Insufficient leave balance");
            return Err(LeaveError::InsufficientBalance {
                requested,
                remaining,
            });
        }

        let approved = self.transition(&request, LeaveStatus::Approved).await?;
        info!(employee_id, remaining = remaining - requested, "Leave approved");
        Ok(approved.into())
    }

    #[instrument(name = "leave_deny", skip(self))]
    pub async fn deny(&self, request_id: u64) -> LeaveResult<LeaveRequestView> {
        let employee_id = self.find_request(request_id).await?.employee_id;
        let _guard = self.locks.acquire(employee_id).await;

        let request = self.find_request(request_id).await?;
        ensure_pending(&request)?;

        let denied = self.transition(&request, LeaveStatus::Denied).await?;
        info!(employee_id, "Leave denied");
        Ok(denied.into())
    }

    pub async fn list_by_employee(&self, employee_id: u64) -> LeaveResult<Vec<LeaveRequestView>> {
        self.accounting.resolve_employee(employee_id).await?;
        let requests = self.store.find_by_employee(employee_id).await?;
        Ok(requests.into_iter().map(Into::into).collect())
    }

    pub async fn list_all(&self) -> LeaveResult<Vec<LeaveRequestView>> {
        let requests = self.store.find_all().await?;
        Ok(requests.into_iter().map(Into::into).collect())
    }

    pub async fn summary(&self, employee_id: u64) -> LeaveResult<LeaveSummaryView> {
        Ok(self.accounting.compute_summary(employee_id).await?.into())
    }

    /// Leave requests of everyone reporting directly to `manager_id`.
    pub async fn list_for_manager(&self, manager_id: u64) -> LeaveResult<Vec<LeaveRequestView>> {
        self.accounting.resolve_employee(manager_id).await?;

        let report_ids: Vec<u64> = self
            .directory
            .find_by_manager(manager_id)
            .await?
            .iter()
            .map(|e| e.id)
            .collect();
        debug!(manager_id, reports = report_ids.len(), "Resolved direct reports");

        let requests = self.store.find_by_employees(&report_ids).await?;
        Ok(requests.into_iter().map(Into::into).collect())
    }

    async fn find_request(&self, request_id: u64) -> LeaveResult<LeaveRequest> {
        self.store
            .find_by_id(request_id)
            .await?
            .ok_or(LeaveError::LeaveRequestNotFound { request_id })
    }

    /// Conditional `PENDING -> to` write. A miss means the record changed
    /// underneath us (e.g. another process sharing the database).
    async fn transition(&self, request: &LeaveRequest, to: LeaveStatus) -> LeaveResult<LeaveRequest> {
        match self
            .store
            .update_status(request.id, LeaveStatus::Pending, to)
            .await?
        {
            Some(updated) => Ok(updated),
            None => {
                let current = self.find_request(request.id).await?;
                warn!(request_id = request.id, status = %current.status, "Lost status update race");
                Err(LeaveError::AlreadyProcessed {
                    request_id: current.id,
                    status: current.status,
                })
            }
        }
    }
}

fn ensure_pending(request: &LeaveRequest) -> LeaveResult<()> {
    if request.status.is_terminal() {
        return Err(LeaveError::AlreadyProcessed {
            request_id: request.id,
            status: request.status,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::Employee;
    use crate::store::{InMemoryDirectory, InMemoryLeaveStore};
    use chrono::{Duration, NaiveDate};

    const ALICE: u64 = 1;
    const BOB: u64 = 2;
    const MANAGER: u64 = 10;

    fn employee(id: u64, first: &str, last: &str, manager_id: Option<u64>) -> Employee {
        Employee {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@company.com", first.to_lowercase()),
            department_id: Some(3),
            manager_id,
        }
    }

    fn service() -> (LeaveService, Arc<InMemoryLeaveStore>) {
        let directory = Arc::new(InMemoryDirectory::with_employees([
            employee(MANAGER, "Maria", "Boss", None),
            employee(ALICE, "Alice", "Archer", Some(MANAGER)),
            employee(BOB, "Bob", "Baker", Some(MANAGER)),
            employee(3, "Carl", "Loner", None),
        ]));
        let store = Arc::new(InMemoryLeaveStore::new());
        let service = LeaveService::new(directory, store.clone(), LeavePolicy::default());
        (service, store)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    /// Request covering `days` calendar days starting at `start`.
    fn leave(start: NaiveDate, days: i64) -> CreateLeave {
        CreateLeave {
            start_date: start,
            end_date: start + Duration::days(days - 1),
            reason: format!("{days} day(s) off"),
            status: None,
        }
    }

    async fn approved(service: &LeaveService, employee_id: u64, payload: CreateLeave) -> u64 {
        let created = service.create(employee_id, payload).await.expect("create");
        service.approve(created.id).await.expect("approve").id
    }

    #[actix_web::test]
    async fn create_forces_pending_and_keeps_fields() {
        let (service, _) = service();
        let payload = CreateLeave {
            start_date: date(2024, 7, 1),
            end_date: date(2024, 7, 3),
            reason: "Beach".to_string(),
            status: Some("APPROVED".to_string()),
        };

        let created = service.create(ALICE, payload).await.expect("create");
        assert_eq!(created.status, LeaveStatus::Pending);
        assert_eq!(created.manager_id, Some(MANAGER));

        let listed = service.list_by_employee(ALICE).await.expect("list");
        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(listed[0].start_date, date(2024, 7, 1));
        assert_eq!(listed[0].end_date, date(2024, 7, 3));
        assert_eq!(listed[0].reason, "Beach");
    }

    #[actix_web::test]
    async fn create_rejects_unknown_employee_and_inverted_range() {
        let (service, store) = service();

        let err = service
            .create(99, leave(date(2024, 1, 1), 1))
            .await
            .expect_err("unknown employee");
        assert!(matches!(err, LeaveError::EmployeeNotFound { employee_id: 99 }));

        let inverted = CreateLeave {
            start_date: date(2024, 1, 5),
            end_date: date(2024, 1, 1),
            reason: "backwards".to_string(),
            status: None,
        };
        let err = service.create(ALICE, inverted).await.expect_err("inverted");
        assert!(matches!(err, LeaveError::InvalidRange { .. }));

        assert!(store.find_all().await.expect("all").is_empty());
    }

    #[actix_web::test]
    async fn approved_request_reduces_balance() {
        let (service, _) = service();
        approved(&service, ALICE, leave(date(2024, 1, 1), 5)).await;

        assert_eq!(service.accounting().compute_taken_days(ALICE).await.expect("taken"), 5);
        let summary = service.summary(ALICE).await.expect("summary");
        assert_eq!(summary.employee_name, "Alice Archer");
        assert_eq!(summary.taken_leaves, 5);
        assert_eq!(summary.remaining_leaves, 22);
    }

    #[actix_web::test]
    async fn summary_is_stable_between_mutations() {
        let (service, _) = service();
        approved(&service, ALICE, leave(date(2024, 2, 1), 3)).await;

        let first = service.summary(ALICE).await.expect("summary");
        let second = service.summary(ALICE).await.expect("summary");
        assert_eq!(first, second);
    }

    #[actix_web::test]
    async fn denial_does_not_consume_allowance() {
        let (service, _) = service();
        let created = service
            .create(ALICE, leave(date(2024, 3, 1), 10))
            .await
            .expect("create");

        let denied = service.deny(created.id).await.expect("deny");
        assert_eq!(denied.status, LeaveStatus::Denied);
        assert_eq!(service.accounting().compute_taken_days(ALICE).await.expect("taken"), 0);
    }

    #[actix_web::test]
    async fn approval_fails_once_allowance_is_used_up() {
        let (service, store) = service();
        approved(&service, ALICE, leave(date(2024, 1, 1), 20)).await;
        approved(&service, ALICE, leave(date(2024, 3, 1), 7)).await;

        let extra = service
            .create(ALICE, leave(date(2024, 6, 1), 1))
            .await
            .expect("create");
        let err = service.approve(extra.id).await.expect_err("no balance");
        assert!(matches!(
            err,
            LeaveError::InsufficientBalance {
                requested: 1,
                remaining: 0
            }
        ));

        let stored = store.find_by_id(extra.id).await.expect("find").expect("exists");
        assert_eq!(stored.status, LeaveStatus::Pending);
        assert_eq!(service.summary(ALICE).await.expect("summary").remaining_leaves, 0);
    }

    #[actix_web::test]
    async fn approval_may_use_the_last_day() {
        let (service, _) = service();
        approved(&service, ALICE, leave(date(2024, 1, 1), 26)).await;

        let last = service
            .create(ALICE, leave(date(2024, 9, 2), 1))
            .await
            .expect("create");
        let view = service.approve(last.id).await.expect("approve");
        assert_eq!(view.status, LeaveStatus::Approved);
        assert_eq!(service.summary(ALICE).await.expect("summary").remaining_leaves, 0);
    }

    #[actix_web::test]
    async fn approval_that_would_overdraw_is_rejected() {
        let (service, _) = service();
        approved(&service, ALICE, leave(date(2024, 1, 1), 25)).await;

        let long = service
            .create(ALICE, leave(date(2024, 5, 1), 5))
            .await
            .expect("create");
        let err = service.approve(long.id).await.expect_err("overdraw");
        assert!(matches!(
            err,
            LeaveError::InsufficientBalance {
                requested: 5,
                remaining: 2
            }
        ));
    }

    #[actix_web::test]
    async fn balances_are_tracked_per_employee() {
        let (service, _) = service();
        approved(&service, ALICE, leave(date(2024, 1, 1), 27)).await;

        approved(&service, BOB, leave(date(2024, 1, 1), 10)).await;
        assert_eq!(service.summary(BOB).await.expect("summary").remaining_leaves, 17);
    }

    #[actix_web::test]
    async fn terminal_states_are_final() {
        let (service, _) = service();
        let denied = service
            .create(ALICE, leave(date(2024, 4, 1), 2))
            .await
            .expect("create");
        service.deny(denied.id).await.expect("deny");

        let err = service.approve(denied.id).await.expect_err("already denied");
        assert!(matches!(
            err,
            LeaveError::AlreadyProcessed {
                status: LeaveStatus::Denied,
                ..
            }
        ));

        let approved_id = approved(&service, ALICE, leave(date(2024, 5, 1), 2)).await;
        let err = service.deny(approved_id).await.expect_err("already approved");
        assert!(matches!(
            err,
            LeaveError::AlreadyProcessed {
                status: LeaveStatus::Approved,
                ..
            }
        ));
        let err = service.approve(approved_id).await.expect_err("already approved");
        assert!(matches!(err, LeaveError::AlreadyProcessed { .. }));

        assert_eq!(service.summary(ALICE).await.expect("summary").taken_leaves, 2);
    }

    #[actix_web::test]
    async fn unknown_request_is_not_found() {
        let (service, _) = service();
        assert!(service.approve(404).await.expect_err("missing").is_not_found());
        assert!(service.deny(404).await.expect_err("missing").is_not_found());
        assert!(service.list_by_employee(404).await.expect_err("missing").is_not_found());
    }

    #[actix_web::test]
    async fn concurrent_approvals_never_overdraw() {
        let (service, _) = service();
        let first = service
            .create(ALICE, leave(date(2024, 1, 1), 15))
            .await
            .expect("create");
        let second = service
            .create(ALICE, leave(date(2024, 2, 1), 15))
            .await
            .expect("create");

        let (a, b) = futures::join!(service.approve(first.id), service.approve(second.id));
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);

        let summary = service.summary(ALICE).await.expect("summary");
        assert_eq!(summary.taken_leaves, 15);
        assert_eq!(summary.remaining_leaves, 12);
    }

    #[actix_web::test]
    async fn list_all_returns_every_request_in_insertion_order() {
        let (service, _) = service();
        let a = service.create(ALICE, leave(date(2024, 1, 1), 1)).await.expect("create");
        let b = service.create(BOB, leave(date(2024, 1, 2), 1)).await.expect("create");
        let c = service.create(ALICE, leave(date(2024, 1, 3), 1)).await.expect("create");

        let ids: Vec<u64> = service
            .list_all()
            .await
            .expect("list")
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[actix_web::test]
    async fn manager_sees_direct_reports_only() {
        let (service, _) = service();
        let a = service.create(ALICE, leave(date(2024, 1, 1), 1)).await.expect("create");
        service.create(3, leave(date(2024, 1, 1), 1)).await.expect("create");
        let b = service.create(BOB, leave(date(2024, 1, 1), 1)).await.expect("create");

        let ids: Vec<u64> = service
            .list_for_manager(MANAGER)
            .await
            .expect("list")
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id]);

        assert!(service.list_for_manager(ALICE).await.expect("list").is_empty());
        assert!(service.list_for_manager(77).await.expect_err("missing").is_not_found());
    }
}
