use crate::leave::{CreateLeave, LeaveService};
use actix_web::{HttpResponse, Responder, web};

/* =========================
Create leave request
========================= */
/// Submit a leave request for an employee. It always starts out PENDING.
#[utoipa::path(
    post,
    path = "/api/employees/{employee_id}/leaves",
    params(
        ("employee_id" = u64, Path, description = "Employee the leave is requested for")
    ),
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = crate::leave::LeaveRequestView),
        (status = 400, description = "start_date after end_date", body = Object, example = json!({
            "message": "start_date 2026-01-05 cannot be after end_date 2026-01-01"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found with id: 1000"
        }))
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    service: web::Data<LeaveService>,
    path: web::Path<u64>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let created = service.create(employee_id, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(created))
}

/* =========================
Approve leave
========================= */
#[utoipa::path(
    put,
    path = "/api/employees/leaves/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = crate::leave::LeaveRequestView),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found with id: 1"
        })),
        (status = 409, description = "Leave request already processed", body = Object, example = json!({
            "message": "Leave request 1 is already DENIED"
        })),
        (status = 422, description = "Not enough leave balance left", body = Object, example = json!({
            "message": "Insufficient leave balance: 3 day(s) requested, 1 remaining"
        }))
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    service: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let approved = service.approve(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(approved))
}

/* =========================
Deny leave
========================= */
#[utoipa::path(
    put,
    path = "/api/employees/leaves/{leave_id}/deny",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to deny")
    ),
    responses(
        (status = 200, description = "Leave denied", body = crate::leave::LeaveRequestView),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found with id: 1"
        })),
        (status = 409, description = "Leave request already processed", body = Object, example = json!({
            "message": "Leave request 1 is already APPROVED"
        }))
    ),
    tag = "Leave"
)]
pub async fn deny_leave(
    service: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let denied = service.deny(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(denied))
}

/// All leave requests of one employee, oldest first
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}/leaves",
    params(
        ("employee_id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Leave requests of the employee", body = [crate::leave::LeaveRequestView]),
        (status = 404, description = "Employee not found")
    ),
    tag = "Leave"
)]
pub async fn employee_leaves(
    service: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leaves = service.list_by_employee(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(leaves))
}

/// for getting every leave application in the system
#[utoipa::path(
    get,
    path = "/api/employees/leaves",
    responses(
        (status = 200, description = "All leave requests", body = [crate::leave::LeaveRequestView])
    ),
    tag = "Leave"
)]
pub async fn leave_list(service: web::Data<LeaveService>) -> actix_web::Result<impl Responder> {
    let leaves = service.list_all().await?;
    Ok(HttpResponse::Ok().json(leaves))
}

#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}/leave-summary",
    params(
        ("employee_id" = u64, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Allowance, taken and remaining days", body = crate::leave::LeaveSummaryView),
        (status = 404, description = "Employee not found")
    ),
    tag = "Leave"
)]
pub async fn leave_summary(
    service: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let summary = service.summary(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Leave requests of a manager's direct reports
#[utoipa::path(
    get,
    path = "/api/managers/{manager_id}/leaves",
    params(
        ("manager_id" = u64, Path, description = "Employee ID of the manager")
    ),
    responses(
        (status = 200, description = "Leave requests of the direct reports", body = [crate::leave::LeaveRequestView]),
        (status = 404, description = "Manager not found")
    ),
    tag = "Leave"
)]
pub async fn team_leaves(
    service: web::Data<LeaveService>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leaves = service.list_for_manager(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(leaves))
}
