use crate::leave::{CreateLeave, LeaveRequestView, LeaveSummaryView};
use crate::model::employee::Employee;
use crate::model::leave_request::LeaveStatus;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Leave API",
        version = "1.0.0",
        description = r#"
## Leave Management

Employees file leave requests; a reviewer approves or denies each request exactly once.

### 🔹 Key Features
- **Leave requests**
  - Submit, approve and deny leave, list leave per employee or for the whole organisation
- **Leave balance**
  - Annual allowance, days taken and days remaining per employee
- **Team view**
  - Leave requests of a manager's direct reports

### 📦 Response Format
- JSON-based RESTful responses
- Errors carry a `message` field

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::deny_leave,
        crate::api::leave_request::employee_leaves,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::leave_summary,
        crate::api::leave_request::team_leaves
    ),
    components(
        schemas(
            CreateLeave,
            LeaveRequestView,
            LeaveSummaryView,
            LeaveStatus,
            Employee
        )
    ),
    tags(
        (name = "Leave", description = "Leave management APIs"),
    )
)]
pub struct ApiDoc;
