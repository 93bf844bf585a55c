pub mod accounting;
pub mod lifecycle;
pub mod locks;
pub mod view;

pub use accounting::{DEFAULT_ANNUAL_LEAVE_DAYS, LeaveAccounting, LeavePolicy};
pub use lifecycle::LeaveService;
pub use view::{CreateLeave, LeaveRequestView, LeaveSummaryView};
