pub mod leave_request;
