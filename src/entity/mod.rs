pub mod audit_logs;
pub mod orders;
pub mod users;
