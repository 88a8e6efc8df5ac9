//! Role-guarded operations for the dashboard layer.
//!
//! Each function checks the [`Actor`](crate::auth::Actor) first and returns
//! `AccessDenied` before touching the store.

pub mod attendance;
pub mod dashboard;
pub mod notifications;
pub mod payroll;
pub mod procurement;
pub mod reports;
pub mod timetable;
