pub mod attendance;
pub mod notification;
pub mod performance;
pub mod period;
pub mod procurement;
pub mod role;
pub mod salary;
pub mod staff;
pub mod timetable;

pub use attendance::{AttendanceRecord, AttendanceStatus, CheckInMethod, NewAttendance};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use performance::{NewPerformance, PerformanceRecord};
pub use period::Period;
pub use procurement::{CreateProcurement, ProcurementRequest, ProcurementStatus};
pub use role::Role;
pub use salary::{NewSalary, SalaryRecord, SalaryTotals};
pub use staff::{NewStaff, StaffId, StaffMember};
pub use timetable::{NewTimetableEntry, TimetableEntry};
