//! Data models for EMS

pub mod equipment;
pub mod maintenance;
pub mod report;
pub mod request;
pub mod user;

// Re-export commonly used types
pub use equipment::{Equipment, EquipmentStatus};
pub use maintenance::{MaintenanceLog, MaintenanceType};
pub use report::{Report, ReportType};
pub use request::{Priority, Request, RequestStatus};
pub use user::{Permission, Role, User, UserClaims, UserInfo};
