//! Maintenance log model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Kind of service performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "maintenance_type")]
pub enum MaintenanceType {
    Routine,
    Repair,
    Inspection,
}

/// Maintenance log entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceLog {
    pub id: i32,
    pub equipment_id: i32,
    pub performed_by: Option<i32>,
    pub maintenance_type: MaintenanceType,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Log entry joined with equipment and performer names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceLogDetails {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub log: MaintenanceLog,
    pub equipment_name: String,
    pub performed_by_name: Option<String>,
}

/// Add a log entry to an equipment
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMaintenanceLog {
    pub maintenance_type: MaintenanceType,
    pub description: Option<String>,
    /// Defaults to today (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
}

/// Edit a log entry; omitted fields keep their value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMaintenanceLog {
    pub maintenance_type: Option<MaintenanceType>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}
