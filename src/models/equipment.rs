//! Equipment model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Equipment lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "equipment_status")]
pub enum EquipmentStatus {
    #[default]
    Operational,
    Maintenance,
    Retired,
}

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: EquipmentStatus,
    pub location: Option<String>,
    pub last_maintained: Option<NaiveDate>,
    /// User who registered the equipment
    pub added_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Equipment with the registering user's name, for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentDetails {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub equipment: Equipment,
    pub added_by_name: Option<String>,
}

/// Create equipment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEquipment {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to Operational
    pub status: Option<EquipmentStatus>,
    pub location: Option<String>,
    pub last_maintained: Option<NaiveDate>,
}

/// Update equipment request; omitted fields keep their value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEquipment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<EquipmentStatus>,
    pub location: Option<String>,
    pub last_maintained: Option<NaiveDate>,
}

/// Dashboard counters
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EquipmentStats {
    /// Operational equipment
    pub available: i64,
    pub maintenance: i64,
    pub retired: i64,
    /// Pending requests
    pub pending: i64,
}
