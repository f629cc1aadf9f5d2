//! Equipment requests and their approval lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::equipment::Equipment;
use crate::error::{AppError, AppResult};

/// Request priority. Declaration order matches the database enum, so
/// `ORDER BY priority DESC` ranks Urgent first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "request_priority")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Request status: `Pending -> Approved | Rejected`, both terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "request_status")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Check that a decision may move a request from `self` to `target`
    pub fn check_transition(&self, target: RequestStatus) -> AppResult<()> {
        if !target.is_terminal() {
            return Err(AppError::Validation("Invalid status".to_string()));
        }
        if self.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Request has already been {}",
                self.as_str().to_lowercase()
            )));
        }
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }
}

/// Request row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Request {
    pub id: i32,
    /// Existing equipment, or the equipment created on approval
    pub equipment_id: Option<i32>,
    pub is_new_equipment: bool,
    pub new_equipment_name: Option<String>,
    pub new_equipment_description: Option<String>,
    pub subject: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: RequestStatus,
    pub requested_by: Option<i32>,
    pub approved_by: Option<i32>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request joined with equipment and user names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestDetails {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub request: Request,
    pub equipment_name: Option<String>,
    pub requested_by_name: Option<String>,
    pub approved_by_name: Option<String>,
    /// Proposed name for new equipment, otherwise the equipment name
    pub display_name: Option<String>,
}

/// Pending request summary for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PendingRequest {
    pub id: i32,
    pub subject: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub equipment_name: Option<String>,
    pub requested_by_name: Option<String>,
}

/// Request listing filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct RequestQuery {
    pub status: Option<RequestStatus>,
    pub priority: Option<Priority>,
}

/// Create request payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequest {
    pub equipment_id: Option<i32>,
    #[serde(default)]
    pub is_new_equipment: bool,
    pub new_equipment_name: Option<String>,
    pub new_equipment_description: Option<String>,
    pub subject: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
}

/// Validated request, ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewRequest {
    pub equipment_id: Option<i32>,
    pub is_new_equipment: bool,
    pub new_equipment_name: Option<String>,
    pub new_equipment_description: Option<String>,
    pub subject: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub requested_by: i32,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CreateRequest {
    /// Validate the payload. New-equipment requests never carry an
    /// `equipment_id`; the others must reference one.
    pub fn validate(self, requested_by: i32) -> AppResult<NewRequest> {
        let subject = self.subject.trim().to_string();
        if subject.is_empty() {
            return Err(AppError::Validation("Subject is required".to_string()));
        }

        let (equipment_id, new_name, new_description) = if self.is_new_equipment {
            match (
                non_blank(self.new_equipment_name),
                non_blank(self.new_equipment_description),
            ) {
                (Some(name), Some(description)) => (None, Some(name), Some(description)),
                _ => {
                    return Err(AppError::Validation(
                        "New equipment name and description are required".to_string(),
                    ))
                }
            }
        } else {
            let id = self
                .equipment_id
                .ok_or_else(|| AppError::Validation("Equipment selection is required".to_string()))?;
            (Some(id), None, None)
        };

        Ok(NewRequest {
            equipment_id,
            is_new_equipment: self.is_new_equipment,
            new_equipment_name: new_name,
            new_equipment_description: new_description,
            subject,
            description: self.description,
            priority: self.priority.unwrap_or_default(),
            requested_by,
        })
    }
}

/// Status change payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequestStatus {
    pub status: RequestStatus,
}

/// Result of approving or rejecting a request
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DecisionOutcome {
    pub request: Request,
    /// Equipment created by approving a new-equipment request
    pub equipment: Option<Equipment>,
}
