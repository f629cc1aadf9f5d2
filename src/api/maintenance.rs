//! Maintenance log endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::maintenance::{CreateMaintenanceLog, MaintenanceLog, MaintenanceLogDetails, UpdateMaintenanceLog},
};

use super::{can, Authorized};

/// Maintenance history of one equipment, most recent first
#[utoipa::path(
    get,
    path = "/equipment/{id}/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Maintenance history", body = Vec<MaintenanceLog>),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_equipment_logs(
    State(state): State<crate::AppState>,
    _: Authorized<can::ReadEquipment>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<Vec<MaintenanceLog>>> {
    let logs = state.services.maintenance.list_for_equipment(id).await?;
    Ok(Json(logs))
}

/// Log maintenance on an equipment
#[utoipa::path(
    post,
    path = "/equipment/{id}/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = CreateMaintenanceLog,
    responses(
        (status = 201, description = "Log entry created", body = MaintenanceLog),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_log(
    State(state): State<crate::AppState>,
    Authorized(claims, _): Authorized<can::LogMaintenance>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(data), _): WithRejection<Json<CreateMaintenanceLog>, AppError>,
) -> AppResult<(StatusCode, Json<MaintenanceLog>)> {
    let log = state.services.maintenance.create(id, claims.user_id, &data).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// All maintenance logs with equipment and performer names
#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Maintenance logs", body = Vec<MaintenanceLogDetails>)
    )
)]
pub async fn list_logs(
    State(state): State<crate::AppState>,
    _: Authorized<can::ReadEquipment>,
) -> AppResult<Json<Vec<MaintenanceLogDetails>>> {
    let logs = state.services.maintenance.list_all().await?;
    Ok(Json(logs))
}

/// Edit a log entry (author or admin)
#[utoipa::path(
    put,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Log entry ID")),
    request_body = UpdateMaintenanceLog,
    responses(
        (status = 200, description = "Log entry updated", body = MaintenanceLog),
        (status = 403, description = "Not the author", body = crate::error::ErrorResponse),
        (status = 404, description = "Log entry not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_log(
    State(state): State<crate::AppState>,
    Authorized(claims, _): Authorized<can::LogMaintenance>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(data), _): WithRejection<Json<UpdateMaintenanceLog>, AppError>,
) -> AppResult<Json<MaintenanceLog>> {
    let log = state.services.maintenance.update(id, &claims, &data).await?;
    Ok(Json(log))
}

/// Delete a log entry (author or admin)
#[utoipa::path(
    delete,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Log entry ID")),
    responses(
        (status = 204, description = "Log entry deleted"),
        (status = 403, description = "Not the author", body = crate::error::ErrorResponse),
        (status = 404, description = "Log entry not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_log(
    State(state): State<crate::AppState>,
    Authorized(claims, _): Authorized<can::LogMaintenance>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<StatusCode> {
    state.services.maintenance.delete(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
