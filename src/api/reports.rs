//! Activity report endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::report::{Report, ReportQuery},
};

use super::{can, Authorized};

/// Unified activity feed, most recent first
#[utoipa::path(
    get,
    path = "/reports",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Activity feed", body = Vec<Report>)
    )
)]
pub async fn list_reports(
    State(state): State<crate::AppState>,
    _: Authorized<can::ViewReports>,
) -> AppResult<Json<Vec<Report>>> {
    let reports = state.services.reports.list().await?;
    Ok(Json(reports))
}

/// Activity feed restricted to a date range and/or an activity type
#[utoipa::path(
    get,
    path = "/reports/filter",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Filtered activity feed", body = Vec<Report>),
        (status = 400, description = "Invalid date or type", body = crate::error::ErrorResponse)
    )
)]
pub async fn filter_reports(
    State(state): State<crate::AppState>,
    _: Authorized<can::ViewReports>,
    WithRejection(Query(query), _): WithRejection<Query<ReportQuery>, AppError>,
) -> AppResult<Json<Vec<Report>>> {
    let reports = state.services.reports.filter(&query).await?;
    Ok(Json(reports))
}
