//! Request ledger endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::request::{
        CreateRequest, DecisionOutcome, PendingRequest, Request, RequestDetails, RequestQuery, UpdateRequestStatus,
    },
};

use super::{can, Authorized};

/// List requests, newest first
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(RequestQuery),
    responses(
        (status = 200, description = "Requests", body = Vec<RequestDetails>)
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    _: Authorized<can::ReadRequests>,
    WithRejection(Query(query), _): WithRejection<Query<RequestQuery>, AppError>,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state.services.requests.list(&query).await?;
    Ok(Json(requests))
}

/// Pending requests for the dashboard, highest priority first
#[utoipa::path(
    get,
    path = "/requests/dashboard/pending",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pending requests by priority", body = Vec<PendingRequest>)
    )
)]
pub async fn pending_requests(
    State(state): State<crate::AppState>,
    _: Authorized<can::ReadRequests>,
) -> AppResult<Json<Vec<PendingRequest>>> {
    let pending = state.services.requests.pending_summary().await?;
    Ok(Json(pending))
}

/// Get a request by ID
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = RequestDetails),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    _: Authorized<can::ReadRequests>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<RequestDetails>> {
    let request = state.services.requests.get_by_id(id).await?;
    Ok(Json(request))
}

/// Submit a request for existing or new equipment
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = Request),
        (status = 400, description = "Invalid payload", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    Authorized(claims, _): Authorized<can::CreateRequest>,
    WithRejection(Json(data), _): WithRejection<Json<CreateRequest>, AppError>,
) -> AppResult<(StatusCode, Json<Request>)> {
    let request = state.services.requests.create(data, claims.user_id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Approve or reject a pending request.
///
/// Approving a new-equipment request registers the equipment in the same
/// transaction and links it to the request.
#[utoipa::path(
    patch,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateRequestStatus,
    responses(
        (status = 200, description = "Request decided", body = DecisionOutcome),
        (status = 400, description = "Invalid status", body = crate::error::ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Request already decided", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_request_status(
    State(state): State<crate::AppState>,
    Authorized(claims, _): Authorized<can::DecideRequest>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(data), _): WithRejection<Json<UpdateRequestStatus>, AppError>,
) -> AppResult<Json<DecisionOutcome>> {
    let outcome = state.services.requests.decide(id, data.status, claims.user_id).await?;
    Ok(Json(outcome))
}
