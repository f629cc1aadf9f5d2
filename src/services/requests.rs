//! Request ledger service

use crate::{
    error::{AppError, AppResult},
    models::request::{
        CreateRequest, DecisionOutcome, PendingRequest, Request, RequestDetails, RequestQuery, RequestStatus,
    },
    repository::Repository,
};

/// Size of the dashboard's pending list
pub const PENDING_SUMMARY_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &RequestQuery) -> AppResult<Vec<RequestDetails>> {
        self.repository.requests.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<RequestDetails> {
        self.repository.requests.get_by_id(id).await
    }

    pub async fn pending_summary(&self) -> AppResult<Vec<PendingRequest>> {
        self.repository.requests.pending(PENDING_SUMMARY_LIMIT).await
    }

    pub async fn create(&self, data: CreateRequest, requested_by: i32) -> AppResult<Request> {
        let new = data.validate(requested_by)?;
        if let Some(equipment_id) = new.equipment_id {
            if !self.repository.equipment.exists(equipment_id).await? {
                return Err(AppError::NotFound(format!("Equipment {} not found", equipment_id)));
            }
        }
        let request = self.repository.requests.create(&new).await?;
        tracing::info!(
            request_id = request.id,
            requested_by,
            is_new_equipment = request.is_new_equipment,
            "request created"
        );
        Ok(request)
    }

    /// Approve or reject a pending request
    pub async fn decide(&self, id: i32, target: RequestStatus, decided_by: i32) -> AppResult<DecisionOutcome> {
        if !target.is_terminal() {
            return Err(AppError::Validation("Invalid status".to_string()));
        }
        let outcome = self.repository.requests.decide(id, target, decided_by).await?;
        tracing::info!(
            request_id = id,
            status = target.as_str(),
            decided_by,
            equipment_id = ?outcome.equipment.as_ref().map(|e| e.id),
            "request decided"
        );
        Ok(outcome)
    }
}
