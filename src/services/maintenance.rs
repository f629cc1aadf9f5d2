//! Maintenance log service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        maintenance::{CreateMaintenanceLog, MaintenanceLog, MaintenanceLogDetails, UpdateMaintenanceLog},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
}

impl MaintenanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn ensure_equipment(&self, equipment_id: i32) -> AppResult<()> {
        if !self.repository.equipment.exists(equipment_id).await? {
            return Err(AppError::NotFound(format!("Equipment {} not found", equipment_id)));
        }
        Ok(())
    }

    pub async fn list_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<MaintenanceLog>> {
        self.ensure_equipment(equipment_id).await?;
        self.repository.maintenance.list_for_equipment(equipment_id).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<MaintenanceLogDetails>> {
        self.repository.maintenance.list_all().await
    }

    pub async fn create(
        &self,
        equipment_id: i32,
        performed_by: i32,
        data: &CreateMaintenanceLog,
    ) -> AppResult<MaintenanceLog> {
        self.ensure_equipment(equipment_id).await?;
        let date = data.date.unwrap_or_else(|| Utc::now().date_naive());
        let log = self
            .repository
            .maintenance
            .create(
                equipment_id,
                performed_by,
                data.maintenance_type,
                data.description.as_deref(),
                date,
            )
            .await?;
        tracing::info!(log_id = log.id, equipment_id, performed_by, "maintenance logged");
        Ok(log)
    }

    /// Only the author of a log entry, or an admin, may change it
    async fn ensure_can_edit(&self, id: i32, claims: &UserClaims) -> AppResult<()> {
        let log = self.repository.maintenance.get_by_id(id).await?;
        if claims.is_admin() || log.performed_by == Some(claims.user_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only the author or an administrator can modify this log".to_string(),
            ))
        }
    }

    pub async fn update(
        &self,
        id: i32,
        claims: &UserClaims,
        data: &UpdateMaintenanceLog,
    ) -> AppResult<MaintenanceLog> {
        self.ensure_can_edit(id, claims).await?;
        self.repository.maintenance.update(id, data).await
    }

    pub async fn delete(&self, id: i32, claims: &UserClaims) -> AppResult<()> {
        self.ensure_can_edit(id, claims).await?;
        self.repository.maintenance.delete(id).await
    }
}
