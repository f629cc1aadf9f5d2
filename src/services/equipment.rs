//! Equipment service

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentDetails, EquipmentStats, UpdateEquipment},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<EquipmentDetails>> {
        self.repository.equipment.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<EquipmentDetails> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn stats(&self) -> AppResult<EquipmentStats> {
        self.repository.equipment.stats().await
    }

    pub async fn create(&self, data: &CreateEquipment, added_by: i32) -> AppResult<Equipment> {
        if data.name.trim().is_empty() {
            return Err(AppError::Validation("Equipment name is required".to_string()));
        }
        let equipment = self.repository.equipment.create(data, added_by).await?;
        tracing::info!(equipment_id = equipment.id, added_by, "equipment created");
        Ok(equipment)
    }

    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        if matches!(data.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(AppError::Validation("Equipment name cannot be empty".to_string()));
        }
        self.repository.equipment.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipment.delete(id).await?;
        tracing::info!(equipment_id = id, "equipment deleted");
        Ok(())
    }
}
