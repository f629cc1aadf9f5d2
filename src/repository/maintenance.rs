//! Maintenance logs repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::maintenance::{MaintenanceLog, MaintenanceLogDetails, MaintenanceType, UpdateMaintenanceLog},
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Logs for one equipment, most recent first
    pub async fn list_for_equipment(&self, equipment_id: i32) -> AppResult<Vec<MaintenanceLog>> {
        let rows = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            SELECT * FROM maintenance_logs
            WHERE equipment_id = $1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// All logs with equipment and performer names
    pub async fn list_all(&self) -> AppResult<Vec<MaintenanceLogDetails>> {
        let rows = sqlx::query_as::<_, MaintenanceLogDetails>(
            r#"
            SELECT m.*, e.name AS equipment_name, u.name AS performed_by_name
            FROM maintenance_logs m
            JOIN equipment e ON m.equipment_id = e.id
            LEFT JOIN users u ON m.performed_by = u.id
            ORDER BY m.date DESC, m.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceLog> {
        sqlx::query_as::<_, MaintenanceLog>("SELECT * FROM maintenance_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance log {} not found", id)))
    }

    /// Append a log entry
    pub async fn create(
        &self,
        equipment_id: i32,
        performed_by: i32,
        maintenance_type: MaintenanceType,
        description: Option<&str>,
        date: NaiveDate,
    ) -> AppResult<MaintenanceLog> {
        sqlx::query_as::<_, MaintenanceLog>(
            r#"
            INSERT INTO maintenance_logs (equipment_id, performed_by, maintenance_type, description, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(equipment_id)
        .bind(performed_by)
        .bind(maintenance_type)
        .bind(description)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Duplicate maintenance log"))
    }

    /// Edit a log entry, keeping omitted values
    pub async fn update(&self, id: i32, data: &UpdateMaintenanceLog) -> AppResult<MaintenanceLog> {
        sqlx::query_as::<_, MaintenanceLog>(
            r#"
            UPDATE maintenance_logs
            SET maintenance_type = COALESCE($1, maintenance_type),
                description = COALESCE($2, description),
                date = COALESCE($3, date)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(data.maintenance_type)
        .bind(data.description.as_deref())
        .bind(data.date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance log {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance_logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance log {} not found", id)));
        }
        Ok(())
    }
}
