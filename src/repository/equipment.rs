//! Equipment repository

use chrono::NaiveDate;
use sqlx::{Executor, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::equipment::{
        CreateEquipment, Equipment, EquipmentDetails, EquipmentStats, EquipmentStatus, UpdateEquipment,
    },
};

pub(crate) const DUPLICATE_NAME: &str = "Equipment with this name already exists";

const SELECT_DETAILS: &str = r#"
    SELECT e.*, u.name AS added_by_name
    FROM equipment e
    LEFT JOIN users u ON e.added_by = u.id
"#;

/// Column values for a new equipment row
pub(crate) struct NewEquipment<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub status: EquipmentStatus,
    pub location: Option<&'a str>,
    pub last_maintained: Option<NaiveDate>,
    pub added_by: i32,
}

/// Insert an equipment row on any executor (pool or open transaction)
pub(crate) async fn insert<'c, E>(executor: E, data: &NewEquipment<'_>) -> AppResult<Equipment>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as::<_, Equipment>(
        r#"
        INSERT INTO equipment (name, description, status, location, last_maintained, added_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.status)
    .bind(data.location)
    .bind(data.last_maintained)
    .bind(data.added_by)
    .fetch_one(executor)
    .await
    .map_err(|e| AppError::from_constraint(e, DUPLICATE_NAME))
}

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all equipment, newest first
    pub async fn list(&self) -> AppResult<Vec<EquipmentDetails>> {
        let query = format!("{} ORDER BY e.created_at DESC, e.id DESC", SELECT_DETAILS);
        let rows = sqlx::query_as::<_, EquipmentDetails>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<EquipmentDetails> {
        let query = format!("{} WHERE e.id = $1", SELECT_DETAILS);
        sqlx::query_as::<_, EquipmentDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM equipment WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create equipment
    pub async fn create(&self, data: &CreateEquipment, added_by: i32) -> AppResult<Equipment> {
        insert(
            &self.pool,
            &NewEquipment {
                name: data.name.trim(),
                description: data.description.as_deref(),
                status: data.status.unwrap_or_default(),
                location: data.location.as_deref(),
                last_maintained: data.last_maintained,
                added_by,
            },
        )
        .await
    }

    /// Update equipment, keeping the current value of every omitted field
    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                status = COALESCE($3, status),
                location = COALESCE($4, location),
                last_maintained = COALESCE($5, last_maintained),
                updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(data.name.as_deref().map(str::trim))
        .bind(data.description.as_deref())
        .bind(data.status)
        .bind(data.location.as_deref())
        .bind(data.last_maintained)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, DUPLICATE_NAME))?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Delete equipment
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Status counters plus the number of pending requests
    pub async fn stats(&self) -> AppResult<EquipmentStats> {
        let stats = sqlx::query_as::<_, EquipmentStats>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'Operational') AS available,
                COUNT(*) FILTER (WHERE status = 'Maintenance') AS maintenance,
                COUNT(*) FILTER (WHERE status = 'Retired') AS retired,
                (SELECT COUNT(*) FROM requests WHERE status = 'Pending') AS pending
            FROM equipment
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
