//! Requests repository, including the approval transaction

use sqlx::{Pool, Postgres};

use super::equipment::{self, NewEquipment};
use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::EquipmentStatus,
        request::{DecisionOutcome, NewRequest, PendingRequest, Request, RequestDetails, RequestQuery, RequestStatus},
    },
};

const SELECT_DETAILS: &str = r#"
    SELECT
        r.*,
        e.name AS equipment_name,
        u1.name AS requested_by_name,
        u2.name AS approved_by_name,
        CASE WHEN r.is_new_equipment THEN r.new_equipment_name ELSE e.name END AS display_name
    FROM requests r
    LEFT JOIN equipment e ON r.equipment_id = e.id
    LEFT JOIN users u1 ON r.requested_by = u1.id
    LEFT JOIN users u2 ON r.approved_by = u2.id
"#;

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List requests, newest first, with optional status and priority filters
    pub async fn list(&self, query: &RequestQuery) -> AppResult<Vec<RequestDetails>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("r.status = ${}", idx));
            idx += 1;
        }
        if query.priority.is_some() {
            conditions.push(format!("r.priority = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_q = format!(
            "{} {} ORDER BY r.created_at DESC, r.id DESC",
            SELECT_DETAILS, where_clause
        );
        let mut builder = sqlx::query_as::<_, RequestDetails>(&select_q);
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }
        if let Some(priority) = query.priority {
            builder = builder.bind(priority);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<RequestDetails> {
        let query = format!("{} WHERE r.id = $1", SELECT_DETAILS);
        sqlx::query_as::<_, RequestDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
    }

    /// Pending requests, most urgent then most recent first
    pub async fn pending(&self, limit: i64) -> AppResult<Vec<PendingRequest>> {
        let rows = sqlx::query_as::<_, PendingRequest>(
            r#"
            SELECT
                r.id,
                r.subject,
                r.priority,
                r.created_at,
                CASE WHEN r.is_new_equipment THEN r.new_equipment_name ELSE e.name END AS equipment_name,
                u.name AS requested_by_name
            FROM requests r
            LEFT JOIN equipment e ON r.equipment_id = e.id
            LEFT JOIN users u ON r.requested_by = u.id
            WHERE r.status = 'Pending'
            ORDER BY r.priority DESC, r.created_at DESC, r.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert a validated request
    pub async fn create(&self, data: &NewRequest) -> AppResult<Request> {
        sqlx::query_as::<_, Request>(
            r#"
            INSERT INTO requests (
                equipment_id, requested_by, is_new_equipment,
                new_equipment_name, new_equipment_description,
                subject, description, priority
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(data.equipment_id)
        .bind(data.requested_by)
        .bind(data.is_new_equipment)
        .bind(&data.new_equipment_name)
        .bind(&data.new_equipment_description)
        .bind(&data.subject)
        .bind(&data.description)
        .bind(data.priority)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, "Duplicate request"))
    }

    /// Approve or reject a pending request in a single transaction.
    ///
    /// The request row is locked for the duration, so two concurrent
    /// decisions cannot both see it as pending. Approving a new-equipment
    /// request inserts the equipment and links it before commit; any error
    /// drops the transaction, which rolls back every write.
    pub async fn decide(
        &self,
        id: i32,
        target: RequestStatus,
        decided_by: i32,
    ) -> AppResult<DecisionOutcome> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        request.status.check_transition(target)?;

        let equipment = if target == RequestStatus::Approved && request.is_new_equipment {
            let name = request.new_equipment_name.as_deref().ok_or_else(|| {
                AppError::Internal(format!("Request {} has no proposed equipment name", id))
            })?;
            let created = equipment::insert(
                &mut *tx,
                &NewEquipment {
                    name,
                    description: request.new_equipment_description.as_deref(),
                    status: EquipmentStatus::Operational,
                    location: None,
                    last_maintained: None,
                    added_by: decided_by,
                },
            )
            .await?;
            Some(created)
        } else {
            None
        };

        let updated = sqlx::query_as::<_, Request>(
            r#"
            UPDATE requests
            SET equipment_id = COALESCE($1, equipment_id),
                status = $2,
                approved_by = $3,
                approved_at = NOW(),
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(equipment.as_ref().map(|e| e.id))
        .bind(target)
        .bind(decided_by)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DecisionOutcome {
            request: updated,
            equipment,
        })
    }
}
