//! Reports repository (reads the `activity_reports` view)

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::report::{Report, ReportFilter},
};

#[derive(Clone)]
pub struct ReportsRepository {
    pool: Pool<Postgres>,
}

impl ReportsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Activity rows matching the filter, newest first
    pub async fn list(&self, filter: &ReportFilter) -> AppResult<Vec<Report>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if filter.start.is_some() {
            conditions.push(format!("date::date >= ${}", idx));
            idx += 1;
        }
        if filter.end.is_some() {
            conditions.push(format!("date::date <= ${}", idx));
            idx += 1;
        }
        if filter.report_type.is_some() {
            conditions.push(format!("type = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_q = format!(
            r#"SELECT id, date, type, description, status, "user" FROM activity_reports {} ORDER BY date DESC, type, id DESC"#,
            where_clause
        );
        let mut builder = sqlx::query_as::<_, Report>(&select_q);
        if let Some(start) = filter.start {
            builder = builder.bind(start);
        }
        if let Some(end) = filter.end {
            builder = builder.bind(end);
        }
        if let Some(report_type) = filter.report_type {
            builder = builder.bind(report_type.as_str());
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }
}
