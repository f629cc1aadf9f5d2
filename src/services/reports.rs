//! Reporting service

use crate::{
    error::AppResult,
    models::report::{Report, ReportFilter, ReportQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Report>> {
        self.repository.reports.list(&ReportFilter::default()).await
    }

    pub async fn filter(&self, query: &ReportQuery) -> AppResult<Vec<Report>> {
        let filter = query.parse()?;
        self.repository.reports.list(&filter).await
    }
}
