//! Activity report model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Activity source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Equipment,
    Maintenance,
    Request,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Equipment => "equipment",
            ReportType::Maintenance => "maintenance",
            ReportType::Request => "request",
        }
    }
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equipment" => Ok(ReportType::Equipment),
            "maintenance" => Ok(ReportType::Maintenance),
            "request" => Ok(ReportType::Request),
            _ => Err(format!("Invalid report type: {}", s)),
        }
    }
}

/// One row of the activity feed
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Report {
    /// Id of the source row (unique per type)
    pub id: i32,
    pub date: DateTime<Utc>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub report_type: String,
    pub description: String,
    pub status: String,
    pub user: String,
}

/// Raw filter query (`/reports/filter?startDate&endDate&type`)
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Start date, inclusive (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// End date, inclusive (YYYY-MM-DD)
    pub end_date: Option<String>,
    /// equipment, maintenance or request
    #[serde(rename = "type")]
    pub report_type: Option<String>,
}

/// Parsed report filter
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReportFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub report_type: Option<ReportType>,
}

fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {}: expected YYYY-MM-DD", field)))
}

impl ReportQuery {
    /// Parse the query; empty parameters are ignored
    pub fn parse(&self) -> AppResult<ReportFilter> {
        let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        let start = present(&self.start_date)
            .map(|s| parse_date(&s, "startDate"))
            .transpose()?;
        let end = present(&self.end_date)
            .map(|s| parse_date(&s, "endDate"))
            .transpose()?;
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AppError::Validation("startDate is after endDate".to_string()));
            }
        }
        let report_type = present(&self.report_type)
            .map(|t| t.parse::<ReportType>().map_err(AppError::Validation))
            .transpose()?;

        Ok(ReportFilter { start, end, report_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(start: Option<&str>, end: Option<&str>, t: Option<&str>) -> ReportQuery {
        ReportQuery {
            start_date: start.map(String::from),
            end_date: end.map(String::from),
            report_type: t.map(String::from),
        }
    }

    #[test]
    fn test_parse_full_filter() {
        let filter = query(Some("2024-01-01"), Some("2024-01-31"), Some("maintenance"))
            .parse()
            .unwrap();
        assert_eq!(filter.start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.end, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(filter.report_type, Some(ReportType::Maintenance));
    }

    #[test]
    fn test_empty_parameters_are_ignored() {
        let filter = query(Some(""), None, Some("")).parse().unwrap();
        assert_eq!(filter, ReportFilter::default());
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(query(Some("01/02/2024"), None, None).parse().is_err());
        assert!(query(None, None, Some("user")).parse().is_err());
        assert!(query(Some("2024-02-01"), Some("2024-01-01"), None).parse().is_err());
    }

    #[test]
    fn test_camel_case_query_names() {
        let q: ReportQuery =
            serde_json::from_str(r#"{"startDate":"2024-01-01","type":"request"}"#).unwrap();
        assert_eq!(q.start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(q.report_type.as_deref(), Some("request"));
    }
}
