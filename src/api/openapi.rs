//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, equipment, health, maintenance, reports, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EMS API",
        version = "1.0.0",
        description = "Equipment Management System REST API"
    ),
    servers(
        (url = "/api", description = "EMS API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        // Equipment
        equipment::list_equipment,
        equipment::equipment_stats,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Maintenance
        maintenance::list_equipment_logs,
        maintenance::create_log,
        maintenance::list_logs,
        maintenance::update_log,
        maintenance::delete_log,
        // Requests
        requests::list_requests,
        requests::pending_requests,
        requests::get_request,
        requests::create_request,
        requests::update_request_status,
        // Reports
        reports::list_reports,
        reports::filter_reports,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::update_user_role,
        users::delete_user,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::MessageResponse,
            // Users
            crate::models::user::Role,
            crate::models::user::UserInfo,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateRole,
            // Equipment
            crate::models::equipment::EquipmentStatus,
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentDetails,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::EquipmentStats,
            // Maintenance
            crate::models::maintenance::MaintenanceType,
            crate::models::maintenance::MaintenanceLog,
            crate::models::maintenance::MaintenanceLogDetails,
            crate::models::maintenance::CreateMaintenanceLog,
            crate::models::maintenance::UpdateMaintenanceLog,
            // Requests
            crate::models::request::Priority,
            crate::models::request::RequestStatus,
            crate::models::request::Request,
            crate::models::request::RequestDetails,
            crate::models::request::PendingRequest,
            crate::models::request::CreateRequest,
            crate::models::request::UpdateRequestStatus,
            crate::models::request::DecisionOutcome,
            // Reports
            crate::models::report::ReportType,
            crate::models::report::Report,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "maintenance", description = "Maintenance history"),
        (name = "requests", description = "Equipment requests and approvals"),
        (name = "reports", description = "Activity reports"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
