//! API handlers for EMS REST endpoints

pub mod auth;
pub mod equipment;
pub mod health;
pub mod maintenance;
pub mod openapi;
pub mod reports;
pub mod requests;
pub mod users;

use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
        HeaderValue, Method,
    },
    routing::{get, post, put},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization, Cookie},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::ServerConfig,
    error::AppError,
    models::user::{Permission, UserClaims},
    AppState,
};

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// Extractor for the authenticated caller.
///
/// The token is read from `Authorization: Bearer`, then from the `token`
/// cookie. A missing, malformed or expired token rejects the call with 401
/// before the handler runs.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());

        let token = match bearer {
            Some(token) => token,
            None => TypedHeader::<Cookie>::from_request_parts(parts, state)
                .await
                .ok()
                .and_then(|TypedHeader(cookies)| cookies.get(TOKEN_COOKIE).map(str::to_string))
                .ok_or_else(|| AppError::Authentication("Authentication required".to_string()))?,
        };

        let claims = UserClaims::from_token(&token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("token rejected: {}", e);
            AppError::Authentication("Invalid or expired token".to_string())
        })?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Marker for the permission an [`Authorized`] extractor demands
pub trait Capability: Send + Sync + 'static {
    const PERMISSION: Permission;
}

macro_rules! capabilities {
    ($($name:ident),* $(,)?) => {
        $(
            pub struct $name;

            impl Capability for $name {
                const PERMISSION: Permission = Permission::$name;
            }
        )*
    };
}

/// One marker per [`Permission`], named after it
pub mod can {
    use super::Capability;
    use crate::models::user::Permission;

    capabilities!(
        ReadEquipment,
        WriteEquipment,
        DeleteEquipment,
        LogMaintenance,
        ReadRequests,
        CreateRequest,
        DecideRequest,
        ViewReports,
        ManageUsers,
    );
}

/// Authenticated caller whose role grants `C::PERMISSION`.
///
/// Placed before `Path` and body extractors, it answers 401 or 403 before
/// the id or payload is parsed.
pub struct Authorized<C>(pub UserClaims, PhantomData<C>);

#[async_trait]
impl<C: Capability> FromRequestParts<AppState> for Authorized<C> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        claims.require(C::PERMISSION)?;
        Ok(Authorized(claims, PhantomData))
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT])
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Equipment
        .route(
            "/equipment",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .route("/equipment/stats", get(equipment::equipment_stats))
        .route(
            "/equipment/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        .route(
            "/equipment/:id/maintenance",
            get(maintenance::list_equipment_logs).post(maintenance::create_log),
        )
        // Maintenance
        .route("/maintenance", get(maintenance::list_logs))
        .route(
            "/maintenance/:id",
            put(maintenance::update_log).delete(maintenance::delete_log),
        )
        // Requests
        .route(
            "/requests",
            get(requests::list_requests).post(requests::create_request),
        )
        .route("/requests/dashboard/pending", get(requests::pending_requests))
        .route(
            "/requests/:id",
            get(requests::get_request).patch(requests::update_request_status),
        )
        // Reports
        .route("/reports", get(reports::list_reports))
        .route("/reports/filter", get(reports::filter_reports))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/role", put(users::update_user_role))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
