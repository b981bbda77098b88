//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiError, ApiResponse, PaginatedResponse};
use super::middleware::admin_fallback;
use super::modules::request_id::{request_id_middleware, REQUEST_ID_HEADER};
use super::modules::{auth, health, tariff_plans};
use crate::application::{AdminSession, AuthGate, TariffPlanService};
use crate::domain::TariffPlanRepository;

/// Shared state for every route; handlers pick their part via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub tariff_plans: TariffPlanService,
    pub auth: AuthGate,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TariffPlanRepository>, auth: AuthGate) -> Self {
        Self {
            tariff_plans: TariffPlanService::new(repo),
            auth,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for TariffPlanService {
    fn from_ref(s: &AppState) -> Self {
        s.tariff_plans.clone()
    }
}

impl FromRef<AppState> for AuthGate {
    fn from_ref(s: &AppState) -> Self {
        s.auth.clone()
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            service: s.tariff_plans.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// Security scheme modifier for OpenAPI
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
                        .description(Some("JWT from POST /auth/login"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::get_current_session,
        tariff_plans::list_public_tariff_plans,
        tariff_plans::list_tariff_plans,
        tariff_plans::get_tariff_plan,
        tariff_plans::create_tariff_plan,
        tariff_plans::update_tariff_plan,
        tariff_plans::delete_tariff_plan,
        tariff_plans::publish_tariff_plan,
        tariff_plans::unpublish_tariff_plan,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<tariff_plans::TariffPlanResponse>,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::SessionInfo,
            tariff_plans::TariffPlanResponse,
            tariff_plans::PublicTariffPlanResponse,
            tariff_plans::CreateTariffPlanRequest,
            tariff_plans::UpdateTariffPlanRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and storage check"),
        (name = "Authentication", description = "Admin login (JWT) and session introspection"),
        (name = "Tariff Plans", description = "Public catalogue of published tariff plans"),
        (name = "Tariff Plans (admin)", description = "Tariff plan management, requires a JWT or API key"),
    ),
    info(
        title = "Tariff Plan Administration API",
        version = "1.0.0",
        description = "Public tariff catalogue and authenticated tariff plan management",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Known admin path, unsupported method. Still gated.
async fn admin_method_not_allowed(_session: AdminSession) -> ApiError {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiResponse::error("Method not allowed")),
    )
}

/// Create the API router with all routes
pub fn create_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            tariff_plans::TOTAL_COUNT_HEADER,
            axum::http::HeaderName::from_static(REQUEST_ID_HEADER),
        ]);

    // Every handler below extracts `AdminSession`, including both fallbacks.
    let admin_routes = Router::new()
        .route(
            "/tariff-plans",
            get(tariff_plans::list_tariff_plans)
                .post(tariff_plans::create_tariff_plan)
                .fallback(admin_method_not_allowed),
        )
        .route(
            "/tariff-plans/{id}",
            get(tariff_plans::get_tariff_plan)
                .put(tariff_plans::update_tariff_plan)
                .delete(tariff_plans::delete_tariff_plan)
                .fallback(admin_method_not_allowed),
        )
        .route(
            "/tariff-plans/{id}/publish",
            post(tariff_plans::publish_tariff_plan).fallback(admin_method_not_allowed),
        )
        .route(
            "/tariff-plans/{id}/unpublish",
            post(tariff_plans::unpublish_tariff_plan).fallback(admin_method_not_allowed),
        )
        .fallback(admin_fallback);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/tariff-plans", get(tariff_plans::list_public_tariff_plans))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::get_current_session))
        .nest("/admin", admin_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
