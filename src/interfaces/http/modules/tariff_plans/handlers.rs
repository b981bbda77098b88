//! Tariff plan REST API handlers
//!
//! Every admin handler takes [`AdminSession`] as its first argument, so the
//! capability check runs before the body is read or the service is touched.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderName, StatusCode},
    Json,
};

use super::dto::{
    CreateTariffPlanRequest, ListTariffPlansParams, PublicTariffPlanResponse,
    TariffPlanResponse, UpdateTariffPlanRequest,
};
use crate::application::{AdminSession, TariffPlanService};
use crate::domain::PublicationState;
use crate::interfaces::http::common::{
    domain_error_response, ApiError, ApiResponse, PaginatedResponse, ValidatedJson,
};

pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ── Public ──────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/tariff-plans",
    tag = "Tariff Plans",
    responses(
        (status = 200, description = "Published plans", body = ApiResponse<Vec<PublicTariffPlanResponse>>)
    )
)]
pub async fn list_public_tariff_plans(
    State(service): State<TariffPlanService>,
) -> ApiResult<Vec<PublicTariffPlanResponse>> {
    let plans = service
        .get_published_tariff_plans()
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        plans.into_iter().map(Into::into).collect(),
    )))
}

// ── Admin ───────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/admin/tariff-plans",
    tag = "Tariff Plans (admin)",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(ListTariffPlansParams),
    responses(
        (status = 200, description = "All plans, paginated; total also in X-Total-Count",
            body = ApiResponse<PaginatedResponse<TariffPlanResponse>>),
        (status = 400, description = "Unknown sort, order or state value"),
        (status = 401, description = "Missing or invalid credentials")
    )
)]
pub async fn list_tariff_plans(
    _session: AdminSession,
    State(service): State<TariffPlanService>,
    params: Result<Query<ListTariffPlansParams>, QueryRejection>,
) -> Result<
    (
        [(HeaderName, String); 1],
        Json<ApiResponse<PaginatedResponse<TariffPlanResponse>>>,
    ),
    ApiError,
> {
    let Query(params) = params.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Invalid query: {}", e.body_text()))),
        )
    })?;

    let page = service
        .get_all_tariff_plans(params.into())
        .await
        .map_err(domain_error_response)?;

    Ok((
        [(TOTAL_COUNT_HEADER, page.total.to_string())],
        Json(ApiResponse::success(page.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/admin/tariff-plans/{id}",
    tag = "Tariff Plans (admin)",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Tariff plan ID")),
    responses(
        (status = 200, description = "Tariff plan", body = ApiResponse<TariffPlanResponse>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_tariff_plan(
    _session: AdminSession,
    State(service): State<TariffPlanService>,
    Path(id): Path<String>,
) -> ApiResult<TariffPlanResponse> {
    let plan = service
        .get_tariff_plan(&id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(plan.into())))
}

#[utoipa::path(
    post,
    path = "/admin/tariff-plans",
    tag = "Tariff Plans (admin)",
    security(("bearer_auth" = []), ("api_key" = [])),
    request_body = CreateTariffPlanRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<TariffPlanResponse>),
        (status = 400, description = "Body is not JSON"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 422, description = "Missing field, wrong type or failed rule")
    )
)]
pub async fn create_tariff_plan(
    session: AdminSession,
    State(service): State<TariffPlanService>,
    ValidatedJson(request): ValidatedJson<CreateTariffPlanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TariffPlanResponse>>), ApiError> {
    tracing::debug!(subject = %session.subject, "Creating tariff plan");
    let plan = service
        .create_tariff_plan(request.into())
        .await
        .map_err(domain_error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(plan.into()))))
}

#[utoipa::path(
    put,
    path = "/admin/tariff-plans/{id}",
    tag = "Tariff Plans (admin)",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Tariff plan ID")),
    request_body = UpdateTariffPlanRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<TariffPlanResponse>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Not found"),
        (status = 422, description = "Missing field, wrong type or failed rule")
    )
)]
pub async fn update_tariff_plan(
    _session: AdminSession,
    State(service): State<TariffPlanService>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateTariffPlanRequest>,
) -> ApiResult<TariffPlanResponse> {
    let plan = service
        .update_tariff_plan(&id, request.into())
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(plan.into())))
}

#[utoipa::path(
    delete,
    path = "/admin/tariff-plans/{id}",
    tag = "Tariff Plans (admin)",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Tariff plan ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<String>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_tariff_plan(
    _session: AdminSession,
    State(service): State<TariffPlanService>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    service
        .delete_tariff_plan(&id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(format!("Tariff plan {} deleted", id))))
}

#[utoipa::path(
    post,
    path = "/admin/tariff-plans/{id}/publish",
    tag = "Tariff Plans (admin)",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Tariff plan ID")),
    responses(
        (status = 200, description = "Plan is published", body = ApiResponse<TariffPlanResponse>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Not found")
    )
)]
pub async fn publish_tariff_plan(
    _session: AdminSession,
    State(service): State<TariffPlanService>,
    Path(id): Path<String>,
) -> ApiResult<TariffPlanResponse> {
    set_state(&service, &id, PublicationState::Published).await
}

#[utoipa::path(
    post,
    path = "/admin/tariff-plans/{id}/unpublish",
    tag = "Tariff Plans (admin)",
    security(("bearer_auth" = []), ("api_key" = [])),
    params(("id" = String, Path, description = "Tariff plan ID")),
    responses(
        (status = 200, description = "Plan is hidden", body = ApiResponse<TariffPlanResponse>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Not found")
    )
)]
pub async fn unpublish_tariff_plan(
    _session: AdminSession,
    State(service): State<TariffPlanService>,
    Path(id): Path<String>,
) -> ApiResult<TariffPlanResponse> {
    set_state(&service, &id, PublicationState::Unpublished).await
}

async fn set_state(
    service: &TariffPlanService,
    id: &str,
    state: PublicationState,
) -> ApiResult<TariffPlanResponse> {
    let plan = service
        .set_publication_state(id, state)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(plan.into())))
}
