//! Rutas de Routes y colocación de marshalls

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{MarshallPlacementRequest, MarshallRemovalRequest, RouteRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_any_role, AuthenticatedUser};
use crate::models::matatu::Matatu;
use crate::models::route::Route;
use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes))
        .route("/", post(create_route))
        .route("/assign-marshall-to-route-stage", post(assign_marshall))
        .route("/unassign-marshall-from-route", post(unassign_marshall))
        .route("/:id", get(get_route))
        .route("/:id", put(update_route))
        .route("/:id", delete(delete_route))
        .route("/:id/matatus", get(matatus_in_route))
}

async fn list_routes(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Route>>>, AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let routes = RouteController::new(state.pool.clone()).list().await?;
    Ok(Json(ApiResponse::success("Routes retrieved successfully", routes)))
}

async fn get_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let route = RouteController::new(state.pool.clone()).get_by_id(id).await?;
    Ok(Json(ApiResponse::success("Route retrieved successfully", route)))
}

async fn create_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Route>>), AppError> {
    require_any_role(&user, &[UserRole::Admin, UserRole::Marshall])?;
    let route = RouteController::new(state.pool.clone()).create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Route created successfully", route)),
    ))
}

async fn update_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    require_any_role(&user, &[UserRole::Admin, UserRole::Marshall])?;
    let route = RouteController::new(state.pool.clone()).update(id, request).await?;
    Ok(Json(ApiResponse::success("Route updated successfully", route)))
}

async fn delete_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_any_role(&user, &[UserRole::Admin, UserRole::Marshall])?;
    RouteController::new(state.pool.clone()).delete(id).await?;
    Ok(Json(ApiResponse::success_empty("Route deleted successfully")))
}

async fn matatus_in_route(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Matatu>>>, AppError> {
    require_any_role(&user, &[UserRole::Admin, UserRole::Marshall])?;
    let matatus = RouteController::new(state.pool.clone())
        .matatus_in_route(id)
        .await?;
    Ok(Json(ApiResponse::success(
        format!("Matatus in route {}", id),
        matatus,
    )))
}

async fn assign_marshall(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<MarshallPlacementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Route>>), AppError> {
    require_any_role(&user, &[UserRole::Admin])?;
    let marshall_id = request.marshall_id;
    let route = RouteController::new(state.pool.clone())
        .assign_marshall(request)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            format!(
                "Route {} assigned successfully to marshall {}",
                route.route_id, marshall_id
            ),
            route,
        )),
    ))
}

async fn unassign_marshall(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<MarshallRemovalRequest>,
) -> Result<Json<ApiResponse<Route>>, AppError> {
    require_any_role(&user, &[UserRole::Admin])?;
    let marshall_id = request.marshall_id;
    let route = RouteController::new(state.pool.clone())
        .unassign_marshall(request)
        .await?;
    Ok(Json(ApiResponse::success(
        format!("Marshall {} successfully unassigned", marshall_id),
        route,
    )))
}
