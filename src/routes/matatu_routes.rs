//! Rutas de Matatus

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};

use crate::controllers::matatu_controller::MatatuController;
use crate::dto::matatu_dto::{CreateMatatuRequest, UpdateMatatuRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_any_role, AuthenticatedUser};
use crate::models::check_in_out_log::CheckInOutLog;
use crate::models::matatu::Matatu;
use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_matatu_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_matatus))
        .route("/", post(create_matatu))
        .route("/available", get(list_available_matatus))
        .route("/count", get(matatu_count))
        .route("/:plate_number", get(get_matatu))
        .route("/:plate_number", put(update_matatu))
        .route("/:plate_number", delete(delete_matatu))
        .route("/:plate_number/check-in", post(check_in_matatu))
        .route("/:plate_number/check-out", post(check_out_matatu))
}

async fn list_matatus(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Matatu>>>, AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let matatus = MatatuController::new(state.pool.clone()).list().await?;
    Ok(Json(ApiResponse::success("Matatus retrieved successfully", matatus)))
}

async fn list_available_matatus(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Matatu>>>, AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let matatus = MatatuController::new(state.pool.clone()).list_available().await?;
    Ok(Json(ApiResponse::success(
        "Available matatus retrieved successfully",
        matatus,
    )))
}

async fn matatu_count(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<i64>>, AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let count = MatatuController::new(state.pool.clone()).count().await?;
    Ok(Json(ApiResponse::success("Matatu count retrieved successfully", count)))
}

async fn create_matatu(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateMatatuRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Matatu>>), AppError> {
    require_any_role(&user, &[UserRole::Admin])?;
    let matatu = MatatuController::new(state.pool.clone()).create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Matatu created successfully", matatu)),
    ))
}

async fn get_matatu(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(plate_number): Path<String>,
) -> Result<Json<ApiResponse<Matatu>>, AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let matatu = MatatuController::new(state.pool.clone())
        .get_by_plate(&plate_number)
        .await?;
    Ok(Json(ApiResponse::success("Matatu retrieved successfully", matatu)))
}

async fn update_matatu(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(plate_number): Path<String>,
    Json(request): Json<UpdateMatatuRequest>,
) -> Result<Json<ApiResponse<Matatu>>, AppError> {
    require_any_role(&user, &[UserRole::Admin])?;
    let matatu = MatatuController::new(state.pool.clone())
        .update(&plate_number, request)
        .await?;
    Ok(Json(ApiResponse::success("Matatu updated successfully", matatu)))
}

async fn delete_matatu(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(plate_number): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_any_role(&user, &[UserRole::Admin])?;
    MatatuController::new(state.pool.clone())
        .delete(&plate_number)
        .await?;
    Ok(Json(ApiResponse::success_empty("Matatu deleted successfully")))
}

async fn check_in_matatu(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(plate_number): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<CheckInOutLog>>), AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let log = MatatuController::new(state.pool.clone())
        .check_in(&plate_number)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Matatu checked in successfully", log)),
    ))
}

async fn check_out_matatu(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(plate_number): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<CheckInOutLog>>), AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let log = MatatuController::new(state.pool.clone())
        .check_out(&plate_number)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Matatu checked out successfully", log)),
    ))
}
