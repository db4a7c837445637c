//! Rutas de administración: ledger de asignaciones y cuentas

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};

use crate::controllers::admin_controller::AdminController;
use crate::dto::assignment_dto::{AssignmentRequest, AssignmentRow, AssignmentSummary};
use crate::dto::user_dto::{ChangePasswordRequest, CreateUserRequest, UserProfileResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_any_role, AuthenticatedUser};
use crate::models::driver::Driver;
use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/assign-driver", post(assign_driver))
        .route("/delete-assignment/:driver_id", delete(delete_assignment))
        .route("/update-assignment", put(update_assignment))
        .route("/assignments", get(get_assignments))
        .route("/unassigned-drivers", get(get_unassigned_drivers))
        .route("/users", post(create_user))
        .route("/users/:id_number", delete(delete_user))
        .route("/users/:id_number/password", put(change_password))
}

fn controller(state: &AppState) -> AdminController {
    AdminController::new(state.pool.clone(), state.notifier.clone())
}

async fn assign_driver(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<AssignmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AssignmentSummary>>), AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let summary = controller(&state).assign_driver(request, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Vehicle assigned to driver successfully",
            summary,
        )),
    ))
}

async fn delete_assignment(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(driver_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    controller(&state).delete_assignment(driver_id, &user).await?;
    Ok(Json(ApiResponse::success_empty(
        "Vehicle assignment deleted successfully",
    )))
}

async fn update_assignment(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<AssignmentRequest>,
) -> Result<Json<ApiResponse<AssignmentSummary>>, AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let summary = controller(&state).update_assignment(request, &user).await?;
    Ok(Json(ApiResponse::success(
        "Vehicle assignment updated successfully",
        summary,
    )))
}

async fn get_assignments(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AssignmentRow>>>, AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let assignments = controller(&state).assignments().await?;
    Ok(Json(ApiResponse::success(
        "Assignments retrieved successfully",
        assignments,
    )))
}

async fn get_unassigned_drivers(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Driver>>>, AppError> {
    require_any_role(&user, &[UserRole::Marshall, UserRole::Admin])?;
    let drivers = controller(&state).unassigned_drivers().await?;
    Ok(Json(ApiResponse::success(
        "Unassigned drivers retrieved successfully",
        drivers,
    )))
}

async fn create_user(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfileResponse>>), AppError> {
    require_any_role(&user, &[UserRole::Admin])?;
    let profile = controller(&state).create_user(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User created successfully", profile)),
    ))
}

async fn delete_user(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id_number): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_any_role(&user, &[UserRole::Admin])?;
    controller(&state).delete_user(id_number).await?;
    Ok(Json(ApiResponse::success_empty("User deleted successfully")))
}

async fn change_password(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id_number): Path<i64>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    require_any_role(&user, &[UserRole::Admin])?;
    controller(&state).change_password(id_number, request).await?;
    Ok(Json(ApiResponse::success_empty("Password changed successfully")))
}
