//! Controller de administración
//!
//! Operaciones del ledger de asignaciones y gestión de cuentas. Las
//! mutaciones de cuentas disparan correos best-effort que nunca afectan a
//! la operación que los origina.

use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;

use crate::dto::assignment_dto::{AssignmentRequest, AssignmentRow, AssignmentSummary};
use crate::dto::user_dto::{ChangePasswordRequest, CreateUserRequest, UserProfileResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::driver::Driver;
use crate::models::user::{UserAccount, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::services::assignment_service::AssignmentService;
use crate::services::notification_service::NotificationService;
use crate::utils::errors::AppError;

pub struct AdminController {
    pool: PgPool,
    assignment_service: AssignmentService,
    user_repository: UserRepository,
    notifier: NotificationService,
}

impl AdminController {
    pub fn new(pool: PgPool, notifier: NotificationService) -> Self {
        Self {
            assignment_service: AssignmentService::new(pool.clone()),
            user_repository: UserRepository::new(pool.clone()),
            pool,
            notifier,
        }
    }

    pub async fn assign_driver(
        &self,
        request: AssignmentRequest,
        actor: &AuthenticatedUser,
    ) -> Result<AssignmentSummary, AppError> {
        request.validate()?;
        self.assignment_service
            .assign(request.driver_id, &request.plate_number, &actor.actor())
            .await
    }

    pub async fn delete_assignment(
        &self,
        driver_id: i64,
        actor: &AuthenticatedUser,
    ) -> Result<(), AppError> {
        self.assignment_service
            .unassign(driver_id, &actor.actor())
            .await
    }

    pub async fn update_assignment(
        &self,
        request: AssignmentRequest,
        actor: &AuthenticatedUser,
    ) -> Result<AssignmentSummary, AppError> {
        request.validate()?;
        self.assignment_service
            .reassign(request.driver_id, &request.plate_number, &actor.actor())
            .await
    }

    pub async fn assignments(&self) -> Result<Vec<AssignmentRow>, AppError> {
        let assignments = self.assignment_service.assignments().await?;
        if assignments.is_empty() {
            return Err(AppError::NotFound("No assignments found".to_string()));
        }
        Ok(assignments)
    }

    pub async fn unassigned_drivers(&self) -> Result<Vec<Driver>, AppError> {
        let drivers = self.assignment_service.unassigned_drivers().await?;
        if drivers.is_empty() {
            return Err(AppError::NotFound("No unassigned drivers found".to_string()));
        }
        Ok(drivers)
    }

    /// Crea la cuenta y su perfil en una sola transacción y dispara el
    /// correo de bienvenida en background.
    pub async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<UserProfileResponse, AppError> {
        request.validate()?;

        let role = UserRole::parse(&request.role)
            .ok_or_else(|| AppError::BadRequest("Role must be DRIVER or MARSHALL".to_string()))?;

        if self
            .user_repository
            .find_by_id(request.id_number)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "User with ID number {} already exists",
                request.id_number
            )));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO users (id_number, password_hash, role, email, enabled) VALUES ($1, $2, $3, $4, TRUE)",
        )
        .bind(request.id_number)
        .bind(&password_hash)
        .bind(role.as_str())
        .bind(&request.email)
        .execute(&mut *tx)
        .await?;

        let license_number = match role {
            UserRole::Driver => {
                let license = request.license_number.as_deref().ok_or_else(|| {
                    AppError::BadRequest("License number is required for drivers".to_string())
                })?;

                sqlx::query(
                    "INSERT INTO drivers (driver_id, firstname, lastname, email, phone_number, license_number) VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(request.id_number)
                .bind(&request.firstname)
                .bind(&request.lastname)
                .bind(&request.email)
                .bind(request.phone_number.as_deref())
                .bind(license)
                .execute(&mut *tx)
                .await?;

                Some(license.to_string())
            }
            UserRole::Marshall => {
                let stage = request.stage.as_deref().ok_or_else(|| {
                    AppError::BadRequest("Stage is required for marshalls".to_string())
                })?;

                sqlx::query(
                    "INSERT INTO marshalls (marshall_id, firstname, lastname, email, phone_number, stage) VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(request.id_number)
                .bind(&request.firstname)
                .bind(&request.lastname)
                .bind(&request.email)
                .bind(request.phone_number.as_deref())
                .bind(stage)
                .execute(&mut *tx)
                .await?;

                None
            }
            UserRole::Admin => {
                return Err(AppError::BadRequest(
                    "Role must be DRIVER or MARSHALL".to_string(),
                ));
            }
        };

        tx.commit().await?;

        self.notifier
            .account_created(&request.email, request.id_number, &request.password, role.as_str());

        Ok(UserProfileResponse {
            id_number: request.id_number,
            firstname: request.firstname,
            lastname: request.lastname,
            email: request.email,
            phone_number: request.phone_number,
            license_number,
            role: role.as_str().to_string(),
            enabled: true,
        })
    }

    pub async fn delete_user(&self, id_number: i64) -> Result<(), AppError> {
        let user = self.find_user(id_number).await?;

        let role = UserRole::parse(&user.role)
            .ok_or_else(|| AppError::Internal("Account has an unknown role".to_string()))?;

        let mut tx = self.pool.begin().await?;

        match role {
            UserRole::Driver => {
                // un conductor con asignación activa no se borra
                let active: (bool,) = sqlx::query_as(
                    "SELECT EXISTS(SELECT 1 FROM driver_vehicle_assignments WHERE driver_id = $1 AND released_at IS NULL)",
                )
                .bind(id_number)
                .fetch_one(&mut *tx)
                .await?;

                if active.0 {
                    return Err(AppError::Conflict(
                        "Driver has an active vehicle assignment".to_string(),
                    ));
                }

                sqlx::query("DELETE FROM drivers WHERE driver_id = $1")
                    .bind(id_number)
                    .execute(&mut *tx)
                    .await?;
            }
            UserRole::Marshall => {
                let placed: (bool,) = sqlx::query_as(
                    "SELECT EXISTS(SELECT 1 FROM routes WHERE start_marshall_id = $1 OR end_marshall_id = $1)",
                )
                .bind(id_number)
                .fetch_one(&mut *tx)
                .await?;

                if placed.0 {
                    return Err(AppError::Conflict(
                        "Marshall is still assigned to a route".to_string(),
                    ));
                }

                sqlx::query("DELETE FROM marshalls WHERE marshall_id = $1")
                    .bind(id_number)
                    .execute(&mut *tx)
                    .await?;
            }
            UserRole::Admin => {}
        }

        sqlx::query("DELETE FROM users WHERE id_number = $1")
            .bind(id_number)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.notifier
            .account_deleted(&user.email, id_number, &user.role);

        Ok(())
    }

    pub async fn change_password(
        &self,
        id_number: i64,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        request.validate()?;

        let user = self.find_user(id_number).await?;

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?;

        self.user_repository
            .update_password(id_number, &password_hash)
            .await?;

        self.notifier
            .password_changed(&user.email, id_number, &request.password);

        Ok(())
    }

    async fn find_user(&self, id_number: i64) -> Result<UserAccount, AppError> {
        self.user_repository
            .find_by_id(id_number)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User not found with ID number: {}", id_number))
            })
    }
}
