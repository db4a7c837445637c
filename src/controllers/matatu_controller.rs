//! Controller de Matatus
//!
//! CRUD administrativo del registro de vehículos más la entrada al ciclo
//! check-in/check-out.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::matatu_dto::{CreateMatatuRequest, UpdateMatatuRequest};
use crate::models::check_in_out_log::CheckInOutLog;
use crate::models::matatu::{Matatu, MatatuStatus};
use crate::repositories::matatu_repository::MatatuRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::services::check_in_out_service::CheckInOutService;
use crate::utils::errors::AppError;
use crate::utils::validation::canonical_plate;

pub struct MatatuController {
    matatu_repository: MatatuRepository,
    route_repository: RouteRepository,
    check_in_out_service: CheckInOutService,
}

impl MatatuController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            matatu_repository: MatatuRepository::new(pool.clone()),
            route_repository: RouteRepository::new(pool.clone()),
            check_in_out_service: CheckInOutService::new(pool),
        }
    }

    pub async fn create(&self, request: CreateMatatuRequest) -> Result<Matatu, AppError> {
        request.validate()?;

        let plate = canonical_plate(&request.plate_number);

        let route = self
            .route_repository
            .find_by_name(&request.route)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Matatu route '{}' does not exist", request.route))
            })?;

        let status = parse_status(request.status.as_deref().unwrap_or("available"))?;

        if self.matatu_repository.find_by_plate(&plate).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Matatu with plate number '{}' already exists",
                plate
            )));
        }

        self.matatu_repository
            .create(&plate, request.capacity, &request.model, status.as_str(), route.route_id)
            .await
    }

    pub async fn get_by_plate(&self, plate_number: &str) -> Result<Matatu, AppError> {
        let plate = canonical_plate(plate_number);
        self.matatu_repository
            .find_by_plate(&plate)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Matatu not found with plate number: {}", plate))
            })
    }

    pub async fn list(&self) -> Result<Vec<Matatu>, AppError> {
        self.matatu_repository.find_all().await
    }

    pub async fn list_available(&self) -> Result<Vec<Matatu>, AppError> {
        self.matatu_repository
            .find_by_status(MatatuStatus::Available.as_str())
            .await
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        self.matatu_repository.count().await
    }

    pub async fn update(
        &self,
        plate_number: &str,
        request: UpdateMatatuRequest,
    ) -> Result<Matatu, AppError> {
        request.validate()?;

        let current = self.get_by_plate(plate_number).await?;

        let route_id = match request.route {
            Some(ref name) => {
                self.route_repository
                    .find_by_name(name)
                    .await?
                    .ok_or_else(|| {
                        AppError::BadRequest(format!("Matatu route '{}' does not exist", name))
                    })?
                    .route_id
            }
            None => current.route_id.ok_or_else(|| {
                AppError::BadRequest("Matatu is not assigned to any route".to_string())
            })?,
        };

        let status = match request.status {
            Some(ref value) => parse_status(value)?.as_str().to_string(),
            None => current.status,
        };

        self.matatu_repository
            .update(
                &current.plate_number,
                request.capacity.unwrap_or(current.capacity),
                request.model.as_deref().unwrap_or(&current.model),
                &status,
                route_id,
            )
            .await
    }

    pub async fn delete(&self, plate_number: &str) -> Result<(), AppError> {
        let matatu = self.get_by_plate(plate_number).await?;

        // guard: nada de borrar vehículos con referencias vivas
        if self
            .matatu_repository
            .has_open_references(&matatu.plate_number)
            .await?
        {
            return Err(AppError::Conflict(
                "Matatu has an active assignment or an open check-in".to_string(),
            ));
        }

        self.matatu_repository.delete(&matatu.plate_number).await
    }

    pub async fn check_in(&self, plate_number: &str) -> Result<CheckInOutLog, AppError> {
        self.check_in_out_service.check_in(plate_number).await
    }

    pub async fn check_out(&self, plate_number: &str) -> Result<CheckInOutLog, AppError> {
        self.check_in_out_service.check_out(plate_number).await
    }
}

fn parse_status(value: &str) -> Result<MatatuStatus, AppError> {
    MatatuStatus::parse(value)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown matatu status '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_accepts_canonical_values() {
        assert!(parse_status("available").is_ok());
        assert!(parse_status("In-Maintenance").is_ok());
        assert!(parse_status("parked").is_err());
    }
}
