//! Controller de Routes
//!
//! CRUD de rutas y operaciones de colocación de marshalls.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::route_dto::{MarshallPlacementRequest, MarshallRemovalRequest, RouteRequest};
use crate::models::matatu::Matatu;
use crate::models::route::Route;
use crate::repositories::marshall_repository::MarshallRepository;
use crate::repositories::matatu_repository::MatatuRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::services::route_service::{MarshallPosition, RouteService};
use crate::utils::errors::AppError;

pub struct RouteController {
    route_repository: RouteRepository,
    matatu_repository: MatatuRepository,
    marshall_repository: MarshallRepository,
    route_service: RouteService,
}

impl RouteController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            route_repository: RouteRepository::new(pool.clone()),
            matatu_repository: MatatuRepository::new(pool.clone()),
            marshall_repository: MarshallRepository::new(pool.clone()),
            route_service: RouteService::new(pool),
        }
    }

    pub async fn create(&self, request: RouteRequest) -> Result<Route, AppError> {
        request.validate()?;

        if self
            .route_repository
            .find_by_name(&request.name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Route with name '{}' already exists",
                request.name
            )));
        }

        self.route_repository
            .create(&request.name, &request.start_point, &request.end_point)
            .await
    }

    pub async fn get_by_id(&self, route_id: i64) -> Result<Route, AppError> {
        self.route_repository
            .find_by_id(route_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Route not found with ID: {}", route_id)))
    }

    pub async fn list(&self) -> Result<Vec<Route>, AppError> {
        self.route_repository.find_all().await
    }

    pub async fn update(&self, route_id: i64, request: RouteRequest) -> Result<Route, AppError> {
        request.validate()?;
        self.get_by_id(route_id).await?;

        self.route_repository
            .update(route_id, &request.name, &request.start_point, &request.end_point)
            .await
    }

    pub async fn delete(&self, route_id: i64) -> Result<(), AppError> {
        self.get_by_id(route_id).await?;

        // las rutas con vehículos asignados no se borran
        if !self.matatu_repository.find_by_route(route_id).await?.is_empty() {
            return Err(AppError::Conflict(
                "Route still has matatus assigned to it".to_string(),
            ));
        }

        self.route_repository.delete(route_id).await
    }

    pub async fn matatus_in_route(&self, route_id: i64) -> Result<Vec<Matatu>, AppError> {
        self.get_by_id(route_id).await?;
        self.matatu_repository.find_by_route(route_id).await
    }

    pub async fn assign_marshall(
        &self,
        request: MarshallPlacementRequest,
    ) -> Result<Route, AppError> {
        request.validate()?;
        self.get_by_id(request.route_id).await?;

        self.marshall_repository
            .find_by_id(request.marshall_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Marshall not found with ID: {}",
                    request.marshall_id
                ))
            })?;

        if MarshallPosition::parse(&request.position).is_none() {
            return Err(AppError::BadRequest(
                "Invalid position. Allowed values are 'start' or 'end'.".to_string(),
            ));
        }

        // pre-checks de lectura; el motor repite los mismos checks dentro
        // de su transacción antes de mutar
        if self
            .route_service
            .is_marshall_assigned_to_route(request.route_id, request.marshall_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Marshall {} is already assigned to route {}",
                request.marshall_id, request.route_id
            )));
        }

        if self
            .route_service
            .is_stage_assigned_to_marshall(request.route_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Route {} is already assigned to a marshall",
                request.route_id
            )));
        }

        self.route_service
            .assign_marshall_to_route(request.route_id, request.marshall_id, &request.position)
            .await
    }

    pub async fn unassign_marshall(
        &self,
        request: MarshallRemovalRequest,
    ) -> Result<Route, AppError> {
        self.marshall_repository
            .find_by_id(request.marshall_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Marshall not found with ID: {}",
                    request.marshall_id
                ))
            })?;

        self.route_service
            .unassign_marshall_from_route(request.marshall_id)
            .await
    }
}
