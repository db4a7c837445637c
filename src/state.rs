//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use reqwest::Client;
use sqlx::PgPool;

use crate::config::EnvironmentConfig;
use crate::services::notification_service::NotificationService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub notifier: NotificationService,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let notifier = NotificationService::new(Client::new(), &config);

        Self {
            pool,
            config,
            notifier,
        }
    }
}
