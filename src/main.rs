mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::EnvironmentConfig;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(if config.is_development() {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    info!("🚌 Matatu Fleet Operations - API");
    info!("================================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = database::run_migrations(&pool).await {
        error!("❌ Error en el bootstrap del schema: {}", e);
        return Err(anyhow::anyhow!("Error de schema: {}", e));
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(pool, config);

    // Rutas protegidas por el middleware de autenticación
    let protected = Router::new()
        .nest("/api/admin", routes::admin_routes::create_admin_router())
        .nest("/api/matatus", routes::matatu_routes::create_matatu_router())
        .nest("/api/routes", routes::route_routes::create_route_router())
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth::auth_middleware,
        ));

    // CORS: orígenes explícitos si están configurados, permisivo en desarrollo
    let cors = if app_state.config.cors_origins.is_empty() {
        if app_state.config.is_production() {
            tracing::warn!("⚠️ CORS permisivo en producción; configure CORS_ORIGINS");
        }
        cors_middleware()
    } else {
        cors_middleware_with_origins(app_state.config.cors_origins.clone())
    };

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .merge(protected)
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Auth:");
    info!("   POST /api/auth/login - Login");
    info!("🧾 Admin - Ledger de asignaciones:");
    info!("   POST   /api/admin/assign-driver - Asignar vehículo a conductor");
    info!("   DELETE /api/admin/delete-assignment/:driver_id - Liberar asignación");
    info!("   PUT    /api/admin/update-assignment - Reasignar vehículo");
    info!("   GET    /api/admin/assignments - Asignaciones activas");
    info!("   GET    /api/admin/unassigned-drivers - Conductores libres");
    info!("👤 Admin - Cuentas:");
    info!("   POST   /api/admin/users - Crear cuenta y perfil");
    info!("   DELETE /api/admin/users/:id_number - Borrar cuenta");
    info!("   PUT    /api/admin/users/:id_number/password - Cambiar contraseña");
    info!("🚐 Matatus:");
    info!("   GET  /api/matatus - Listar matatus");
    info!("   POST /api/matatus - Crear matatu");
    info!("   GET  /api/matatus/available - Matatus disponibles");
    info!("   GET  /api/matatus/count - Total de matatus");
    info!("   GET  /api/matatus/:plate - Obtener matatu");
    info!("   PUT  /api/matatus/:plate - Actualizar matatu");
    info!("   DELETE /api/matatus/:plate - Borrar matatu");
    info!("   POST /api/matatus/:plate/check-in - Check-in en el stage actual");
    info!("   POST /api/matatus/:plate/check-out - Check-out hacia el extremo opuesto");
    info!("🗺  Routes:");
    info!("   GET  /api/routes - Listar rutas");
    info!("   POST /api/routes - Crear ruta");
    info!("   GET  /api/routes/:id - Obtener ruta");
    info!("   PUT  /api/routes/:id - Actualizar ruta");
    info!("   DELETE /api/routes/:id - Borrar ruta");
    info!("   GET  /api/routes/:id/matatus - Matatus de la ruta");
    info!("   POST /api/routes/assign-marshall-to-route-stage - Colocar marshall");
    info!("   POST /api/routes/unassign-marshall-from-route - Retirar marshall");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint simple de health check
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "matatu-fleet",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
