use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use delivery_logistics::config::database::DatabaseConfig;
use delivery_logistics::config::environment::{EnvironmentConfig, StorageBackend};
use delivery_logistics::database::DatabaseConnection;
use delivery_logistics::repositories::MemoryStore;
use delivery_logistics::seed::seed_demo_data;
use delivery_logistics::utils::errors::set_expose_internal_details;
use delivery_logistics::{create_app, AppState, Stores};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=info")),
        )
        .init();

    info!("🚚 Delivery Logistics API");
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("Configuración del servidor inválida")?;
    set_expose_internal_details(!config.is_production());
    info!(
        "⚙️ Entorno: {} | persistencia: {}",
        config.environment, config.storage_backend
    );

    let (stores, connection) = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_config =
                DatabaseConfig::from_env().context("Configuración de base de datos inválida")?;
            let connection = match DatabaseConnection::connect(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            if db_config.run_migrations {
                connection
                    .run_migrations()
                    .await
                    .context("Error aplicando migraciones")?;
            }
            (Stores::postgres(connection.clone()), Some(connection))
        }
        StorageBackend::Memory => {
            warn!("⚠️ Persistencia en memoria: los datos se pierden al reiniciar");
            (Stores::memory(Arc::new(MemoryStore::new())), None)
        }
    };

    if config.seed_demo_data {
        seed_demo_data(&stores, config.password_cost)
            .await
            .context("Error cargando datos de demostración")?;
    }

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;
    let app = create_app(AppState::new(config, stores));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles (también bajo /api):");
    info!("   GET  /health, /ping");
    info!("👥 /clientes [/:id, /:id/ubicacion, /activos, /con-ubicacion]");
    info!("🚛 /camiones [/:id, /:id/dias, /con-dias]");
    info!("📅 /dias-entrega [/:id, /:id/camiones, /con-camiones]");
    info!("👤 /usuarios [/:id, /:id/password, /login, /stats]");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    if let Some(connection) = connection {
        connection.close().await;
    }

    info!("👋 Servidor terminado");
    Ok(())
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
