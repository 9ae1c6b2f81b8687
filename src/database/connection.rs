//! Conexión a PostgreSQL
//!
//! Dueño del pool de SQLx: se abre al arrancar, aplica las migraciones y se
//! cierra al apagar el servidor esperando las consultas en curso.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;
use crate::repositories::store::StoreHealth;
use crate::utils::errors::AppResult;

#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!(
            "🔌 Conectando a la base de datos {} (pool {}-{})",
            mask_database_url(&config.url),
            config.min_connections,
            config.max_connections
        );
        let pool = config.create_pool().await?;
        info!("✅ Conexión a la base de datos establecida");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ejecutar migraciones de la base de datos
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("📦 Migraciones aplicadas");
        Ok(())
    }

    /// Cierra el pool; espera a que se devuelvan las conexiones en uso
    pub async fn close(&self) {
        self.pool.close().await;
        info!("🔒 Pool de conexiones cerrado");
    }
}

#[async_trait]
impl StoreHealth for DatabaseConnection {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> AppResult<Duration> {
        let started = Instant::now();
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(started.elapsed())
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|pos| pos + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..scheme_end], &url[at_pos + 1..])
}
