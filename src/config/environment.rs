//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y del servidor HTTP.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::{flag_or, parse_or, ConfigError};

/// Backend de persistencia seleccionado con `STORAGE_BACKEND`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            "memory" | "memoria" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// Vacío = CORS permisivo
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
    pub storage_backend: StorageBackend,
    pub seed_demo_data: bool,
    /// Costo de bcrypt para las contraseñas de usuarios (`BCRYPT_COST`)
    pub password_cost: u32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
            storage_backend: StorageBackend::Postgres,
            seed_demo_data: false,
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage_backend = match lookup("STORAGE_BACKEND") {
            None => defaults.storage_backend,
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "STORAGE_BACKEND",
                value: raw,
            })?,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let password_cost = parse_or(&lookup, "BCRYPT_COST", defaults.password_cost)?;
        if !(crate::utils::password::MIN_COST..=crate::utils::password::MAX_COST).contains(&password_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: password_cost.to_string(),
            });
        }

        Ok(Self {
            environment: lookup("ENVIRONMENT")
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.environment),
            host: lookup("HOST")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            cors_origins,
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
            storage_backend,
            seed_demo_data: flag_or(&lookup, "SEED_DEMO_DATA", defaults.seed_demo_data)?,
            password_cost,
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::lookup_from;

    #[test]
    fn test_valores_por_defecto() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.storage_backend, StorageBackend::Postgres);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.password_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_lee_variables() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "Production"),
            ("PORT", "8081"),
            ("CORS_ORIGINS", "http://a.cl, http://b.cl,"),
            ("STORAGE_BACKEND", "memory"),
            ("SEED_DEMO_DATA", "true"),
        ]))
        .unwrap();
        assert!(config.is_production());
        assert_eq!(config.port, 8081);
        assert_eq!(config.cors_origins, vec!["http://a.cl", "http://b.cl"]);
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn test_costo_bcrypt_fuera_de_rango() {
        let config =
            EnvironmentConfig::from_lookup(lookup_from(&[("BCRYPT_COST", "4")])).unwrap();
        assert_eq!(config.password_cost, 4);

        let err = EnvironmentConfig::from_lookup(lookup_from(&[("BCRYPT_COST", "2")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: "2".into()
            }
        );
    }

    #[test]
    fn test_backend_invalido() {
        let err = EnvironmentConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "mongo")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "STORAGE_BACKEND",
                value: "mongo".into()
            }
        );
    }
}
