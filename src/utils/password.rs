//! Hash y verificación de contraseñas con bcrypt
//!
//! bcrypt es costoso a propósito; se ejecuta en el pool bloqueante de tokio
//! para no frenar el runtime.

use bcrypt::{hash, verify};

use crate::utils::errors::{AppError, AppResult};

/// Coste mínimo aceptado por bcrypt (la constante de la crate es privada).
pub const MIN_COST: u32 = 4;
/// Coste máximo aceptado por bcrypt (la constante de la crate es privada).
pub const MAX_COST: u32 = 31;

pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))
}

pub async fn verify_password(password: String, hashed: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify(password, &hashed))
        .await
        .map_err(|e| AppError::Internal(format!("Error verifying password: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Error verifying password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_y_verificacion() {
        let hashed = hash_password("admin123".into(), MIN_COST).await.unwrap();
        assert_ne!(hashed, "admin123");
        assert!(verify_password("admin123".into(), hashed.clone()).await.unwrap());
        assert!(!verify_password("otra".into(), hashed).await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_corrupto_es_error_interno() {
        let err = verify_password("admin123".into(), "no-es-bcrypt".into())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
