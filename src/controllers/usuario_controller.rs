//! Cuentas de usuario: alta con contraseña, login, cambio de contraseña y
//! estadísticas. Listar, leer, editar y desactivar pasan por el CRUD
//! genérico.

use std::sync::Arc;

use tracing::{info, warn};

use crate::dto::api_response::ApiResponse;
use crate::dto::usuario_dto::{
    normalize_email, CambiarPasswordRequest, CrearUsuarioRequest, LoginRequest,
};
use crate::models::entity::{ChangeSet, Entity, EntityId, FieldChange};
use crate::models::usuario::{Usuario, UsuarioStats};
use crate::repositories::store::{EntityStore, UsuarioStore};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::password::{hash_password, verify_password};
use crate::validators::usuario::{validate_password, PASSWORD_CORTA};

const CREDENCIALES_INVALIDAS: &str = "Credenciales inválidas";
const NUEVA_PASSWORD_CORTA: &str = "La nueva contraseña debe tener al menos 6 caracteres";

pub struct UsuarioController {
    store: Arc<dyn EntityStore<Usuario>>,
    cuentas: Arc<dyn UsuarioStore>,
    password_cost: u32,
}

impl UsuarioController {
    pub fn new(
        store: Arc<dyn EntityStore<Usuario>>,
        cuentas: Arc<dyn UsuarioStore>,
        password_cost: u32,
    ) -> Self {
        Self {
            store,
            cuentas,
            password_cost,
        }
    }

    pub async fn create(&self, request: CrearUsuarioRequest) -> AppResult<ApiResponse<Usuario>> {
        let mut errors = request.usuario.validation_errors();
        errors.extend(validate_password(request.password.as_deref(), PASSWORD_CORTA));
        if !errors.is_empty() {
            return Err(AppError::validation(Usuario::LABELS.invalid_payload, errors));
        }

        let password = request.password.unwrap_or_default();
        let hashed = hash_password(password, self.password_cost).await?;
        let mut changes = request.usuario.changes();
        changes.push(FieldChange::text("password", Some(hashed)));

        let usuario = self.store.create(&changes).await?;
        info!("👤 Usuario creado: id={} rol={}", usuario.id, usuario.rol);

        Ok(ApiResponse::created(usuario, "Usuario creado exitosamente"))
    }

    /// Verifica las credenciales y registra el último acceso. No emite
    /// tokens: devuelve el perfil del usuario.
    pub async fn login(&self, request: LoginRequest) -> AppResult<ApiResponse<Usuario>> {
        let (Some(email), Some(password)) = (
            normalize_email(&request.email),
            request.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AppError::InvalidArgument(
                "Email y password son requeridos".to_string(),
            ));
        };

        let Some(usuario) = self.cuentas.find_by_email(&email).await? else {
            warn!("🔒 Login fallido para {}", email);
            return Err(AppError::Unauthorized(CREDENCIALES_INVALIDAS.to_string()));
        };
        if !verify_password(password, usuario.password.clone()).await? {
            warn!("🔒 Login fallido para {}", email);
            return Err(AppError::Unauthorized(CREDENCIALES_INVALIDAS.to_string()));
        }
        if !usuario.activo {
            return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
        }

        let usuario = self
            .cuentas
            .record_login(usuario.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(CREDENCIALES_INVALIDAS.to_string()))?;
        info!("🔓 Login exitoso: id={}", usuario.id);

        Ok(ApiResponse::success(usuario, "Login exitoso"))
    }

    pub async fn cambiar_password(
        &self,
        id: EntityId,
        request: CambiarPasswordRequest,
    ) -> AppResult<ApiResponse<Usuario>> {
        let actual = request.password_actual.filter(|p| !p.is_empty());
        let nueva = request.password_nueva.filter(|p| !p.is_empty());
        let (Some(actual), Some(nueva)) = (actual, nueva) else {
            return Err(AppError::InvalidArgument(
                "Password actual y nueva son requeridos".to_string(),
            ));
        };
        let errors = validate_password(Some(&nueva), NUEVA_PASSWORD_CORTA);
        if !errors.is_empty() {
            return Err(AppError::validation(Usuario::LABELS.invalid_payload, errors));
        }

        let usuario = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(Usuario::LABELS.not_found.to_string()))?;
        if !verify_password(actual, usuario.password).await? {
            return Err(AppError::Unauthorized(
                "Contraseña actual incorrecta".to_string(),
            ));
        }

        let hashed = hash_password(nueva, self.password_cost).await?;
        let usuario = self
            .store
            .patch(id, &[FieldChange::text("password", Some(hashed))])
            .await?
            .ok_or_else(|| AppError::NotFound(Usuario::LABELS.not_found.to_string()))?;
        info!("🔑 Contraseña actualizada: id={}", id);

        Ok(ApiResponse::success(
            usuario,
            "Contraseña actualizada exitosamente",
        ))
    }

    pub async fn stats(&self) -> AppResult<ApiResponse<UsuarioStats>> {
        let stats = self.cuentas.stats().await?;
        Ok(ApiResponse::success(
            stats,
            "Estadísticas obtenidas exitosamente",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::usuario_dto::UsuarioPayload;
    use crate::repositories::memory_repository::MemoryStore;

    fn controller() -> UsuarioController {
        let store = Arc::new(MemoryStore::new());
        UsuarioController::new(store.clone(), store, crate::utils::password::MIN_COST)
    }

    fn alta(email: &str, password: &str) -> CrearUsuarioRequest {
        CrearUsuarioRequest {
            usuario: UsuarioPayload {
                email: Some(email.into()),
                nombre: Some("Ana".into()),
                apellido: Some("Pérez".into()),
                ..UsuarioPayload::default()
            },
            password: Some(password.into()),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn test_alta_guarda_hash() {
        let controller = controller();
        let response = controller.create(alta("Ana@Correo.cl", "secreto1")).await.unwrap();
        let usuario = response.data;
        assert_eq!(usuario.email, "ana@correo.cl");
        assert_eq!(usuario.rol, "user");
        assert_ne!(usuario.password, "secreto1");
        assert!(usuario.password.starts_with("$2"));
    }

    #[tokio::test]
    async fn test_alta_acumula_errores_de_usuario_y_password() {
        let err = controller().create(alta("sin-arroba", "123")).await.unwrap_err();
        match err {
            AppError::ValidationFailed { errors, .. } => {
                assert_eq!(errors, vec!["Formato de email inválido", PASSWORD_CORTA]);
            }
            other => panic!("error inesperado: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_valida_credenciales() {
        let controller = controller();
        controller.create(alta("ana@correo.cl", "secreto1")).await.unwrap();

        let ok = controller.login(login("ANA@correo.cl", "secreto1")).await.unwrap();
        assert!(ok.data.last_login.is_some());

        let err = controller.login(login("ana@correo.cl", "otra")).await.unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
        let err = controller.login(login("nadie@correo.cl", "secreto1")).await.unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
        let err = controller.login(LoginRequest::default()).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_login_de_usuario_inactivo() {
        let controller = controller();
        let mut request = alta("off@correo.cl", "secreto1");
        request.usuario.activo = Some(false);
        controller.create(request).await.unwrap();

        let err = controller.login(login("off@correo.cl", "secreto1")).await.unwrap_err();
        assert_eq!(err.to_string(), "No autorizado: Usuario inactivo");
    }

    #[tokio::test]
    async fn test_cambio_de_password() {
        let controller = controller();
        let id = controller.create(alta("ana@correo.cl", "secreto1")).await.unwrap().data.id;

        let err = controller
            .cambiar_password(
                id,
                CambiarPasswordRequest {
                    password_actual: Some("mala".into()),
                    password_nueva: Some("nueva123".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No autorizado: Contraseña actual incorrecta");

        controller
            .cambiar_password(
                id,
                CambiarPasswordRequest {
                    password_actual: Some("secreto1".into()),
                    password_nueva: Some("nueva123".into()),
                },
            )
            .await
            .unwrap();
        assert!(controller.login(login("ana@correo.cl", "nueva123")).await.is_ok());
        assert!(controller.login(login("ana@correo.cl", "secreto1")).await.is_err());
    }
}
