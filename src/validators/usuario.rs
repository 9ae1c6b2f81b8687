use crate::dto::usuario_dto::{UsuarioPatch, UsuarioPayload};
use crate::models::usuario::ROLES;
use crate::utils::validation::ValidationReport;

const EMAIL_REQUERIDO: &str = "El email es requerido";
const EMAIL_VACIO: &str = "El email no puede estar vacío";
const EMAIL_INVALIDO: &str = "Formato de email inválido";
const EMAIL_LARGO: &str = "El email no puede exceder 255 caracteres";
const NOMBRE_REQUERIDO: &str = "El nombre es requerido";
const NOMBRE_VACIO: &str = "El nombre no puede estar vacío";
const NOMBRE_LARGO: &str = "El nombre no puede exceder 100 caracteres";
const APELLIDO_REQUERIDO: &str = "El apellido es requerido";
const APELLIDO_VACIO: &str = "El apellido no puede estar vacío";
const APELLIDO_LARGO: &str = "El apellido no puede exceder 100 caracteres";
const ROL_INVALIDO: &str = "Rol inválido";

pub const PASSWORD_MINIMO: usize = 6;
pub const PASSWORD_REQUERIDA: &str = "La contraseña es requerida";
pub const PASSWORD_CORTA: &str = "La contraseña debe tener al menos 6 caracteres";

fn check_rol(report: &mut ValidationReport, rol: Option<&str>) {
    if let Some(rol) = rol {
        if !ROLES.contains(&rol.trim()) {
            report.push(ROL_INVALIDO);
        }
    }
}

pub fn validate_usuario(usuario: &UsuarioPayload) -> Vec<String> {
    let mut report = ValidationReport::new();
    let email = usuario.email.as_deref();
    report.required(email, EMAIL_REQUERIDO);
    report.email(email, EMAIL_INVALIDO);
    report.max_length(email, 255, EMAIL_LARGO);
    report.required(usuario.nombre.as_deref(), NOMBRE_REQUERIDO);
    report.max_length(usuario.nombre.as_deref(), 100, NOMBRE_LARGO);
    report.required(usuario.apellido.as_deref(), APELLIDO_REQUERIDO);
    report.max_length(usuario.apellido.as_deref(), 100, APELLIDO_LARGO);
    check_rol(&mut report, usuario.rol.as_deref());
    report.into_errors()
}

pub fn validate_usuario_patch(usuario: &UsuarioPatch) -> Vec<String> {
    let mut report = ValidationReport::new();
    if let Some(email) = usuario.email.as_deref() {
        report.required(Some(email), EMAIL_VACIO);
        report.email(Some(email), EMAIL_INVALIDO);
        report.max_length(Some(email), 255, EMAIL_LARGO);
    }
    if let Some(nombre) = usuario.nombre.as_deref() {
        report.required(Some(nombre), NOMBRE_VACIO);
        report.max_length(Some(nombre), 100, NOMBRE_LARGO);
    }
    if let Some(apellido) = usuario.apellido.as_deref() {
        report.required(Some(apellido), APELLIDO_VACIO);
        report.max_length(Some(apellido), 100, APELLIDO_LARGO);
    }
    check_rol(&mut report, usuario.rol.as_deref());
    report.into_errors()
}

/// Reglas de una contraseña nueva, en creación o en cambio de contraseña
pub fn validate_password(password: Option<&str>, short_message: &str) -> Vec<String> {
    let mut report = ValidationReport::new();
    match password {
        Some(password) if !password.is_empty() => {
            report.min_length(Some(password), PASSWORD_MINIMO, short_message)
        }
        _ => report.push(PASSWORD_REQUERIDA),
    }
    report.into_errors()
}
