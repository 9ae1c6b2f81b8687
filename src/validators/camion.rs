use crate::dto::camion_dto::{CamionPatch, CamionPayload};
use crate::utils::validation::ValidationReport;

const DESCRIPCION_REQUERIDA: &str = "La descripción es requerida y debe ser un texto válido";
const DESCRIPCION_VACIA: &str = "La descripción no puede estar vacía";
const DESCRIPCION_LARGA: &str = "La descripción no puede exceder 255 caracteres";

pub fn validate_camion(camion: &CamionPayload) -> Vec<String> {
    let mut report = ValidationReport::new();
    report.required(camion.descripcion.as_deref(), DESCRIPCION_REQUERIDA);
    report.max_length(camion.descripcion.as_deref(), 255, DESCRIPCION_LARGA);
    report.into_errors()
}

pub fn validate_camion_patch(camion: &CamionPatch) -> Vec<String> {
    let mut report = ValidationReport::new();
    if let Some(descripcion) = &camion.descripcion {
        report.required(descripcion.as_deref(), DESCRIPCION_VACIA);
        report.max_length(descripcion.as_deref(), 255, DESCRIPCION_LARGA);
    }
    report.into_errors()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descripcion_requerida() {
        assert_eq!(
            validate_camion(&CamionPayload::default()),
            vec![DESCRIPCION_REQUERIDA]
        );
        let camion = CamionPayload {
            descripcion: Some("Daniel Torres".into()),
        };
        assert!(validate_camion(&camion).is_empty());
    }

    #[test]
    fn test_descripcion_larga() {
        let camion = CamionPayload {
            descripcion: Some("x".repeat(256)),
        };
        assert_eq!(validate_camion(&camion), vec![DESCRIPCION_LARGA]);
    }

    #[test]
    fn test_patch() {
        assert!(validate_camion_patch(&CamionPatch::default()).is_empty());
        let patch = CamionPatch {
            descripcion: Some(None),
        };
        assert_eq!(validate_camion_patch(&patch), vec![DESCRIPCION_VACIA]);
    }
}
