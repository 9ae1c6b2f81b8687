use crate::dto::dia_entrega_dto::{DiaEntregaPatch, DiaEntregaPayload};
use crate::utils::validation::ValidationReport;

const DESCRIPCION_REQUERIDA: &str = "La descripción es requerida y debe ser un texto válido";
const DESCRIPCION_VACIA: &str = "La descripción no puede estar vacía";
const DESCRIPCION_LARGA: &str = "La descripción no puede exceder 100 caracteres";

pub fn validate_dia_entrega(dia: &DiaEntregaPayload) -> Vec<String> {
    let mut report = ValidationReport::new();
    report.required(dia.descripcion.as_deref(), DESCRIPCION_REQUERIDA);
    report.max_length(dia.descripcion.as_deref(), 100, DESCRIPCION_LARGA);
    report.into_errors()
}

pub fn validate_dia_entrega_patch(dia: &DiaEntregaPatch) -> Vec<String> {
    let mut report = ValidationReport::new();
    if let Some(descripcion) = &dia.descripcion {
        report.required(descripcion.as_deref(), DESCRIPCION_VACIA);
        report.max_length(descripcion.as_deref(), 100, DESCRIPCION_LARGA);
    }
    report.into_errors()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dia_valido() {
        let dia = DiaEntregaPayload {
            descripcion: Some("Miércoles".into()),
        };
        assert!(validate_dia_entrega(&dia).is_empty());
    }

    #[test]
    fn test_limite_de_100() {
        let dia = DiaEntregaPayload {
            descripcion: Some("d".repeat(101)),
        };
        assert_eq!(validate_dia_entrega(&dia), vec![DESCRIPCION_LARGA]);
        let patch = DiaEntregaPatch {
            descripcion: Some(Some("d".repeat(100))),
        };
        assert!(validate_dia_entrega_patch(&patch).is_empty());
    }
}
