use crate::dto::cliente_dto::{ClientePatch, ClientePayload};
use crate::utils::validation::ValidationReport;

const NOMBRE_REQUERIDO: &str = "El nombre es requerido";
const NOMBRE_VACIO: &str = "El nombre no puede estar vacío";
const NOMBRE_LARGO: &str = "El nombre no puede exceder 100 caracteres";
const CODIGO_LARGO: &str = "El código alternativo no puede exceder 50 caracteres";
const RAZON_LARGA: &str = "La razón social no puede exceder 100 caracteres";
const DIRECCION_LARGA: &str = "La dirección no puede exceder 200 caracteres";
const TELEFONO_LARGO: &str = "El teléfono no puede exceder 30 caracteres";
const RUT_LARGO: &str = "El RUT no puede exceder 30 caracteres";
const COORDENADA_X: &str = "La coordenada X debe ser un número válido entre -180 y 180";
const COORDENADA_Y: &str = "La coordenada Y debe ser un número válido entre -90 y 90";

/// Reglas de largo y rango comunes a la creación y la actualización parcial
fn check_fields(report: &mut ValidationReport, fields: ClienteFields<'_>) {
    report.max_length(fields.nombre, 100, NOMBRE_LARGO);
    report.max_length(fields.codigo_alternativo, 50, CODIGO_LARGO);
    report.max_length(fields.razon, 100, RAZON_LARGA);
    report.max_length(fields.direccion, 200, DIRECCION_LARGA);
    report.max_length(fields.telefono, 30, TELEFONO_LARGO);
    report.max_length(fields.rut, 30, RUT_LARGO);
    report.coordinate(fields.x, -180.0, 180.0, COORDENADA_X);
    report.coordinate(fields.y, -90.0, 90.0, COORDENADA_Y);
}

struct ClienteFields<'a> {
    nombre: Option<&'a str>,
    codigo_alternativo: Option<&'a str>,
    razon: Option<&'a str>,
    direccion: Option<&'a str>,
    telefono: Option<&'a str>,
    rut: Option<&'a str>,
    x: Option<f64>,
    y: Option<f64>,
}

pub fn validate_cliente(cliente: &ClientePayload) -> Vec<String> {
    let mut report = ValidationReport::new();
    report.required(cliente.nombre.as_deref(), NOMBRE_REQUERIDO);
    check_fields(
        &mut report,
        ClienteFields {
            nombre: cliente.nombre.as_deref(),
            codigo_alternativo: cliente.codigo_alternativo.as_deref(),
            razon: cliente.razon.as_deref(),
            direccion: cliente.direccion.as_deref(),
            telefono: cliente.telefono.as_deref(),
            rut: cliente.rut.as_deref(),
            x: cliente.x,
            y: cliente.y,
        },
    );
    report.into_errors()
}

pub fn validate_cliente_patch(cliente: &ClientePatch) -> Vec<String> {
    let mut report = ValidationReport::new();
    if let Some(nombre) = &cliente.nombre {
        report.required(nombre.as_deref(), NOMBRE_VACIO);
    }
    check_fields(
        &mut report,
        ClienteFields {
            nombre: cliente.nombre.as_ref().and_then(|v| v.as_deref()),
            codigo_alternativo: cliente.codigo_alternativo.as_ref().and_then(|v| v.as_deref()),
            razon: cliente.razon.as_ref().and_then(|v| v.as_deref()),
            direccion: cliente.direccion.as_ref().and_then(|v| v.as_deref()),
            telefono: cliente.telefono.as_ref().and_then(|v| v.as_deref()),
            rut: cliente.rut.as_ref().and_then(|v| v.as_deref()),
            x: cliente.x.flatten(),
            y: cliente.y.flatten(),
        },
    );
    report.into_errors()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cliente_valido() {
        let cliente = ClientePayload {
            nombre: Some("Empresa ABC".into()),
            x: Some(-70.66),
            y: Some(-33.44),
            ..Default::default()
        };
        assert!(validate_cliente(&cliente).is_empty());
    }

    #[test]
    fn test_reporta_todas_las_violaciones() {
        let cliente = ClientePayload {
            nombre: None,
            telefono: Some("9".repeat(31)),
            x: Some(181.0),
            y: Some(-91.0),
            ..Default::default()
        };
        assert_eq!(
            validate_cliente(&cliente),
            vec![NOMBRE_REQUERIDO, TELEFONO_LARGO, COORDENADA_X, COORDENADA_Y]
        );
    }

    #[test]
    fn test_nombre_en_blanco() {
        let cliente = ClientePayload {
            nombre: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(validate_cliente(&cliente), vec![NOMBRE_REQUERIDO]);
    }

    #[test]
    fn test_patch_no_exige_nombre() {
        let patch = ClientePatch {
            rut: Some(Some("12345678-9".into())),
            ..Default::default()
        };
        assert!(validate_cliente_patch(&patch).is_empty());
    }

    #[test]
    fn test_patch_rechaza_nombre_vacio_o_nulo() {
        let vacio = ClientePatch {
            nombre: Some(Some("".into())),
            ..Default::default()
        };
        assert_eq!(validate_cliente_patch(&vacio), vec![NOMBRE_VACIO]);

        let nulo = ClientePatch {
            nombre: Some(None),
            ..Default::default()
        };
        assert_eq!(validate_cliente_patch(&nulo), vec![NOMBRE_VACIO]);
    }

    #[test]
    fn test_patch_limpia_coordenadas() {
        let patch = ClientePatch {
            x: Some(None),
            y: Some(Some(-95.0)),
            ..Default::default()
        };
        assert_eq!(validate_cliente_patch(&patch), vec![COORDENADA_Y]);
    }
}
