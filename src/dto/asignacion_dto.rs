use serde::Deserialize;

use crate::models::entity::EntityId;

/// Body de POST /camiones/:id/dias
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsignarDiasRequest {
    #[serde(alias = "dias_ids")]
    pub dias_ids: Vec<EntityId>,
}

/// Body de POST /dias-entrega/:id/camiones
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsignarCamionesRequest {
    #[serde(alias = "camiones_ids")]
    pub camiones_ids: Vec<EntityId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializar_listas() {
        let dias: AsignarDiasRequest = serde_json::from_str(r#"{"diasIds":[1,2]}"#).unwrap();
        assert_eq!(dias.dias_ids, vec![1, 2]);
        let camiones: AsignarCamionesRequest =
            serde_json::from_str(r#"{"camionesIds":[]}"#).unwrap();
        assert!(camiones.camiones_ids.is_empty());
        assert!(serde_json::from_str::<AsignarDiasRequest>("{}").is_err());
    }
}
