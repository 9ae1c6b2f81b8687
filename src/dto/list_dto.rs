use serde::Deserialize;
use validator::Validate;

use crate::models::entity::{Entity, ListFilter};

fn default_page() -> i64 {
    ListFilter::DEFAULT_PAGE
}

fn default_limit() -> i64 {
    ListFilter::DEFAULT_LIMIT
}

/// Query string de los listados paginados (`?page=&limit=&search=&activo=&rol=`)
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    #[validate(range(
        min = 1,
        max = 2147483647,
        message = "La página debe ser un entero entre 1 y 2147483647"
    ))]
    pub page: i64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "El límite debe estar entre 1 y 100"))]
    pub limit: i64,

    pub search: Option<String>,

    /// Aplica a clientes y usuarios
    pub activo: Option<bool>,

    /// Sólo aplica a usuarios
    pub rol: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            activo: None,
            rol: None,
        }
    }
}

impl ListQuery {
    pub fn to_filter<E: Entity>(&self) -> ListFilter {
        ListFilter::new(
            self.page,
            self.limit,
            self.search.clone(),
            E::list_predicates(self),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::camion::Camion;
    use crate::models::cliente::Cliente;

    #[test]
    fn test_valores_por_defecto() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, ListQuery::default());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_limite_fuera_de_rango() {
        let query = ListQuery {
            limit: 101,
            ..ListQuery::default()
        };
        assert!(query.validate().is_err());

        let query = ListQuery {
            page: 0,
            ..ListQuery::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_pagina_enorme_rechazada() {
        let query = ListQuery {
            page: i64::MAX,
            limit: 100,
            ..ListQuery::default()
        };
        let errors = query.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("page"));

        let query = ListQuery {
            page: i32::MAX as i64,
            ..ListQuery::default()
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_filtro_por_entidad() {
        let query = ListQuery {
            activo: Some(true),
            search: Some("abc".into()),
            ..ListQuery::default()
        };
        assert_eq!(query.to_filter::<Cliente>().predicates.len(), 1);
        // `activo` no existe en camiones
        assert!(query.to_filter::<Camion>().predicates.is_empty());
        assert_eq!(query.to_filter::<Camion>().search.as_deref(), Some("abc"));
    }
}
