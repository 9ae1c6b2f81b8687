//! Contrato genérico de entidad
//!
//! Cada tabla del dominio (clientes, camiones, días de entrega) describe aquí
//! cómo se lista, busca, ordena y borra. Los repositorios y el controlador
//! CRUD son genéricos sobre este trait, de modo que el patrón
//! buscar / filtrar / paginar se implementa una sola vez.

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};

use crate::dto::list_dto::ListQuery;
use crate::models::asignacion::AssignmentSide;

/// Identificador sustituto (SERIAL) de todas las tablas
pub type EntityId = i32;

/// Política de borrado de una entidad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// `DELETE ... RETURNING`
    Hard,
    /// `UPDATE ... SET <flag_column> = FALSE RETURNING`
    Soft { flag_column: &'static str },
}

/// Textos usados en mensajes y errores de cada entidad
#[derive(Debug, Clone, Copy)]
pub struct EntityLabels {
    pub singular: &'static str,
    pub plural: &'static str,
    pub not_found: &'static str,
    pub invalid_id: &'static str,
    pub invalid_payload: &'static str,
    pub duplicate: &'static str,
    pub in_use: &'static str,
}

/// Valor tipado de una columna escribible
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Bool(bool),
    Float(Option<f64>),
}

/// Asignación `columna = valor`. La lista de columnas posibles de cada
/// entidad está cerrada: sólo sus payloads construyen `FieldChange`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub column: &'static str,
    pub value: FieldValue,
}

impl FieldChange {
    pub fn text(column: &'static str, value: Option<String>) -> Self {
        Self {
            column,
            value: FieldValue::Text(value),
        }
    }

    pub fn boolean(column: &'static str, value: bool) -> Self {
        Self {
            column,
            value: FieldValue::Bool(value),
        }
    }

    pub fn float(column: &'static str, value: Option<f64>) -> Self {
        Self {
            column,
            value: FieldValue::Float(value),
        }
    }
}

/// Payload de escritura (completo o parcial) de una entidad
pub trait ChangeSet: DeserializeOwned + Send + Sync + 'static {
    /// Todas las violaciones de reglas de campo, no sólo la primera
    fn validation_errors(&self) -> Vec<String>;

    /// Columnas a escribir, en el orden de la tabla
    fn changes(&self) -> Vec<FieldChange>;

    fn is_empty(&self) -> bool {
        self.changes().is_empty()
    }
}

/// Filtro de igualdad adicional (`AND column = value`)
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub value: FieldValue,
}

/// Filtro de listado ya normalizado
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilter {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub predicates: Vec<Predicate>,
}

impl ListFilter {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 10;

    pub fn new(page: i64, limit: i64, search: Option<String>, predicates: Vec<Predicate>) -> Self {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search,
            predicates,
        }
    }

    /// Desplazamiento de la página; satura en vez de desbordar con páginas enormes
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for ListFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT, None, Vec::new())
    }
}

/// Página de resultados y total de filas que cumplen el filtro
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Entidad persistida en una tabla propia
pub trait Entity:
    for<'r> FromRow<'r, PgRow> + Serialize + Clone + Send + Sync + Unpin + 'static
{
    /// Payload de POST / PUT
    type Payload: ChangeSet;
    /// Payload de PATCH
    type Patch: ChangeSet;

    const TABLE: &'static str;
    /// Columnas devueltas por SELECT y RETURNING
    const COLUMNS: &'static str;
    /// Columnas de texto sobre las que actúa `search` (ILIKE, unidas con OR)
    const SEARCH_COLUMNS: &'static [&'static str];
    const ORDER_BY: &'static str;
    const DELETE_POLICY: DeletePolicy;
    /// Lado de `camiones_dias` que impide el borrado mientras tenga filas
    const USAGE_GUARD: Option<AssignmentSide>;
    const LABELS: EntityLabels;

    fn id(&self) -> EntityId;

    /// Filtros específicos de la entidad tomados de la query de listado
    fn list_predicates(_query: &ListQuery) -> Vec<Predicate> {
        Vec::new()
    }
}
