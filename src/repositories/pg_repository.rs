//! Repositorio PostgreSQL genérico
//!
//! Una sola implementación de listar / buscar / paginar / escribir para
//! todas las entidades. Las sentencias se arman con `sqlx::QueryBuilder`
//! a partir de las constantes del trait `Entity`; los valores siempre se
//! envían como parámetros.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::cliente::{Cliente, Ubicacion};
use crate::models::entity::{
    DeletePolicy, Entity, EntityId, FieldChange, FieldValue, ListFilter, Page,
};
use crate::models::usuario::{Usuario, UsuarioStats};
use crate::repositories::store::{ClienteStore, EntityStore, UsuarioStore};
use crate::utils::errors::{AppError, AppResult, ConflictKind};

/// Escapa los comodines de `LIKE` para que `search` sea una subcadena literal
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Traduce un error del driver usando los textos de la entidad
pub fn map_entity_error<E: Entity>(err: sqlx::Error) -> AppError {
    match AppError::from(err) {
        AppError::Conflict {
            kind: ConflictKind::Duplicate,
            ..
        } => AppError::duplicate(E::LABELS.duplicate),
        AppError::Conflict {
            kind: ConflictKind::Referential,
            ..
        } => AppError::referential(E::LABELS.in_use),
        other => other,
    }
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: &FieldValue) {
    match value {
        FieldValue::Text(text) => builder.push_bind(text.clone()),
        FieldValue::Bool(flag) => builder.push_bind(*flag),
        FieldValue::Float(number) => builder.push_bind(*number),
    };
}

/// `WHERE` con los predicados de igualdad y la búsqueda ILIKE
fn push_where<E: Entity>(builder: &mut QueryBuilder<'static, Postgres>, filter: &ListFilter) {
    let mut keyword = " WHERE ";
    for predicate in &filter.predicates {
        builder.push(keyword).push(predicate.column).push(" = ");
        push_value(builder, &predicate.value);
        keyword = " AND ";
    }

    if let Some(search) = &filter.search {
        if !E::SEARCH_COLUMNS.is_empty() {
            let pattern = format!("%{}%", escape_like(search));
            builder.push(keyword).push("(");
            for (i, column) in E::SEARCH_COLUMNS.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder.push(*column).push(" ILIKE ");
                builder.push_bind(pattern.clone());
            }
            builder.push(")");
        }
    }
}

pub(crate) fn list_query<E: Entity>(filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM {}", E::COLUMNS, E::TABLE));
    push_where::<E>(&mut builder, filter);
    builder.push(format!(" ORDER BY {} LIMIT ", E::ORDER_BY));
    builder.push_bind(filter.limit);
    builder.push(" OFFSET ");
    builder.push_bind(filter.offset());
    builder
}

pub(crate) fn count_query<E: Entity>(filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", E::TABLE));
    push_where::<E>(&mut builder, filter);
    builder
}

pub(crate) fn insert_query<E: Entity>(changes: &[FieldChange]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("INSERT INTO {} (", E::TABLE));
    {
        let mut columns = builder.separated(", ");
        for change in changes {
            columns.push(change.column);
        }
    }
    builder.push(") VALUES (");
    for (i, change) in changes.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_value(&mut builder, &change.value);
    }
    builder.push(format!(") RETURNING {}", E::COLUMNS));
    builder
}

/// `UPDATE` con exactamente las columnas recibidas; sirve para PUT y PATCH
pub(crate) fn update_query<E: Entity>(
    id: EntityId,
    changes: &[FieldChange],
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", E::TABLE));
    for change in changes {
        builder.push(change.column).push(" = ");
        push_value(&mut builder, &change.value);
        builder.push(", ");
    }
    builder.push("updated_at = NOW() WHERE id = ");
    builder.push_bind(id);
    builder.push(format!(" RETURNING {}", E::COLUMNS));
    builder
}

pub(crate) fn delete_query<E: Entity>(id: EntityId) -> QueryBuilder<'static, Postgres> {
    let mut builder = match E::DELETE_POLICY {
        DeletePolicy::Hard => QueryBuilder::new(format!("DELETE FROM {} WHERE id = ", E::TABLE)),
        DeletePolicy::Soft { flag_column } => QueryBuilder::new(format!(
            "UPDATE {} SET {} = FALSE, updated_at = NOW() WHERE id = ",
            E::TABLE,
            flag_column
        )),
    };
    builder.push_bind(id);
    builder.push(format!(" RETURNING {}", E::COLUMNS));
    builder
}

pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> PgRepository<E> {
    async fn fetch_optional(
        &self,
        mut builder: QueryBuilder<'static, Postgres>,
    ) -> AppResult<Option<E>> {
        builder
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_entity_error::<E>)
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for PgRepository<E> {
    async fn list_page(&self, filter: &ListFilter) -> AppResult<Page<E>> {
        let mut items_query = list_query::<E>(filter);
        let items = items_query
            .build_query_as::<E>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_entity_error::<E>)?;

        let mut total_query = count_query::<E>(filter);
        let (total,) = total_query
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_entity_error::<E>)?;

        Ok(Page { items, total })
    }

    async fn find_by_id(&self, id: EntityId) -> AppResult<Option<E>> {
        let query = format!("SELECT {} FROM {} WHERE id = $1", E::COLUMNS, E::TABLE);
        sqlx::query_as::<_, E>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_entity_error::<E>)
    }

    async fn create(&self, changes: &[FieldChange]) -> AppResult<E> {
        let mut builder = insert_query::<E>(changes);
        let entity = builder
            .build_query_as::<E>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_entity_error::<E>)?;

        tracing::debug!(table = E::TABLE, id = entity.id(), "fila creada");
        Ok(entity)
    }

    async fn update(&self, id: EntityId, changes: &[FieldChange]) -> AppResult<Option<E>> {
        self.fetch_optional(update_query::<E>(id, changes)).await
    }

    async fn patch(&self, id: EntityId, changes: &[FieldChange]) -> AppResult<Option<E>> {
        if changes.is_empty() {
            return Err(AppError::InvalidArgument(
                "No se proporcionaron datos para actualizar".to_string(),
            ));
        }
        self.fetch_optional(update_query::<E>(id, changes)).await
    }

    async fn delete(&self, id: EntityId) -> AppResult<Option<E>> {
        self.fetch_optional(delete_query::<E>(id)).await
    }

    async fn count(&self) -> AppResult<i64> {
        let query = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        let (total,) = sqlx::query_as::<_, (i64,)>(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(map_entity_error::<E>)?;
        Ok(total)
    }
}

#[async_trait]
impl ClienteStore for PgRepository<Cliente> {
    async fn find_ubicacion(&self, id: EntityId) -> AppResult<Option<Ubicacion>> {
        let ubicacion = sqlx::query_as::<_, Ubicacion>(
            "SELECT id, nombre, x, y FROM clientes WHERE id = $1 AND x IS NOT NULL AND y IS NOT NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ubicacion)
    }

    async fn list_activos(&self) -> AppResult<Vec<Cliente>> {
        let query = format!(
            "SELECT {} FROM clientes WHERE activo = TRUE ORDER BY {}",
            Cliente::COLUMNS,
            Cliente::ORDER_BY
        );
        let clientes = sqlx::query_as::<_, Cliente>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(clientes)
    }

    async fn list_con_ubicacion(&self) -> AppResult<Vec<Cliente>> {
        let query = format!(
            "SELECT {} FROM clientes WHERE x IS NOT NULL AND y IS NOT NULL ORDER BY {}",
            Cliente::COLUMNS,
            Cliente::ORDER_BY
        );
        let clientes = sqlx::query_as::<_, Cliente>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(clientes)
    }
}

#[async_trait]
impl UsuarioStore for PgRepository<Usuario> {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Usuario>> {
        let query = format!("SELECT {} FROM usuarios WHERE email = $1", Usuario::COLUMNS);
        let usuario = sqlx::query_as::<_, Usuario>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usuario)
    }

    async fn record_login(&self, id: EntityId) -> AppResult<Option<Usuario>> {
        let query = format!(
            "UPDATE usuarios SET last_login = NOW() WHERE id = $1 RETURNING {}",
            Usuario::COLUMNS
        );
        let usuario = sqlx::query_as::<_, Usuario>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(usuario)
    }

    async fn stats(&self) -> AppResult<UsuarioStats> {
        let (total, activos, inactivos) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE activo), COUNT(*) FILTER (WHERE NOT activo) FROM usuarios",
        )
        .fetch_one(&self.pool)
        .await?;

        let por_rol = sqlx::query_as::<_, (String, i64)>(
            "SELECT rol, COUNT(*) FROM usuarios GROUP BY rol ORDER BY rol",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        Ok(UsuarioStats {
            total,
            activos,
            inactivos,
            por_rol,
        })
    }
}
