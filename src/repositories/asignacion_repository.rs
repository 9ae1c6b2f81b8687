//! Repositorio PostgreSQL de `camiones_dias`

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::models::asignacion::{AssignedEntity, AssignmentSide, EntityWithAssignments};
use crate::models::entity::EntityId;
use crate::repositories::store::{dedupe_ids, AssignmentStore};
use crate::utils::errors::{AppError, AppResult};

/// Fila plana dueño + contraparte opcional del LEFT JOIN
#[derive(Debug, FromRow)]
struct OwnerCounterpartRow {
    owner_id: EntityId,
    owner_descripcion: String,
    counterpart_id: Option<EntityId>,
    counterpart_descripcion: Option<String>,
}

pub(crate) fn counterparts_sql(side: AssignmentSide) -> String {
    let counterpart = side.counterpart();
    format!(
        "SELECT c.id, c.descripcion FROM {join} cd \
         JOIN {table} c ON c.id = cd.{counterpart_fk} \
         WHERE cd.{owner_fk} = $1 ORDER BY {order}",
        join = AssignmentSide::JOIN_TABLE,
        table = counterpart.table(),
        counterpart_fk = counterpart.foreign_key(),
        owner_fk = side.foreign_key(),
        order = counterpart.order_by("c"),
    )
}

pub(crate) fn with_counterparts_sql(side: AssignmentSide) -> String {
    let counterpart = side.counterpart();
    format!(
        "SELECT o.id AS owner_id, o.descripcion AS owner_descripcion, \
         c.id AS counterpart_id, c.descripcion AS counterpart_descripcion \
         FROM {owner_table} o \
         LEFT JOIN {join} cd ON cd.{owner_fk} = o.id \
         LEFT JOIN {counterpart_table} c ON c.id = cd.{counterpart_fk} \
         ORDER BY {owner_order}, {counterpart_order}",
        owner_table = side.table(),
        join = AssignmentSide::JOIN_TABLE,
        owner_fk = side.foreign_key(),
        counterpart_table = counterpart.table(),
        counterpart_fk = counterpart.foreign_key(),
        owner_order = side.order_by("o"),
        counterpart_order = counterpart.order_by("c"),
    )
}

/// Agrupa las filas ya ordenadas por dueño
fn group_rows(rows: Vec<OwnerCounterpartRow>) -> Vec<EntityWithAssignments> {
    let mut grouped: Vec<EntityWithAssignments> = Vec::new();
    for row in rows {
        let same_owner = grouped.last().map_or(false, |last| last.id == row.owner_id);
        if !same_owner {
            grouped.push(EntityWithAssignments {
                id: row.owner_id,
                descripcion: row.owner_descripcion,
                asignados: Vec::new(),
            });
        }
        if let (Some(id), Some(descripcion), Some(owner)) =
            (row.counterpart_id, row.counterpart_descripcion, grouped.last_mut())
        {
            owner.asignados.push(AssignedEntity { id, descripcion });
        }
    }
    grouped
}

pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn owner_exists(&self, side: AssignmentSide, id: EntityId) -> AppResult<bool> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", side.table());
        let exists = sqlx::query_scalar::<_, bool>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentRepository {
    async fn is_referenced(&self, side: AssignmentSide, id: EntityId) -> AppResult<bool> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = $1",
            AssignmentSide::JOIN_TABLE,
            side.foreign_key()
        );
        let count = sqlx::query_scalar::<_, i64>(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn list_counterparts(
        &self,
        side: AssignmentSide,
        id: EntityId,
    ) -> AppResult<Vec<AssignedEntity>> {
        if !self.owner_exists(side, id).await? {
            return Err(AppError::NotFound(side.labels().not_found.to_string()));
        }

        let query = counterparts_sql(side);
        let counterparts = sqlx::query_as::<_, AssignedEntity>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(counterparts)
    }

    async fn replace(
        &self,
        side: AssignmentSide,
        id: EntityId,
        counterpart_ids: &[EntityId],
    ) -> AppResult<()> {
        let counterpart = side.counterpart();
        let ids = dedupe_ids(counterpart_ids);

        // Cualquier `?` antes del commit descarta la transacción (rollback)
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE serializa reemplazos concurrentes sobre el mismo dueño
        let lock_owner = format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", side.table());
        let owner = sqlx::query_scalar::<_, EntityId>(&lock_owner)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if owner.is_none() {
            return Err(AppError::NotFound(side.labels().not_found.to_string()));
        }

        if !ids.is_empty() {
            let existing_query = format!("SELECT id FROM {} WHERE id = ANY($1)", counterpart.table());
            let existing = sqlx::query_scalar::<_, EntityId>(&existing_query)
                .bind(ids.as_slice())
                .fetch_all(&mut *tx)
                .await?;
            let missing: Vec<String> = ids
                .iter()
                .filter(|id| !existing.contains(*id))
                .map(|id| id.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(AppError::InvalidArgument(format!(
                    "{} inexistentes: {}",
                    counterpart.labels().plural,
                    missing.join(", ")
                )));
            }
        }

        let delete = format!(
            "DELETE FROM {} WHERE {} = $1",
            AssignmentSide::JOIN_TABLE,
            side.foreign_key()
        );
        let removed = sqlx::query(&delete).bind(id).execute(&mut *tx).await?;

        if !ids.is_empty() {
            let mut insert: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                "INSERT INTO {} (camion_id, dia_entrega_id) ",
                AssignmentSide::JOIN_TABLE
            ));
            insert.push_values(ids.iter(), |mut row, counterpart_id| {
                let (camion_id, dia_entrega_id) = side.pair(id, *counterpart_id);
                row.push_bind(camion_id).push_bind(dia_entrega_id);
            });
            insert.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::info!(
            owner = side.table(),
            id,
            removed = removed.rows_affected(),
            inserted = ids.len(),
            "🔗 Asignaciones reemplazadas"
        );
        Ok(())
    }

    async fn list_with_counterparts(
        &self,
        side: AssignmentSide,
    ) -> AppResult<Vec<EntityWithAssignments>> {
        let query = with_counterparts_sql(side);
        let rows = sqlx::query_as::<_, OwnerCounterpartRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(group_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_de_contrapartes() {
        assert_eq!(
            counterparts_sql(AssignmentSide::Camion),
            "SELECT c.id, c.descripcion FROM camiones_dias cd JOIN dias_entrega c ON c.id = cd.dia_entrega_id WHERE cd.camion_id = $1 ORDER BY c.id ASC"
        );
        assert!(counterparts_sql(AssignmentSide::DiaEntrega)
            .ends_with("WHERE cd.dia_entrega_id = $1 ORDER BY c.descripcion ASC, c.id ASC"));
    }

    #[test]
    fn test_sql_con_contrapartes_usa_left_join() {
        let sql = with_counterparts_sql(AssignmentSide::Camion);
        assert!(sql.contains("FROM camiones o LEFT JOIN camiones_dias cd ON cd.camion_id = o.id"));
        assert!(sql.ends_with("ORDER BY o.descripcion ASC, o.id ASC, c.id ASC"));
    }

    #[test]
    fn test_agrupar_filas() {
        let row = |owner_id, owner: &str, counterpart: Option<(i32, &str)>| OwnerCounterpartRow {
            owner_id,
            owner_descripcion: owner.to_string(),
            counterpart_id: counterpart.map(|c| c.0),
            counterpart_descripcion: counterpart.map(|c| c.1.to_string()),
        };
        let grouped = group_rows(vec![
            row(1, "Alvaro Garcia", Some((1, "Lunes"))),
            row(1, "Alvaro Garcia", Some((2, "Martes"))),
            row(2, "Daniel Torres", None),
        ]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].asignados.len(), 2);
        assert_eq!(grouped[0].asignados[1].descripcion, "Martes");
        assert!(grouped[1].asignados.is_empty());
    }
}
