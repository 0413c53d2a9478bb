//! `data` table: bulk insert-or-skip and the read queries.

use rusqlite::types::ToSql;
use rusqlite::{params, Row};

use super::*;
use crate::helpers::is_valid_entity_id;

/// Bound parameters per `data` row.
const COLUMNS_PER_ENTITY: usize = 5;

/// Rows per INSERT statement. Keeps the parameter count well under SQLite's
/// variable limit; a normal run (a few hundred people) fits in one statement.
const MAX_ROWS_PER_STATEMENT: usize = 1000;

/// Build `(?1,?2,?3,?4,?5),(?6,?7,?8,?9,?10),...` for `rows` entities.
fn values_placeholders(rows: usize) -> String {
    (0..rows)
        .map(|row| {
            let first = row * COLUMNS_PER_ENTITY + 1;
            let group: Vec<String> = (first..first + COLUMNS_PER_ENTITY)
                .map(|n| format!("?{}", n))
                .collect();
            format!("({})", group.join(","))
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn map_entity(row: &Row<'_>) -> rusqlite::Result<Entity> {
    Ok(Entity {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        height: row.get(3)?,
        image: row.get(4)?,
    })
}

impl HeightDb {
    /// Insert entities, skipping any whose id is already stored.
    ///
    /// Existing rows are never overwritten. Returns the number of rows the
    /// engine reports as newly inserted. Callers that need atomicity across
    /// chunks run this inside `with_transaction`.
    pub fn insert_entities_skip_existing(&self, entities: &[Entity]) -> Result<usize, DbError> {
        let mut inserted = 0;
        for chunk in entities.chunks(MAX_ROWS_PER_STATEMENT) {
            let sql = format!(
                "INSERT INTO data (id, name, description, height, image)
                 VALUES {}
                 ON CONFLICT (id) DO NOTHING",
                values_placeholders(chunk.len())
            );

            let mut values: Vec<&dyn ToSql> = Vec::with_capacity(chunk.len() * COLUMNS_PER_ENTITY);
            for entity in chunk {
                values.push(&entity.id);
                values.push(&entity.name);
                values.push(&entity.description);
                values.push(&entity.height);
                values.push(&entity.image);
            }

            inserted += self.conn.execute(&sql, values.as_slice())?;
        }
        Ok(inserted)
    }

    /// Every stored entity, in insertion order.
    pub fn get_all_entities(&self) -> Result<Vec<Entity>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, height, image FROM data ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], map_entity)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Look up one entity by its Wikidata id (`Q` followed by digits).
    pub fn get_entity(&self, id: &str) -> Result<Option<Entity>, DbError> {
        if !is_valid_entity_id(id) {
            return Err(DbError::InvalidId(id.to_string()));
        }
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, height, image FROM data WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], map_entity)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Up to `limit` entities in random order.
    pub fn get_random_entities(&self, limit: usize) -> Result<Vec<Entity>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, height, image FROM data ORDER BY RANDOM() LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], map_entity)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Number of rows in `data`.
    pub fn count_entities(&self) -> Result<i64, DbError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM data", [], |row| row.get(0))?)
    }
}
