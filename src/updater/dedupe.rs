//! Collapse repeated ids. The query returns one row per height statement, so
//! the same person can appear several times with different heights.

use std::collections::HashMap;

use crate::db::Entity;

/// One entity per id, carrying the tallest height seen for that id.
///
/// Output follows first-seen id order. For the other fields the last occurrence
/// wins; the source rows normally differ only in height.
pub fn dedupe_by_height(entities: Vec<Entity>) -> Vec<Entity> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(entities.len());
    let mut out: Vec<Entity> = Vec::with_capacity(entities.len());

    for entity in entities {
        match slots.get(&entity.id) {
            Some(&slot) => {
                let height = out[slot].height.max(entity.height);
                out[slot] = Entity { height, ..entity };
            }
            None => {
                slots.insert(entity.id.clone(), out.len());
                out.push(entity);
            }
        }
    }

    out
}
