//! Turn SPARQL result rows into `Entity` records.
//!
//! A row with any missing or unusable field is dropped; only a payload without
//! `results.bindings` is an error.

use serde::Deserialize;

use crate::db::Entity;
use crate::error::UpdateError;
use crate::helpers::{capitalize_first, extract_entity_id};
use crate::wikidata::client::{RawBinding, RawTerm, SparqlResponse};

use super::normalize::normalize_height;

fn non_empty(term: Option<&RawTerm>) -> Option<&str> {
    term.map(|t| t.value.as_str()).filter(|v| !v.trim().is_empty())
}

/// Build an entity from one row, or `None` if the row is unusable.
pub fn entity_from_binding(binding: &RawBinding) -> Option<Entity> {
    let id = extract_entity_id(non_empty(binding.item.as_ref())?)?;
    let name = non_empty(binding.item_label.as_ref())?;
    let description = non_empty(binding.item_description.as_ref())?;
    let image = non_empty(binding.image.as_ref())?;
    let height = normalize_height(
        non_empty(binding.height_value.as_ref())?,
        non_empty(binding.height_unit_label.as_ref())?,
    )?;
    if height <= 0 {
        return None;
    }

    Some(Entity {
        id,
        name: name.to_string(),
        description: capitalize_first(description),
        height,
        image: image.to_string(),
    })
}

/// Extract entities in row order, skipping malformed rows.
pub fn extract_entities(response: &SparqlResponse) -> Result<Vec<Entity>, UpdateError> {
    let bindings = response
        .results
        .as_ref()
        .ok_or_else(|| UpdateError::Extraction("response has no 'results'".to_string()))?
        .bindings
        .as_ref()
        .ok_or_else(|| UpdateError::Extraction("response has no 'results.bindings'".to_string()))?;

    let mut entities = Vec::with_capacity(bindings.len());
    for (index, row) in bindings.iter().enumerate() {
        let binding = match RawBinding::deserialize(row) {
            Ok(b) => b,
            Err(_) => {
                log::debug!("Skipping row {}: not a binding object", index);
                continue;
            }
        };
        match entity_from_binding(&binding) {
            Some(entity) => entities.push(entity),
            None => log::debug!("Skipping row {}: missing or invalid field", index),
        }
    }

    let dropped = bindings.len() - entities.len();
    if dropped > 0 {
        log::info!(
            "Extracted {} entities from {} rows ({} dropped)",
            entities.len(),
            bindings.len(),
            dropped
        );
    }
    Ok(entities)
}
