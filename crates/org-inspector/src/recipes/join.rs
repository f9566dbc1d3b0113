//! Reference resolution between entity sets.
//!
//! Joins pair an `xId`/`xIds` property with its `xRef`/`xRefs` sibling. Ids
//! missing from the target index are skipped: cross-dataset completeness is
//! not guaranteed, so a dangling id is normal.

use serde_json::Value;
use std::collections::HashMap;

use crate::metadata::{Entity, EntityRef};

use super::RecipeError;

/// Identifier → shared entity.
pub type EntityIndex = HashMap<String, EntityRef>;

pub fn index_by_id<'a, I>(entities: I) -> EntityIndex
where
    I: IntoIterator<Item = &'a EntityRef>,
{
    entities
        .into_iter()
        .filter_map(|entity| entity.id().map(|id| (id, entity.clone())))
        .collect()
}

/// Links `ref_field` to the entity named by `id_field`. Returns whether a link was made.
pub fn resolve_reference(
    entity: &mut Entity,
    id_field: &str,
    ref_field: &str,
    targets: &EntityIndex,
) -> Result<bool, RecipeError> {
    let Some(target) = entity
        .text(id_field)?
        .and_then(|id| targets.get(id))
        .cloned()
    else {
        return Ok(false);
    };
    entity.set_ref(ref_field, target)?;
    Ok(true)
}

/// Links every resolvable id of the list `ids_field` into `refs_field`, in list order.
pub fn resolve_references(
    entity: &mut Entity,
    ids_field: &str,
    refs_field: &str,
    targets: &EntityIndex,
) -> Result<usize, RecipeError> {
    let linked: Vec<EntityRef> = match entity.value(ids_field)? {
        Some(Value::Array(ids)) => ids
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|id| targets.get(id))
            .cloned()
            .collect(),
        _ => Vec::new(),
    };
    let count = linked.len();
    for target in linked {
        entity.push_ref(refs_field, target)?;
    }
    Ok(count)
}
