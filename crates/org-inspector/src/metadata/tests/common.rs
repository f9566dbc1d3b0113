use std::sync::Arc;

use serde_json::{json, Value};

use crate::metadata::{
    DependencyEdge, DependencyGraph, Entity, EntityConfig, EntityFactory, EntityVariant,
    VariantFactory,
};

pub(super) fn factory(variant: EntityVariant) -> Arc<VariantFactory> {
    EntityFactory::instance(variant)
}

pub(super) fn edge(id: &str, kind: &str, ref_id: &str, ref_kind: &str) -> DependencyEdge {
    DependencyEdge {
        id: id.to_string(),
        name: format!("{id} name"),
        kind: kind.to_string(),
        url: format!("/{id}"),
        ref_id: ref_id.to_string(),
        ref_name: format!("{ref_id} name"),
        ref_kind: ref_kind.to_string(),
        ref_url: format!("/{ref_id}"),
    }
}

/// Graph where `F2` is used by a layout and `F1` is only a consumer.
pub(super) fn field_graph() -> DependencyGraph {
    DependencyGraph::new(
        vec![
            edge("L1", "Layout", "F2", "CustomField"),
            edge("F1", "CustomField", "F3", "CustomField"),
        ],
        Vec::new(),
    )
}

pub(super) fn scored(variant: EntityVariant, properties: Value) -> Entity {
    factory(variant)
        .create_with_score(EntityConfig::new(properties))
        .expect("entity builds")
}

pub(super) fn scored_with_graph(
    variant: EntityVariant,
    properties: Value,
    graph: &DependencyGraph,
) -> Entity {
    factory(variant)
        .create_with_score(EntityConfig::new(properties).with_dependencies(graph))
        .expect("entity builds")
}

pub(super) fn reason_ids(entity: &Entity) -> Vec<u32> {
    entity
        .score()
        .map(|card| card.bad_reason_ids().to_vec())
        .unwrap_or_default()
}

pub(super) fn custom_field() -> Value {
    json!({ "id": "F1", "isCustom": true })
}
