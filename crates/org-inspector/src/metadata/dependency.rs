use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Directed edge: `id` depends on `ref_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub url: String,
    pub ref_id: String,
    #[serde(default)]
    pub ref_name: String,
    #[serde(rename = "refType", default)]
    pub ref_kind: String,
    #[serde(default)]
    pub ref_url: String,
}

/// One side of an edge as seen from the queried item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Global edge list plus the identifiers whose lookup failed upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub edges: Vec<DependencyEdge>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Per-item directional slice of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyView {
    pub had_error: bool,
    pub using: Vec<DependencyItem>,
    pub referenced: Vec<DependencyItem>,
    pub referenced_by_types: BTreeMap<String, usize>,
}

impl DependencyView {
    fn failed() -> Self {
        Self {
            had_error: true,
            ..Self::default()
        }
    }
}

/// Raised when a raw dependency row matches neither an edge nor a failure marker.
#[derive(Debug, thiserror::Error)]
#[error("dependency row {row} is malformed: {source}")]
pub struct DependencyError {
    pub row: usize,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DependencyRow {
    Failure {
        #[serde(rename = "failedId")]
        failed_id: String,
    },
    Edge(DependencyEdge),
}

impl DependencyGraph {
    pub fn new(edges: Vec<DependencyEdge>, errors: Vec<String>) -> Self {
        Self { edges, errors }
    }

    /// Builds a graph from raw rows: edges, or `{ "failedId": .. }` markers.
    pub fn from_records<'a, I>(records: I) -> Result<Self, DependencyError>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut graph = Self::default();
        for (row, record) in records.into_iter().enumerate() {
            match DependencyRow::deserialize(record)
                .map_err(|source| DependencyError { row, source })?
            {
                DependencyRow::Failure { failed_id } => graph.errors.push(failed_id),
                DependencyRow::Edge(edge) => graph.edges.push(edge),
            }
        }
        Ok(graph)
    }

    /// Builds a graph from a raw dependency dataset; row keys are ignored.
    pub fn from_dataset(dataset: &IndexMap<String, Value>) -> Result<Self, DependencyError> {
        Self::from_records(dataset.values())
    }

    pub fn resolve<S: AsRef<str>>(&self, targets: &[S]) -> DependencyView {
        let targets: BTreeSet<&str> = targets.iter().map(AsRef::as_ref).collect();
        resolve(self, &targets)
    }
}

/// Computes the "using" and "referenced" views for `targets` in one pass over the edges.
///
/// Any target listed in `graph.errors` short-circuits to an empty view flagged with
/// `had_error`, so a failed lookup is never mixed with partial results.
/// Costs O(edges) per call; callers resolving many items should batch.
pub fn resolve(graph: &DependencyGraph, targets: &BTreeSet<&str>) -> DependencyView {
    if graph
        .errors
        .iter()
        .any(|failed| targets.contains(failed.as_str()))
    {
        return DependencyView::failed();
    }

    let mut view = DependencyView::default();
    for edge in &graph.edges {
        if targets.contains(edge.id.as_str()) {
            view.using.push(DependencyItem {
                id: edge.ref_id.clone(),
                name: edge.ref_name.clone(),
                kind: edge.ref_kind.clone(),
                url: edge.ref_url.clone(),
            });
        }
        if targets.contains(edge.ref_id.as_str()) {
            view.referenced.push(DependencyItem {
                id: edge.id.clone(),
                name: edge.name.clone(),
                kind: edge.kind.clone(),
                url: edge.url.clone(),
            });
            *view
                .referenced_by_types
                .entry(edge.kind.clone())
                .or_default() += 1;
        }
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn edge(id: &str, kind: &str, ref_id: &str, ref_kind: &str) -> DependencyEdge {
        DependencyEdge {
            id: id.to_string(),
            name: format!("{id}-name"),
            kind: kind.to_string(),
            url: format!("/{id}"),
            ref_id: ref_id.to_string(),
            ref_name: format!("{ref_id}-name"),
            ref_kind: ref_kind.to_string(),
            ref_url: format!("/{ref_id}"),
        }
    }

    #[test]
    fn resolves_both_directions_in_source_order() {
        let graph = DependencyGraph::new(
            vec![
                edge("P1", "ApexPage", "C1", "ApexClass"),
                edge("C1", "ApexClass", "L1", "CustomLabel"),
                edge("T1", "ApexTrigger", "C1", "ApexClass"),
                edge("C1", "ApexClass", "L2", "CustomLabel"),
            ],
            Vec::new(),
        );

        let view = graph.resolve(&["C1"]);

        assert!(!view.had_error);
        let using: Vec<&str> = view.using.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(using, vec!["L1", "L2"]);
        let referenced: Vec<&str> = view.referenced.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(referenced, vec!["P1", "T1"]);
        assert_eq!(view.referenced_by_types.get("ApexPage"), Some(&1));
        assert_eq!(view.referenced_by_types.get("ApexTrigger"), Some(&1));
    }

    #[test]
    fn multi_id_targets_merge_views() {
        let graph = DependencyGraph::new(
            vec![
                edge("X", "Flow", "V1", "FlowVersion"),
                edge("Y", "Flow", "D1", "FlowDefinition"),
            ],
            Vec::new(),
        );

        let view = graph.resolve(&["V1", "D1"]);

        assert_eq!(view.referenced.len(), 2);
        assert_eq!(view.referenced_by_types.get("Flow"), Some(&2));
    }

    #[test]
    fn failed_target_short_circuits() {
        let graph = DependencyGraph::new(
            vec![edge("P1", "ApexPage", "C1", "ApexClass")],
            vec!["C1".to_string()],
        );

        assert_eq!(graph.resolve(&["C1"]), DependencyView::failed());
        assert!(!graph.resolve(&["P1"]).had_error);
    }

    #[test]
    fn from_records_splits_edges_and_failures() {
        let rows = [
            json!({
                "id": "P1", "name": "Page", "type": "ApexPage", "url": "/P1",
                "refId": "C1", "refName": "Ctrl", "refType": "ApexClass", "refUrl": "/C1"
            }),
            json!({ "failedId": "C9" }),
        ];

        let graph = DependencyGraph::from_records(rows.iter()).expect("rows parse");

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].ref_kind, "ApexClass");
        assert_eq!(graph.errors, vec!["C9".to_string()]);
    }

    #[test]
    fn from_records_rejects_rows_without_ids() {
        let rows = [json!({ "name": "orphan" })];

        let err = DependencyGraph::from_records(rows.iter()).expect_err("row is malformed");

        assert_eq!(err.row, 0);
    }

    fn arb_edges() -> impl Strategy<Value = Vec<DependencyEdge>> {
        let ids = prop::sample::select(vec!["A", "B", "C", "D"]);
        prop::collection::vec(
            (ids.clone(), ids).prop_map(|(from, to)| edge(from, "Kind", to, "Kind")),
            0..16,
        )
    }

    proptest! {
        #[test]
        fn error_listed_target_is_always_empty(edges in arb_edges(), target in prop::sample::select(vec!["A", "B", "C", "D"])) {
            let graph = DependencyGraph::new(edges, vec![target.to_string()]);
            let view = graph.resolve(&[target]);
            prop_assert_eq!(view, DependencyView::failed());
        }

        #[test]
        fn referenced_counts_match_referenced_items(edges in arb_edges()) {
            let graph = DependencyGraph::new(edges, Vec::new());
            let view = graph.resolve(&["A"]);
            let counted: usize = view.referenced_by_types.values().sum();
            prop_assert_eq!(counted, view.referenced.len());
        }
    }
}
