use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::metadata::EntityRef;
use crate::recipes::dataset::{
    dataset_from_records, dataset_from_rows, DatasetAlias, DatasetError, DatasetProvider, DatasetRequest,
    DatasetResults, RawDataset,
};
use crate::recipes::{builtin_recipes, Recipe, RecipeAlias, RecipeOutput, RecipeParameters};

pub(super) fn recipe(alias: RecipeAlias) -> Box<dyn Recipe> {
    builtin_recipes()
        .into_iter()
        .find(|recipe| recipe.alias() == alias)
        .expect("recipe is registered")
}

pub(super) fn records(values: Vec<Value>) -> RawDataset {
    dataset_from_records(values)
}

pub(super) fn no_dependencies() -> RawDataset {
    RawDataset::new()
}

/// Rows keyed by position, for datasets whose records share ids (dependency edges).
pub(super) fn rows(values: Vec<Value>) -> RawDataset {
    dataset_from_rows(values)
}

pub(super) fn run(alias: RecipeAlias, datasets: &DatasetResults) -> RecipeOutput {
    run_with(alias, datasets, &RecipeParameters::new())
}

pub(super) fn run_with(
    alias: RecipeAlias,
    datasets: &DatasetResults,
    parameters: &RecipeParameters,
) -> RecipeOutput {
    recipe(alias)
        .transform(datasets, parameters)
        .expect("recipe transforms")
}

pub(super) fn list(output: RecipeOutput) -> Vec<EntityRef> {
    match output {
        RecipeOutput::List(entities) => entities,
        other => panic!("expected a list, got {}", other.kind()),
    }
}

pub(super) fn find(entities: &[EntityRef], id: &str) -> EntityRef {
    entities
        .iter()
        .find(|entity| entity.id().as_deref() == Some(id))
        .cloned()
        .unwrap_or_else(|| panic!("entity {id} is listed"))
}

pub(super) fn reasons(entity: &EntityRef) -> Vec<u32> {
    entity
        .read()
        .score()
        .map(|card| card.bad_reason_ids().to_vec())
        .unwrap_or_default()
}

pub(super) fn ids(entities: &[EntityRef]) -> Vec<String> {
    entities.iter().filter_map(EntityRef::id).collect()
}

pub(super) fn objects() -> RawDataset {
    records(vec![
        json!({ "id": "Account", "name": "Account", "label": "Account" }),
        json!({ "id": "Invoice__c", "name": "Invoice__c", "label": "Invoice", "isCustom": true }),
    ])
}

pub(super) fn profiles() -> RawDataset {
    records(vec![
        json!({
            "id": "00e1", "name": "System Administrator", "isCustom": false,
            "importantPermissions": { "modifyAllData": true }
        }),
        json!({ "id": "00e2", "name": "Sales Rep", "isCustom": true, "description": "Sales team" }),
        json!({ "id": "00e3", "name": "Unused Custom", "isCustom": true }),
    ])
}

pub(super) fn permission_sets() -> RawDataset {
    records(vec![
        json!({ "id": "0PS1", "name": "Invoice Access", "isCustom": true, "description": "Invoices" }),
        json!({
            "id": "0PS2", "name": "Data Steward", "isCustom": true, "description": "Cleanup",
            "importantPermissions": { "viewAllData": true }
        }),
        json!({ "id": "0PS3", "name": "Empty Set", "isCustom": true }),
    ])
}

pub(super) fn users() -> RawDataset {
    records(vec![
        json!({ "id": "005A", "name": "Ada", "profileId": "00e1", "userRoleId": "R1", "isActive": true, "lastLogin": "2024-01-01T00:00:00Z", "onLightningExperience": true }),
        json!({ "id": "005B", "name": "Brook", "profileId": "00e2", "userRoleId": "R2", "isActive": true, "lastLogin": "2024-01-01T00:00:00Z", "onLightningExperience": true }),
        json!({ "id": "005C", "name": "Cam", "profileId": "00e2", "userRoleId": "R2", "isActive": false }),
    ])
}

pub(super) fn assignments() -> RawDataset {
    records(vec![
        json!({ "id": "0Pa1", "assigneeId": "005B", "permissionSetId": "0PS1" }),
        json!({ "id": "0Pa2", "assigneeId": "005B", "permissionSetId": "0PS2" }),
        json!({ "id": "0Pa3", "assigneeId": "005A", "permissionSetId": "0PS1" }),
    ])
}

/// Provider serving fixed datasets and counting fetches per cache key.
pub(super) struct FixtureProvider {
    datasets: HashMap<String, RawDataset>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl FixtureProvider {
    pub(super) fn new() -> Self {
        Self {
            datasets: HashMap::new(),
            fetches: Mutex::new(HashMap::new()),
        }
    }

    pub(super) fn with(mut self, cache_key: &str, dataset: RawDataset) -> Self {
        self.datasets.insert(cache_key.to_string(), dataset);
        self
    }

    pub(super) fn fetches(&self, cache_key: &str) -> usize {
        self.fetches
            .lock()
            .expect("fetch counter lock")
            .get(cache_key)
            .copied()
            .unwrap_or(0)
    }
}

impl DatasetProvider for FixtureProvider {
    fn fetch(&self, request: &DatasetRequest) -> Result<RawDataset, DatasetError> {
        let cache_key = request.cache_key();
        *self
            .fetches
            .lock()
            .expect("fetch counter lock")
            .entry(cache_key.clone())
            .or_default() += 1;
        self.datasets
            .get(&cache_key)
            .cloned()
            .ok_or(DatasetError::NotFound { cache_key })
    }
}

pub(super) fn with_dependencies(datasets: DatasetResults) -> DatasetResults {
    datasets.with(DatasetAlias::Dependencies, no_dependencies())
}
