use crate::metadata::EntityVariant;

use super::dataset::{DatasetAlias, DatasetRequest, DatasetResults};
use super::join::{index_by_id, resolve_reference};
use super::list::{build_entities, dependency_graph, score_and_share, share, BuildOptions};
use super::{NamespaceFilter, Recipe, RecipeAlias, RecipeError, RecipeOutput, RecipeParameters};

/// Custom fields, optionally restricted to one object (`object` parameter),
/// each linked to its object.
pub(crate) struct CustomFieldsRecipe;

impl Recipe for CustomFieldsRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::CustomFields
    }

    fn extract(&self, parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        let mut fields = DatasetRequest::new(DatasetAlias::CustomFields);
        if let Some(object) = parameters.get("object").map(str::trim).filter(|object| !object.is_empty()) {
            fields = fields.with_parameter(object);
        }
        Ok(vec![
            fields,
            DatasetRequest::new(DatasetAlias::Objects),
            DatasetRequest::new(DatasetAlias::Dependencies),
        ])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let raw_fields = datasets.require(DatasetAlias::CustomFields)?;
        let raw_objects = datasets.require(DatasetAlias::Objects)?;
        let graph = dependency_graph(datasets)?;
        let namespace = parameters.namespace();

        let objects = share(build_entities(
            raw_objects,
            DatasetAlias::Objects,
            &BuildOptions::new(EntityVariant::Object, &NamespaceFilter::Any).unscored(),
        )?);
        let objects = index_by_id(&objects);

        let mut fields = build_entities(
            raw_fields,
            DatasetAlias::CustomFields,
            &BuildOptions::new(EntityVariant::Field, &namespace)
                .with_graph(&graph)
                .unscored(),
        )?;
        for field in &mut fields {
            resolve_reference(field, "objectId", "objectRef", &objects)?;
        }
        Ok(RecipeOutput::List(score_and_share(fields)))
    }
}
