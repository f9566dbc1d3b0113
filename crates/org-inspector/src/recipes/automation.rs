use crate::metadata::EntityVariant;

use super::dataset::{DatasetAlias, DatasetRequest, DatasetResults};
use super::join::{index_by_id, resolve_reference};
use super::list::{build_entities, dependency_graph, score_and_share, share, BuildOptions};
use super::{NamespaceFilter, Recipe, RecipeAlias, RecipeError, RecipeOutput, RecipeParameters};

/// Process type of a flow version that was built with the legacy process builder.
const PROCESS_BUILDER_TYPE: &str = "Workflow";

/// Flow definitions joined with their current version. Dependencies are
/// looked up for both the definition id and the current version id, since
/// other components reference either one.
pub(crate) struct FlowsRecipe;

impl Recipe for FlowsRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::Flows
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(vec![
            DatasetRequest::new(DatasetAlias::Flows),
            DatasetRequest::new(DatasetAlias::FlowVersions),
            DatasetRequest::new(DatasetAlias::Dependencies),
        ])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let raw_flows = datasets.require(DatasetAlias::Flows)?;
        let raw_versions = datasets.require(DatasetAlias::FlowVersions)?;
        let graph = dependency_graph(datasets)?;
        let namespace = parameters.namespace();

        let versions = share(build_entities(
            raw_versions,
            DatasetAlias::FlowVersions,
            &BuildOptions::new(EntityVariant::FlowVersion, &NamespaceFilter::Any),
        )?);
        let versions = index_by_id(&versions);

        let mut flows = build_entities(
            raw_flows,
            DatasetAlias::Flows,
            &BuildOptions::new(EntityVariant::Flow, &namespace)
                .with_graph(&graph)
                .with_dependency_id_fields(&["id", "currentVersionId"])
                .unscored(),
        )?;
        for flow in &mut flows {
            if !resolve_reference(flow, "currentVersionId", "currentVersionRef", &versions)? {
                continue;
            }
            let is_process_builder = match flow.reference("currentVersionRef")? {
                Some(version) => version.read().text("type")? == Some(PROCESS_BUILDER_TYPE),
                None => false,
            };
            flow.set("isProcessBuilder", is_process_builder)?;
        }
        Ok(RecipeOutput::List(score_and_share(flows)))
    }
}
