use crate::metadata::{EntityFactory, EntityRef, EntityVariant};

use super::dataset::{DatasetAlias, DatasetRequest, DatasetResults};
use super::join::{index_by_id, resolve_reference, resolve_references};
use super::list::{build_entities, dependency_graph, score_and_share, share, BuildOptions};
use super::{NamespaceFilter, Recipe, RecipeAlias, RecipeError, RecipeOutput, RecipeParameters};

/// Apex classes, each linked to the test classes that cover it.
pub(crate) struct ApexClassesRecipe;

impl Recipe for ApexClassesRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::ApexClasses
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(vec![
            DatasetRequest::new(DatasetAlias::ApexClasses),
            DatasetRequest::new(DatasetAlias::Dependencies),
        ])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let raw = datasets.require(DatasetAlias::ApexClasses)?;
        let graph = dependency_graph(datasets)?;
        let namespace = parameters.namespace();

        // Covering test classes may sit outside the namespace filter, so link
        // across every class and filter afterwards.
        let classes = share(build_entities(
            raw,
            DatasetAlias::ApexClasses,
            &BuildOptions::new(EntityVariant::ApexClass, &NamespaceFilter::Any)
                .with_graph(&graph)
                .unscored(),
        )?);
        let index = index_by_id(&classes);
        for class in &classes {
            let mut class = class.write();
            resolve_references(&mut class, "relatedTestClassIds", "relatedTestClassRefs", &index)?;
        }

        let factory = EntityFactory::instance(EntityVariant::ApexClass);
        let mut kept = Vec::with_capacity(classes.len());
        for class in classes {
            {
                let mut entity = class.write();
                if !namespace.accepts(entity.text("package")?) {
                    continue;
                }
                factory.compute_score(&mut entity);
            }
            kept.push(class);
        }
        Ok(RecipeOutput::List(kept))
    }
}

/// Apex triggers, each linked to the object it fires on.
pub(crate) struct ApexTriggersRecipe;

impl Recipe for ApexTriggersRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::ApexTriggers
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(vec![
            DatasetRequest::new(DatasetAlias::ApexTriggers),
            DatasetRequest::new(DatasetAlias::Objects),
            DatasetRequest::new(DatasetAlias::Dependencies),
        ])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let raw_triggers = datasets.require(DatasetAlias::ApexTriggers)?;
        let raw_objects = datasets.require(DatasetAlias::Objects)?;
        let graph = dependency_graph(datasets)?;
        let namespace = parameters.namespace();

        let objects: Vec<EntityRef> = share(build_entities(
            raw_objects,
            DatasetAlias::Objects,
            &BuildOptions::new(EntityVariant::Object, &NamespaceFilter::Any).unscored(),
        )?);
        let objects = index_by_id(&objects);

        let mut triggers = build_entities(
            raw_triggers,
            DatasetAlias::ApexTriggers,
            &BuildOptions::new(EntityVariant::ApexTrigger, &namespace)
                .with_graph(&graph)
                .unscored(),
        )?;
        for trigger in &mut triggers {
            resolve_reference(trigger, "objectId", "objectRef", &objects)?;
        }
        Ok(RecipeOutput::List(score_and_share(triggers)))
    }
}
