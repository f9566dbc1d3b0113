//! Shared entity builders and the table of single-dataset list recipes.

use serde_json::Value;

use crate::metadata::{DependencyGraph, Entity, EntityConfig, EntityFactory, EntityRef, EntityVariant};

use super::dataset::{DatasetAlias, DatasetRequest, DatasetResults, RawDataset};
use super::{NamespaceFilter, Recipe, RecipeAlias, RecipeError, RecipeOutput, RecipeParameters};

/// How records of one dataset become entities.
pub(crate) struct BuildOptions<'a> {
    pub variant: EntityVariant,
    pub graph: Option<&'a DependencyGraph>,
    pub dependency_id_fields: &'a [&'a str],
    pub namespace: &'a NamespaceFilter,
    pub score: bool,
}

impl<'a> BuildOptions<'a> {
    pub fn new(variant: EntityVariant, namespace: &'a NamespaceFilter) -> Self {
        Self {
            variant,
            graph: None,
            dependency_id_fields: &["id"],
            namespace,
            score: true,
        }
    }

    pub fn with_graph(mut self, graph: &'a DependencyGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn with_dependency_id_fields(mut self, fields: &'a [&'a str]) -> Self {
        self.dependency_id_fields = fields;
        self
    }

    /// Defer scoring until joins and aggregates are done.
    pub fn unscored(mut self) -> Self {
        self.score = false;
        self
    }
}

/// Builds one entity per record, in dataset order. Records without an `id`
/// get their dataset key as identifier.
pub(crate) fn build_entities(
    dataset: &RawDataset,
    alias: DatasetAlias,
    options: &BuildOptions<'_>,
) -> Result<Vec<Entity>, RecipeError> {
    let factory = EntityFactory::instance(options.variant);
    let mut entities = Vec::with_capacity(dataset.len());
    for (key, record) in dataset {
        let Value::Object(fields) = record else {
            return Err(RecipeError::MalformedRecord {
                alias,
                id: key.clone(),
            });
        };
        let package = fields.get("package").and_then(Value::as_str);
        if !options.namespace.accepts(package) {
            continue;
        }

        let mut properties = fields.clone();
        properties
            .entry("id")
            .or_insert_with(|| Value::String(key.clone()));
        let mut config = EntityConfig::new(Value::Object(properties));
        if let Some(graph) = options.graph {
            config = config
                .with_dependencies(graph)
                .with_dependency_id_fields(options.dependency_id_fields);
        }

        let entity = if options.score {
            factory.create_with_score(config)?
        } else {
            factory.create(config)?
        };
        entities.push(entity);
    }
    tracing::debug!(
        dataset = %alias,
        variant = %options.variant,
        built = entities.len(),
        "entities built from dataset"
    );
    Ok(entities)
}

/// Parses the shared dependency dataset.
pub(crate) fn dependency_graph(datasets: &DatasetResults) -> Result<DependencyGraph, RecipeError> {
    let raw = datasets.require(DatasetAlias::Dependencies)?;
    Ok(DependencyGraph::from_dataset(raw)?)
}

/// Scores entities whose scoring was deferred, then shares them.
pub(crate) fn score_and_share(entities: Vec<Entity>) -> Vec<EntityRef> {
    entities
        .into_iter()
        .map(|mut entity| {
            EntityFactory::instance(entity.variant()).compute_score(&mut entity);
            EntityRef::new(entity)
        })
        .collect()
}

pub(crate) fn share(entities: Vec<Entity>) -> Vec<EntityRef> {
    entities.into_iter().map(EntityRef::new).collect()
}

/// Recipe reading one dataset into a scored list, with dependencies when the
/// variant carries them.
#[derive(Debug, Clone)]
pub(crate) struct SimpleListRecipe {
    pub alias: RecipeAlias,
    pub dataset: DatasetAlias,
    pub variant: EntityVariant,
}

impl SimpleListRecipe {
    fn needs_dependencies(&self) -> bool {
        self.variant.has_dependencies()
    }
}

pub(crate) const SIMPLE_LISTS: &[SimpleListRecipe] = &[
    SimpleListRecipe {
        alias: RecipeAlias::CustomLabels,
        dataset: DatasetAlias::CustomLabels,
        variant: EntityVariant::CustomLabel,
    },
    SimpleListRecipe {
        alias: RecipeAlias::VisualForcePages,
        dataset: DatasetAlias::VisualForcePages,
        variant: EntityVariant::VisualForcePage,
    },
    SimpleListRecipe {
        alias: RecipeAlias::VisualForceComponents,
        dataset: DatasetAlias::VisualForceComponents,
        variant: EntityVariant::VisualForceComponent,
    },
    SimpleListRecipe {
        alias: RecipeAlias::LightningPages,
        dataset: DatasetAlias::LightningPages,
        variant: EntityVariant::LightningPage,
    },
    SimpleListRecipe {
        alias: RecipeAlias::LightningAuraComponents,
        dataset: DatasetAlias::LightningAuraComponents,
        variant: EntityVariant::LightningAuraComponent,
    },
    SimpleListRecipe {
        alias: RecipeAlias::LightningWebComponents,
        dataset: DatasetAlias::LightningWebComponents,
        variant: EntityVariant::LightningWebComponent,
    },
    SimpleListRecipe {
        alias: RecipeAlias::ValidationRules,
        dataset: DatasetAlias::ValidationRules,
        variant: EntityVariant::ValidationRule,
    },
    SimpleListRecipe {
        alias: RecipeAlias::Workflows,
        dataset: DatasetAlias::Workflows,
        variant: EntityVariant::Workflow,
    },
    SimpleListRecipe {
        alias: RecipeAlias::PasswordPolicies,
        dataset: DatasetAlias::PasswordPolicies,
        variant: EntityVariant::ProfilePasswordPolicy,
    },
    SimpleListRecipe {
        alias: RecipeAlias::Groups,
        dataset: DatasetAlias::Groups,
        variant: EntityVariant::Group,
    },
    SimpleListRecipe {
        alias: RecipeAlias::WebLinks,
        dataset: DatasetAlias::WebLinks,
        variant: EntityVariant::WebLink,
    },
    SimpleListRecipe {
        alias: RecipeAlias::RecordTypes,
        dataset: DatasetAlias::RecordTypes,
        variant: EntityVariant::RecordType,
    },
    SimpleListRecipe {
        alias: RecipeAlias::PageLayouts,
        dataset: DatasetAlias::PageLayouts,
        variant: EntityVariant::PageLayout,
    },
    SimpleListRecipe {
        alias: RecipeAlias::EmailTemplates,
        dataset: DatasetAlias::EmailTemplates,
        variant: EntityVariant::EmailTemplate,
    },
    SimpleListRecipe {
        alias: RecipeAlias::Dashboards,
        dataset: DatasetAlias::Dashboards,
        variant: EntityVariant::Dashboard,
    },
    SimpleListRecipe {
        alias: RecipeAlias::Reports,
        dataset: DatasetAlias::Reports,
        variant: EntityVariant::Report,
    },
    SimpleListRecipe {
        alias: RecipeAlias::Documents,
        dataset: DatasetAlias::Documents,
        variant: EntityVariant::Document,
    },
    SimpleListRecipe {
        alias: RecipeAlias::CustomTabs,
        dataset: DatasetAlias::CustomTabs,
        variant: EntityVariant::CustomTab,
    },
    SimpleListRecipe {
        alias: RecipeAlias::HomePageComponents,
        dataset: DatasetAlias::HomePageComponents,
        variant: EntityVariant::HomePageComponent,
    },
    SimpleListRecipe {
        alias: RecipeAlias::PermissionSetLicenses,
        dataset: DatasetAlias::PermissionSetLicenses,
        variant: EntityVariant::PermissionSetLicense,
    },
    SimpleListRecipe {
        alias: RecipeAlias::FieldSets,
        dataset: DatasetAlias::FieldSets,
        variant: EntityVariant::FieldSet,
    },
    SimpleListRecipe {
        alias: RecipeAlias::Objects,
        dataset: DatasetAlias::Objects,
        variant: EntityVariant::Object,
    },
    SimpleListRecipe {
        alias: RecipeAlias::OrgLimits,
        dataset: DatasetAlias::Limits,
        variant: EntityVariant::Limit,
    },
];

impl Recipe for SimpleListRecipe {
    fn alias(&self) -> RecipeAlias {
        self.alias
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        let mut requests = vec![DatasetRequest::new(self.dataset)];
        if self.needs_dependencies() {
            requests.push(DatasetRequest::new(DatasetAlias::Dependencies));
        }
        Ok(requests)
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let raw = datasets.require(self.dataset)?;
        let graph = if self.needs_dependencies() {
            Some(dependency_graph(datasets)?)
        } else {
            None
        };
        let namespace = parameters.namespace();
        let mut options = BuildOptions::new(self.variant, &namespace);
        if let Some(graph) = graph.as_ref() {
            options = options.with_graph(graph);
        }
        let entities = build_entities(raw, self.dataset, &options)?;
        Ok(RecipeOutput::List(share(entities)))
    }
}
