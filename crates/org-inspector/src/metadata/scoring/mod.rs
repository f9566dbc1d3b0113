//! Entity construction and best-practice scoring.

mod catalog;
mod rules;

pub use catalog::{
    current_platform_version, is_old_api_version, platform_version_on, CatalogError,
    RuleCatalog, RuleCategory, RuleFormula, ScoreRule, API_VERSION_MAX_AGE_YEARS,
};

use super::dependency::DependencyGraph;
use super::entity::{Entity, EntityError};
use super::variant::{EntityVariant, UnknownVariant};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    #[error("invalid entity configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),
}

impl From<EntityError> for FactoryError {
    fn from(err: EntityError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Where to resolve dependencies from, and which properties carry the lookup ids.
#[derive(Debug, Clone)]
pub struct DependencyConfig<'a> {
    pub graph: &'a DependencyGraph,
    pub id_fields: Vec<String>,
}

/// Input of [`VariantFactory::create`].
#[derive(Debug, Clone, Default)]
pub struct EntityConfig<'a> {
    pub properties: Option<Value>,
    pub dependencies: Option<DependencyConfig<'a>>,
}

impl<'a> EntityConfig<'a> {
    pub fn new(properties: Value) -> Self {
        Self {
            properties: Some(properties),
            dependencies: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_dependencies(mut self, graph: &'a DependencyGraph) -> Self {
        self.dependencies = Some(DependencyConfig {
            graph,
            id_fields: vec!["id".to_string()],
        });
        self
    }

    /// Overrides the properties whose values are looked up in the graph. No-op
    /// unless [`Self::with_dependencies`] was called first.
    pub fn with_dependency_id_fields(mut self, fields: &[&str]) -> Self {
        if let Some(dependencies) = self.dependencies.as_mut() {
            dependencies.id_fields = fields.iter().map(|field| field.to_string()).collect();
        }
        self
    }
}

/// Builds and scores entities of a single variant. Obtain through [`EntityFactory`].
#[derive(Debug)]
pub struct VariantFactory {
    variant: EntityVariant,
    rules: Vec<&'static ScoreRule>,
}

impl VariantFactory {
    fn new(variant: EntityVariant) -> Self {
        let rules = if variant.has_scoring() {
            RuleCatalog::global().applicable_to(variant)
        } else {
            Vec::new()
        };
        Self { variant, rules }
    }

    pub fn variant(&self) -> EntityVariant {
        self.variant
    }

    /// Applicable rules in catalog order, computed once per variant.
    pub fn rules(&self) -> &[&'static ScoreRule] {
        &self.rules
    }

    /// Copies the declared properties out of `config.properties`; undeclared keys are dropped.
    pub fn create(&self, config: EntityConfig<'_>) -> Result<Entity, FactoryError> {
        let properties = config.properties.ok_or_else(|| {
            FactoryError::Configuration(format!("{} requires properties", self.variant))
        })?;
        let Value::Object(mut source) = properties else {
            return Err(FactoryError::Configuration(format!(
                "{} properties must be an object",
                self.variant
            )));
        };

        let mut entity = Entity::blank(self.variant);
        for field in self.variant.fields() {
            if let Some(value) = source.remove(*field) {
                entity.set(field, value)?;
            }
        }

        if let Some(dependencies) = config.dependencies {
            if self.variant.has_dependencies() {
                let ids = lookup_ids(&entity, &dependencies.id_fields);
                entity.attach_dependencies(dependencies.graph.resolve(&ids));
            }
        }
        Ok(entity)
    }

    /// Applies every applicable rule and records matches on the score card.
    ///
    /// Scores accumulate: running this twice on the same entity counts every
    /// match twice. Score freshly created entities only.
    pub fn compute_score(&self, entity: &mut Entity) {
        if entity.variant() != self.variant {
            tracing::warn!(
                factory = %self.variant,
                entity = %entity.variant(),
                "entity handed to the wrong factory, skipping scoring"
            );
            return;
        }

        let mut matched = Vec::new();
        for rule in &self.rules {
            match rule.evaluate(entity) {
                Ok(true) => matched.push(*rule),
                Ok(false) => {}
                Err(err) => tracing::warn!(
                    rule_id = rule.id,
                    rule = rule.description,
                    variant = %self.variant,
                    entity_id = entity.id().unwrap_or_default(),
                    error = %err,
                    "score rule failed, treating as no match"
                ),
            }
        }

        if let Some(card) = entity.score_mut() {
            for rule in matched {
                card.record(rule.id, rule.bad_field);
            }
        }
    }

    pub fn create_with_score(&self, config: EntityConfig<'_>) -> Result<Entity, FactoryError> {
        let mut entity = self.create(config)?;
        self.compute_score(&mut entity);
        Ok(entity)
    }
}

fn lookup_ids(entity: &Entity, id_fields: &[String]) -> Vec<String> {
    let mut ids = Vec::new();
    for field in id_fields {
        match entity.value(field) {
            Ok(Some(Value::String(id))) => ids.push(id.clone()),
            Ok(Some(Value::Array(items))) => ids.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string),
            ),
            Ok(_) => {}
            Err(err) => tracing::warn!(
                variant = %entity.variant(),
                field = %field,
                error = %err,
                "dependency id field is not usable"
            ),
        }
    }
    ids
}

static FACTORIES: OnceLock<Mutex<HashMap<EntityVariant, Arc<VariantFactory>>>> = OnceLock::new();

/// Process-wide registry of per-variant factories.
pub struct EntityFactory;

impl EntityFactory {
    /// Returns the memoized factory for `variant`, building it on first use.
    pub fn instance(variant: EntityVariant) -> Arc<VariantFactory> {
        let mut factories = FACTORIES
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        factories
            .entry(variant)
            .or_insert_with(|| {
                tracing::debug!(variant = %variant, "building entity factory");
                Arc::new(VariantFactory::new(variant))
            })
            .clone()
    }

    pub fn instance_by_name(name: &str) -> Result<Arc<VariantFactory>, FactoryError> {
        let variant: EntityVariant = name.parse()?;
        Ok(Self::instance(variant))
    }
}
