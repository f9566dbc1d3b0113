//! Typed configuration items, their dependency views and the rules that score them.

pub mod dependency;
pub mod entity;
pub mod scoring;
pub mod variant;

pub use dependency::{
    resolve, DependencyEdge, DependencyError, DependencyGraph, DependencyItem, DependencyView,
};
pub use entity::{Entity, EntityError, EntityRef, Property, PropertyError, ScoreCard};
pub use scoring::{
    current_platform_version, is_old_api_version, platform_version_on, CatalogError,
    DependencyConfig, EntityConfig, EntityFactory, FactoryError, RuleCatalog, RuleCategory,
    RuleFormula, ScoreRule, VariantFactory,
};
pub use variant::{EntityVariant, UnknownVariant, VariantDescriptor};

#[cfg(test)]
mod tests;
