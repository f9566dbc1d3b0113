//! Configuration metadata inspection: typed entities, best-practice scoring,
//! dependency views and the recipes that compose raw datasets into them.

pub mod config;
pub mod error;
pub mod metadata;
pub mod recipes;
pub mod telemetry;

pub use metadata::{
    DependencyGraph, DependencyView, Entity, EntityConfig, EntityFactory, EntityRef,
    EntityVariant, RuleCatalog, RuleCategory, ScoreRule,
};
pub use recipes::{Recipe, RecipeAlias, RecipeManager, RecipeOutput, RecipeParameters};
