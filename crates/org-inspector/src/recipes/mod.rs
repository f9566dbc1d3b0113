//! Recipes turn fetched raw datasets into entities.
//!
//! A recipe first declares the datasets it needs ([`Recipe::extract`], no I/O),
//! then joins the fetched results into its output ([`Recipe::transform`]).
//! Fetching and caching sit outside, in [`RecipeManager`].

mod automation;
mod code;
pub mod dataset;
mod fields;
pub mod join;
mod list;
mod manager;
pub mod matrix;
mod organization;
mod permissions;
mod roles;
pub mod tree;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::metadata::{DependencyError, EntityError, EntityRef, FactoryError, PropertyError};

pub use dataset::{
    dataset_from_records, dataset_from_rows, DatasetAlias, DatasetError, DatasetProvider, DatasetRequest,
    DatasetResults, RawDataset,
};
pub use manager::{RecipeManager, RecipeManagerError};
pub use matrix::{Matrix, MatrixBuilder, MatrixRow};
pub use tree::{Hierarchy, TreeNode};

/// Closed set of recipes, addressed on the command line by kebab-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecipeAlias {
    ApexClasses,
    ApexTriggers,
    AppPermissions,
    CurrentUserPermissions,
    CustomFields,
    CustomLabels,
    CustomTabs,
    Dashboards,
    Documents,
    EmailTemplates,
    FieldSets,
    Flows,
    Groups,
    HomePageComponents,
    LightningAuraComponents,
    LightningPages,
    LightningWebComponents,
    ObjectPermissions,
    Objects,
    OrgLimits,
    Organization,
    PageLayouts,
    PasswordPolicies,
    PermissionSetLicenses,
    PermissionSets,
    ProfileRestrictions,
    Profiles,
    RecordTypes,
    Reports,
    RoleHierarchy,
    UserRoles,
    Users,
    ValidationRules,
    VisualForceComponents,
    VisualForcePages,
    WebLinks,
    Workflows,
}

impl RecipeAlias {
    pub const ALL: [Self; 37] = [
        Self::ApexClasses,
        Self::ApexTriggers,
        Self::AppPermissions,
        Self::CurrentUserPermissions,
        Self::CustomFields,
        Self::CustomLabels,
        Self::CustomTabs,
        Self::Dashboards,
        Self::Documents,
        Self::EmailTemplates,
        Self::FieldSets,
        Self::Flows,
        Self::Groups,
        Self::HomePageComponents,
        Self::LightningAuraComponents,
        Self::LightningPages,
        Self::LightningWebComponents,
        Self::ObjectPermissions,
        Self::Objects,
        Self::OrgLimits,
        Self::Organization,
        Self::PageLayouts,
        Self::PasswordPolicies,
        Self::PermissionSetLicenses,
        Self::PermissionSets,
        Self::ProfileRestrictions,
        Self::Profiles,
        Self::RecordTypes,
        Self::Reports,
        Self::RoleHierarchy,
        Self::UserRoles,
        Self::Users,
        Self::ValidationRules,
        Self::VisualForceComponents,
        Self::VisualForcePages,
        Self::WebLinks,
        Self::Workflows,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::ApexClasses => "apex-classes",
            Self::ApexTriggers => "apex-triggers",
            Self::AppPermissions => "app-permissions",
            Self::CurrentUserPermissions => "current-user-permissions",
            Self::CustomFields => "custom-fields",
            Self::CustomLabels => "custom-labels",
            Self::CustomTabs => "custom-tabs",
            Self::Dashboards => "dashboards",
            Self::Documents => "documents",
            Self::EmailTemplates => "email-templates",
            Self::FieldSets => "field-sets",
            Self::Flows => "flows",
            Self::Groups => "groups",
            Self::HomePageComponents => "home-page-components",
            Self::LightningAuraComponents => "lightning-aura-components",
            Self::LightningPages => "lightning-pages",
            Self::LightningWebComponents => "lightning-web-components",
            Self::ObjectPermissions => "object-permissions",
            Self::Objects => "objects",
            Self::OrgLimits => "org-limits",
            Self::Organization => "organization",
            Self::PageLayouts => "page-layouts",
            Self::PasswordPolicies => "password-policies",
            Self::PermissionSetLicenses => "permission-set-licenses",
            Self::PermissionSets => "permission-sets",
            Self::ProfileRestrictions => "profile-restrictions",
            Self::Profiles => "profiles",
            Self::RecordTypes => "record-types",
            Self::Reports => "reports",
            Self::RoleHierarchy => "role-hierarchy",
            Self::UserRoles => "user-roles",
            Self::Users => "users",
            Self::ValidationRules => "validation-rules",
            Self::VisualForceComponents => "visualforce-components",
            Self::VisualForcePages => "visualforce-pages",
            Self::WebLinks => "web-links",
            Self::Workflows => "workflows",
        }
    }
}

impl fmt::Display for RecipeAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a known recipe")]
pub struct UnknownRecipe(pub String);

impl FromStr for RecipeAlias {
    type Err = UnknownRecipe;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|alias| alias.name() == wanted)
            .ok_or_else(|| UnknownRecipe(value.to_string()))
    }
}

/// Which package a list keeps, read from the `namespace` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceFilter {
    /// `*` or no parameter.
    Any,
    /// Empty value: unpackaged items only.
    Unpackaged,
    Exact(String),
}

impl NamespaceFilter {
    pub fn accepts(&self, package: Option<&str>) -> bool {
        let package = package.filter(|package| !package.is_empty());
        match self {
            Self::Any => true,
            Self::Unpackaged => package.is_none(),
            Self::Exact(wanted) => package == Some(wanted.as_str()),
        }
    }
}

/// Named string arguments of a recipe run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeParameters {
    values: BTreeMap<String, String>,
}

impl RecipeParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Non-empty value of `key`, or [`RecipeError::InvalidParameter`].
    pub fn require(&self, key: &str) -> Result<&str, RecipeError> {
        self.get(key)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| RecipeError::InvalidParameter {
                name: key.to_string(),
                reason: "a value is required".to_string(),
            })
    }

    /// Comma separated list value of `key`; absent means empty.
    pub fn list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn namespace(&self) -> NamespaceFilter {
        match self.get("namespace").map(str::trim) {
            None | Some("*") => NamespaceFilter::Any,
            Some("") => NamespaceFilter::Unpackaged,
            Some(namespace) => NamespaceFilter::Exact(namespace.to_string()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Result of a recipe; each recipe always produces the same kind.
#[derive(Debug, Clone)]
pub enum RecipeOutput {
    List(Vec<EntityRef>),
    Single(EntityRef),
    Tree(Hierarchy<EntityRef>),
    Matrix(Matrix<Value, String>),
    Map(BTreeMap<String, Value>),
}

impl RecipeOutput {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Single(_) => "single",
            Self::Tree(_) => "tree",
            Self::Matrix(_) => "matrix",
            Self::Map(_) => "map",
        }
    }

    pub fn as_list(&self) -> Option<&[EntityRef]> {
        match self {
            Self::List(entities) => Some(entities),
            _ => None,
        }
    }
}

/// Entity handles serialize as full records inside outputs, not as bare ids.
struct Expanded<'a>(&'a EntityRef);

impl Serialize for Expanded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.read().serialize(serializer)
    }
}

impl Serialize for RecipeOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::List(entities) => serializer.collect_seq(entities.iter().map(Expanded)),
            Self::Single(entity) => Expanded(entity).serialize(serializer),
            Self::Tree(tree) => ExpandedNode(tree.root()).serialize(serializer),
            Self::Matrix(matrix) => matrix.serialize(serializer),
            Self::Map(values) => values.serialize(serializer),
        }
    }
}

struct ExpandedNode<'a>(TreeNode<'a, EntityRef>);

impl Serialize for ExpandedNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.0.id())?;
        if let Some(record) = self.0.record() {
            map.serialize_entry("record", &Expanded(record))?;
        }
        let children: Vec<ExpandedNode<'_>> = self.0.children().map(ExpandedNode).collect();
        if !children.is_empty() {
            map.serialize_entry("children", &children)?;
        }
        map.end()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("dataset '{0}' was declared but not supplied")]
    MissingDataset(DatasetAlias),
    #[error("dataset '{0}' holds no record")]
    EmptyDataset(DatasetAlias),
    #[error("record '{id}' of dataset '{alias}' is not an object")]
    MalformedRecord { alias: DatasetAlias, id: String },
    #[error("parameter '{name}' is invalid: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error(transparent)]
    Factory(#[from] FactoryError),
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error(transparent)]
    Property(#[from] PropertyError),
}

/// Two-phase contract: declare inputs, then transform fetched inputs.
pub trait Recipe: Send + Sync {
    fn alias(&self) -> RecipeAlias;

    /// Datasets needed for `parameters`. Performs no I/O.
    fn extract(&self, parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError>;

    fn transform(
        &self,
        datasets: &DatasetResults,
        parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError>;
}

/// Every built-in recipe.
pub fn builtin_recipes() -> Vec<Box<dyn Recipe>> {
    let mut recipes: Vec<Box<dyn Recipe>> = vec![
        Box::new(fields::CustomFieldsRecipe),
        Box::new(code::ApexClassesRecipe),
        Box::new(code::ApexTriggersRecipe),
        Box::new(automation::FlowsRecipe),
        Box::new(roles::UserRolesRecipe),
        Box::new(roles::RoleHierarchyRecipe),
        Box::new(permissions::PermissionSetsRecipe),
        Box::new(permissions::ProfilesRecipe),
        Box::new(permissions::UsersRecipe),
        Box::new(permissions::ProfileRestrictionsRecipe),
        Box::new(permissions::ObjectPermissionsRecipe),
        Box::new(permissions::AppPermissionsRecipe),
        Box::new(organization::OrganizationRecipe),
        Box::new(organization::CurrentUserPermissionsRecipe),
    ];
    recipes.extend(
        list::SIMPLE_LISTS
            .iter()
            .map(|recipe| Box::new(recipe.clone()) as Box<dyn Recipe>),
    );
    recipes
}

#[cfg(test)]
mod tests;
