use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::RecipeError;

/// Raw records of one dataset keyed by identifier, in fetch order.
pub type RawDataset = IndexMap<String, Value>;

/// Names of the raw record collections the dataset layer can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatasetAlias {
    ApexClasses,
    ApexTriggers,
    AppPermissions,
    Applications,
    CurrentUserPermissions,
    CustomFields,
    CustomLabels,
    CustomTabs,
    Dashboards,
    Dependencies,
    Documents,
    EmailTemplates,
    FieldSets,
    FlowVersions,
    Flows,
    Groups,
    HomePageComponents,
    LightningAuraComponents,
    LightningPages,
    LightningWebComponents,
    Limits,
    ObjectPermissions,
    Objects,
    Organization,
    PageLayouts,
    PasswordPolicies,
    PermissionSetAssignments,
    PermissionSetLicenses,
    PermissionSets,
    ProfileRestrictions,
    Profiles,
    RecordTypes,
    Reports,
    UserRoles,
    Users,
    ValidationRules,
    VisualForceComponents,
    VisualForcePages,
    WebLinks,
    Workflows,
}

impl DatasetAlias {
    pub const fn name(self) -> &'static str {
        match self {
            Self::ApexClasses => "apexClasses",
            Self::ApexTriggers => "apexTriggers",
            Self::AppPermissions => "appPermissions",
            Self::Applications => "applications",
            Self::CurrentUserPermissions => "currentUserPermissions",
            Self::CustomFields => "customFields",
            Self::CustomLabels => "customLabels",
            Self::CustomTabs => "customTabs",
            Self::Dashboards => "dashboards",
            Self::Dependencies => "dependencies",
            Self::Documents => "documents",
            Self::EmailTemplates => "emailTemplates",
            Self::FieldSets => "fieldSets",
            Self::FlowVersions => "flowVersions",
            Self::Flows => "flows",
            Self::Groups => "groups",
            Self::HomePageComponents => "homePageComponents",
            Self::LightningAuraComponents => "lightningAuraComponents",
            Self::LightningPages => "lightningPages",
            Self::LightningWebComponents => "lightningWebComponents",
            Self::Limits => "limits",
            Self::ObjectPermissions => "objectPermissions",
            Self::Objects => "objects",
            Self::Organization => "organization",
            Self::PageLayouts => "pageLayouts",
            Self::PasswordPolicies => "passwordPolicies",
            Self::PermissionSetAssignments => "permissionSetAssignments",
            Self::PermissionSetLicenses => "permissionSetLicenses",
            Self::PermissionSets => "permissionSets",
            Self::ProfileRestrictions => "profileRestrictions",
            Self::Profiles => "profiles",
            Self::RecordTypes => "recordTypes",
            Self::Reports => "reports",
            Self::UserRoles => "userRoles",
            Self::Users => "users",
            Self::ValidationRules => "validationRules",
            Self::VisualForceComponents => "visualForceComponents",
            Self::VisualForcePages => "visualForcePages",
            Self::WebLinks => "webLinks",
            Self::Workflows => "workflows",
        }
    }

    /// Whether each record is identified by its `id`. Dependency rows are
    /// edges: many share a component id and failure markers carry none.
    pub const fn keyed_by_id(self) -> bool {
        !matches!(self, Self::Dependencies)
    }
}

impl fmt::Display for DatasetAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One dataset to fetch. Parameters make "same dataset, different argument"
/// cache separately, e.g. `customFields_Account` and `customFields_Contact`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetRequest {
    pub alias: DatasetAlias,
    pub parameters: Vec<String>,
}

impl DatasetRequest {
    pub fn new(alias: DatasetAlias) -> Self {
        Self {
            alias,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, value: impl Into<String>) -> Self {
        self.parameters.push(value.into());
        self
    }

    pub fn cache_key(&self) -> String {
        let mut key = self.alias.name().to_string();
        for parameter in &self.parameters {
            key.push('_');
            key.push_str(parameter);
        }
        key
    }
}

impl From<DatasetAlias> for DatasetRequest {
    fn from(alias: DatasetAlias) -> Self {
        Self::new(alias)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset '{cache_key}' is not available")]
    NotFound { cache_key: String },
    #[error("failed to read dataset '{cache_key}': {source}")]
    Io {
        cache_key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset '{cache_key}' is malformed: {reason}")]
    Malformed { cache_key: String, reason: String },
}

/// Source of raw datasets: remote queries, a cache, or files on disk.
pub trait DatasetProvider: Send + Sync {
    fn fetch(&self, request: &DatasetRequest) -> Result<RawDataset, DatasetError>;
}

/// Fetched datasets handed to a transform, keyed by alias.
#[derive(Debug, Clone, Default)]
pub struct DatasetResults {
    datasets: HashMap<DatasetAlias, Arc<RawDataset>>,
}

impl DatasetResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: DatasetAlias, dataset: Arc<RawDataset>) {
        self.datasets.insert(alias, dataset);
    }

    pub fn with(mut self, alias: DatasetAlias, dataset: RawDataset) -> Self {
        self.insert(alias, Arc::new(dataset));
        self
    }

    pub fn get(&self, alias: DatasetAlias) -> Option<&RawDataset> {
        self.datasets.get(&alias).map(Arc::as_ref)
    }

    /// Fails with [`RecipeError::MissingDataset`] when the alias was not supplied.
    pub fn require(&self, alias: DatasetAlias) -> Result<&RawDataset, RecipeError> {
        self.get(alias).ok_or(RecipeError::MissingDataset(alias))
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Builds a dataset from records carrying their own `id`; records without one are skipped.
pub fn dataset_from_records<I>(records: I) -> RawDataset
where
    I: IntoIterator<Item = Value>,
{
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.get("id")?.as_str()?.to_string();
            Some((id, record))
        })
        .collect()
}

/// Builds a dataset keyed by row position, keeping every record.
pub fn dataset_from_rows<I>(rows: I) -> RawDataset
where
    I: IntoIterator<Item = Value>,
{
    rows.into_iter()
        .enumerate()
        .map(|(position, row)| (position.to_string(), row))
        .collect()
}
