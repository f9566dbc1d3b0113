use serde_json::Value;
use std::collections::BTreeMap;

use crate::metadata::{EntityConfig, EntityFactory, EntityRef, EntityVariant};

use super::dataset::{DatasetAlias, DatasetRequest, DatasetResults};
use super::{Recipe, RecipeAlias, RecipeError, RecipeOutput, RecipeParameters};

const DEVELOPER_EDITION: &str = "Developer Edition";

/// The org itself, with its edition flags derived.
pub(crate) struct OrganizationRecipe;

impl Recipe for OrganizationRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::Organization
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(vec![DatasetRequest::new(DatasetAlias::Organization)])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        _parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let raw = datasets.require(DatasetAlias::Organization)?;
        let (key, record) = raw
            .first()
            .ok_or(RecipeError::EmptyDataset(DatasetAlias::Organization))?;
        let Value::Object(fields) = record else {
            return Err(RecipeError::MalformedRecord {
                alias: DatasetAlias::Organization,
                id: key.clone(),
            });
        };

        let mut organization = EntityFactory::instance(EntityVariant::Organization)
            .create(EntityConfig::new(Value::Object(fields.clone())))?;
        let is_developer = organization.text("type")? == Some(DEVELOPER_EDITION);
        let is_sandbox = organization.is_true("isSandbox")?;
        let is_trial = organization.is_true("isTrial")?;
        organization.set("isDeveloperEdition", is_developer)?;
        organization.set("isProduction", !(is_developer || is_sandbox || is_trial))?;
        Ok(RecipeOutput::Single(EntityRef::new(organization)))
    }
}

/// Whether the running user holds each permission named in the
/// comma-separated `permissions` parameter.
pub(crate) struct CurrentUserPermissionsRecipe;

impl Recipe for CurrentUserPermissionsRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::CurrentUserPermissions
    }

    fn extract(&self, parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        parameters.require("permissions")?;
        Ok(vec![DatasetRequest::new(DatasetAlias::CurrentUserPermissions)])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let wanted = parameters.list("permissions");
        if wanted.is_empty() {
            return Err(RecipeError::InvalidParameter {
                name: "permissions".to_string(),
                reason: "a value is required".to_string(),
            });
        }
        let raw = datasets.require(DatasetAlias::CurrentUserPermissions)?;
        let granted = raw.values().next();

        let mut permissions = BTreeMap::new();
        for name in wanted {
            let held = granted
                .and_then(|record| {
                    record
                        .get(format!("Permissions{name}").as_str())
                        .or_else(|| record.get(name))
                })
                .and_then(Value::as_bool)
                .unwrap_or(false);
            permissions.insert(name.to_string(), Value::Bool(held));
        }
        Ok(RecipeOutput::Map(permissions))
    }
}
