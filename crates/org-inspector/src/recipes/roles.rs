use serde_json::Value;
use std::collections::HashMap;

use crate::metadata::{EntityFactory, EntityRef, EntityVariant};

use super::dataset::{DatasetAlias, DatasetRequest, DatasetResults};
use super::join::{index_by_id, resolve_reference, resolve_references};
use super::list::{build_entities, share, BuildOptions};
use super::tree::Hierarchy;
use super::{NamespaceFilter, Recipe, RecipeAlias, RecipeError, RecipeOutput, RecipeParameters};

fn role_requests() -> Vec<DatasetRequest> {
    vec![
        DatasetRequest::new(DatasetAlias::UserRoles),
        DatasetRequest::new(DatasetAlias::Users),
    ]
}

/// Active user ids per role id, in dataset order. Users without an explicit
/// `isActive: false` count as active.
fn active_members(datasets: &DatasetResults) -> Result<HashMap<String, Vec<String>>, RecipeError> {
    let users = datasets.require(DatasetAlias::Users)?;
    let mut members: HashMap<String, Vec<String>> = HashMap::new();
    for (id, user) in users {
        let active = user.get("isActive").and_then(Value::as_bool).unwrap_or(true);
        let Some(role_id) = user.get("userRoleId").and_then(Value::as_str) else {
            continue;
        };
        if active {
            members.entry(role_id.to_string()).or_default().push(id.clone());
        }
    }
    Ok(members)
}

/// Roles linked to their parent and active members, scored after aggregation.
fn build_roles(datasets: &DatasetResults) -> Result<Vec<EntityRef>, RecipeError> {
    let raw_roles = datasets.require(DatasetAlias::UserRoles)?;
    let raw_users = datasets.require(DatasetAlias::Users)?;
    let any = NamespaceFilter::Any;

    let users = share(build_entities(
        raw_users,
        DatasetAlias::Users,
        &BuildOptions::new(EntityVariant::User, &any).unscored(),
    )?);
    let users = index_by_id(&users);
    let members = active_members(datasets)?;

    let roles = share(build_entities(
        raw_roles,
        DatasetAlias::UserRoles,
        &BuildOptions::new(EntityVariant::UserRole, &any).unscored(),
    )?);
    let index = index_by_id(&roles);
    let factory = EntityFactory::instance(EntityVariant::UserRole);

    for role in &roles {
        let mut role = role.write();
        let has_parent = !role.is_empty("parentId")?;
        role.set("hasParent", has_parent)?;
        if has_parent {
            resolve_reference(&mut role, "parentId", "parentRef", &index)?;
        }

        let member_ids = role
            .id()
            .and_then(|id| members.get(id))
            .cloned()
            .unwrap_or_default();
        role.set("activeMembersCount", member_ids.len())?;
        role.set("activeMemberIds", member_ids)?;
        resolve_references(&mut role, "activeMemberIds", "activeMemberRefs", &users)?;

        factory.compute_score(&mut role);
    }
    Ok(roles)
}

/// Flat list of roles.
pub(crate) struct UserRolesRecipe;

impl Recipe for UserRolesRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::UserRoles
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(role_requests())
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        _parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        Ok(RecipeOutput::List(build_roles(datasets)?))
    }
}

/// Roles arranged under their parents, top-level roles under a synthetic root.
pub(crate) struct RoleHierarchyRecipe;

impl Recipe for RoleHierarchyRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::RoleHierarchy
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(role_requests())
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        _parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let roles = build_roles(datasets)?;
        let tree = Hierarchy::build(roles, |role| {
            let role = role.read();
            let id = role.id()?.to_string();
            let parent = if role.is_true("hasParent").unwrap_or(false) {
                role.text("parentId").ok().flatten().map(str::to_string)
            } else {
                None
            };
            Some((id, parent))
        });
        let unresolved = tree.unresolved();
        if !unresolved.is_empty() {
            tracing::debug!(missing = ?unresolved, "role hierarchy references unknown parents");
        }
        Ok(RecipeOutput::Tree(tree))
    }
}
