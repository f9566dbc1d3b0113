//! Permission sets, profiles, users and the permission matrices built over them.

use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::metadata::{Entity, EntityRef, EntityVariant, PropertyError};

use super::dataset::{DatasetAlias, DatasetRequest, DatasetResults, RawDataset};
use super::join::{index_by_id, resolve_reference, resolve_references, EntityIndex};
use super::list::{build_entities, score_and_share, share, BuildOptions};
use super::matrix::MatrixBuilder;
use super::{NamespaceFilter, Recipe, RecipeAlias, RecipeError, RecipeOutput, RecipeParameters};

/// System permissions that make a profile or permission set behave like an administrator.
const ADMIN_PERMISSIONS: [&str; 4] = [
    "modifyAllData",
    "viewAllData",
    "manageUsers",
    "customizeApplication",
];

fn is_admin_like(entity: &Entity) -> Result<bool, PropertyError> {
    Ok(match entity.value("importantPermissions")? {
        Some(Value::Object(permissions)) => ADMIN_PERMISSIONS
            .iter()
            .any(|name| permissions.get(*name).and_then(Value::as_bool) == Some(true)),
        _ => false,
    })
}

fn is_active(record: &Value) -> bool {
    record.get("isActive").and_then(Value::as_bool).unwrap_or(true)
}

fn text<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// Distinct assignees per permission set id.
fn assignees_by_permission_set(assignments: &RawDataset) -> HashMap<&str, BTreeSet<&str>> {
    let mut assignees: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for assignment in assignments.values() {
        if let (Some(set), Some(assignee)) = (
            text(assignment, "permissionSetId"),
            text(assignment, "assigneeId"),
        ) {
            assignees.entry(set).or_default().insert(assignee);
        }
    }
    assignees
}

/// Builds permission holders (profiles or permission sets), sets member
/// counts and the admin-like flag, then scores them.
fn build_holders(
    raw: &RawDataset,
    alias: DatasetAlias,
    variant: EntityVariant,
    namespace: &NamespaceFilter,
    member_counts: &HashMap<&str, usize>,
) -> Result<Vec<EntityRef>, RecipeError> {
    let mut holders = build_entities(raw, alias, &BuildOptions::new(variant, namespace).unscored())?;
    for holder in &mut holders {
        let members = holder
            .id()
            .and_then(|id| member_counts.get(id))
            .copied()
            .unwrap_or(0);
        holder.set("memberCounts", members)?;
        let admin_like = is_admin_like(holder)?;
        holder.set("isAdminLike", admin_like)?;
    }
    Ok(score_and_share(holders))
}

fn permission_set_holders(
    datasets: &DatasetResults,
    namespace: &NamespaceFilter,
) -> Result<Vec<EntityRef>, RecipeError> {
    let raw = datasets.require(DatasetAlias::PermissionSets)?;
    let assignments = datasets.require(DatasetAlias::PermissionSetAssignments)?;
    let counts: HashMap<&str, usize> = assignees_by_permission_set(assignments)
        .into_iter()
        .map(|(set, assignees)| (set, assignees.len()))
        .collect();
    build_holders(raw, DatasetAlias::PermissionSets, EntityVariant::PermissionSet, namespace, &counts)
}

fn profile_holders(
    datasets: &DatasetResults,
    namespace: &NamespaceFilter,
) -> Result<Vec<EntityRef>, RecipeError> {
    let raw = datasets.require(DatasetAlias::Profiles)?;
    let users = datasets.require(DatasetAlias::Users)?;
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for user in users.values().filter(|user| is_active(user)) {
        if let Some(profile) = text(user, "profileId") {
            *counts.entry(profile).or_default() += 1;
        }
    }
    build_holders(raw, DatasetAlias::Profiles, EntityVariant::Profile, namespace, &counts)
}

/// Permission sets with their distinct assignee count.
pub(crate) struct PermissionSetsRecipe;

impl Recipe for PermissionSetsRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::PermissionSets
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(vec![
            DatasetRequest::new(DatasetAlias::PermissionSets),
            DatasetRequest::new(DatasetAlias::PermissionSetAssignments),
        ])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let namespace = parameters.namespace();
        Ok(RecipeOutput::List(permission_set_holders(datasets, &namespace)?))
    }
}

/// Profiles with their active user count.
pub(crate) struct ProfilesRecipe;

impl Recipe for ProfilesRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::Profiles
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(vec![
            DatasetRequest::new(DatasetAlias::Profiles),
            DatasetRequest::new(DatasetAlias::Users),
        ])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let namespace = parameters.namespace();
        Ok(RecipeOutput::List(profile_holders(datasets, &namespace)?))
    }
}

/// Active users linked to their profile and permission sets.
pub(crate) struct UsersRecipe;

impl Recipe for UsersRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::Users
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(vec![
            DatasetRequest::new(DatasetAlias::Users),
            DatasetRequest::new(DatasetAlias::Profiles),
            DatasetRequest::new(DatasetAlias::PermissionSets),
            DatasetRequest::new(DatasetAlias::PermissionSetAssignments),
        ])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        _parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let raw_users = datasets.require(DatasetAlias::Users)?;
        let assignments = datasets.require(DatasetAlias::PermissionSetAssignments)?;
        let profiles = index_by_id(&profile_holders(datasets, &NamespaceFilter::Any)?);
        let permission_sets = index_by_id(&permission_set_holders(datasets, &NamespaceFilter::Any)?);

        let mut sets_by_user: HashMap<&str, Vec<&str>> = HashMap::new();
        for assignment in assignments.values() {
            if let (Some(set), Some(assignee)) = (
                text(assignment, "permissionSetId"),
                text(assignment, "assigneeId"),
            ) {
                sets_by_user.entry(assignee).or_default().push(set);
            }
        }

        let active: RawDataset = raw_users
            .iter()
            .filter(|(_, user)| is_active(user))
            .map(|(id, user)| (id.clone(), user.clone()))
            .collect();
        let mut users = build_entities(
            &active,
            DatasetAlias::Users,
            &BuildOptions::new(EntityVariant::User, &NamespaceFilter::Any).unscored(),
        )?;

        for user in &mut users {
            let set_ids: Vec<String> = user
                .id()
                .and_then(|id| sets_by_user.get(id))
                .map(|sets| sets.iter().map(|set| set.to_string()).collect())
                .unwrap_or_default();
            user.set("permissionSetIds", set_ids)?;
            resolve_reference(user, "profileId", "profileRef", &profiles)?;
            resolve_references(user, "permissionSetIds", "permissionSetRefs", &permission_sets)?;
            let admin_like = holds_admin_rights(user)?;
            user.set("isAdminLike", admin_like)?;
        }
        Ok(RecipeOutput::List(score_and_share(users)))
    }
}

fn holds_admin_rights(user: &Entity) -> Result<bool, PropertyError> {
    let holder_is_admin = |holder: &EntityRef| holder.read().is_true("isAdminLike");
    if let Some(profile) = user.reference("profileRef")? {
        if holder_is_admin(profile)? {
            return Ok(true);
        }
    }
    for set in user.references("permissionSetRefs")? {
        if holder_is_admin(set)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Login IP ranges and login hours per profile.
pub(crate) struct ProfileRestrictionsRecipe;

impl Recipe for ProfileRestrictionsRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::ProfileRestrictions
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(vec![
            DatasetRequest::new(DatasetAlias::ProfileRestrictions),
            DatasetRequest::new(DatasetAlias::Profiles),
        ])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        _parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let raw = datasets.require(DatasetAlias::ProfileRestrictions)?;
        let raw_profiles = datasets.require(DatasetAlias::Profiles)?;
        let any = NamespaceFilter::Any;

        let profiles = share(build_entities(
            raw_profiles,
            DatasetAlias::Profiles,
            &BuildOptions::new(EntityVariant::Profile, &any).unscored(),
        )?);
        let profiles = index_by_id(&profiles);

        let mut restrictions = build_entities(
            raw,
            DatasetAlias::ProfileRestrictions,
            &BuildOptions::new(EntityVariant::ProfileRestrictions, &any).unscored(),
        )?;
        for restriction in &mut restrictions {
            resolve_reference(restriction, "profileId", "profileRef", &profiles)?;
        }
        Ok(RecipeOutput::List(score_and_share(restrictions)))
    }
}

/// Display name per profile or permission set id, profiles first, in dataset
/// order. Matrix columns are keyed by these ids since names may repeat.
fn parent_names(datasets: &DatasetResults) -> Result<Vec<(String, String)>, RecipeError> {
    let mut names = Vec::new();
    for alias in [DatasetAlias::Profiles, DatasetAlias::PermissionSets] {
        for (id, record) in datasets.require(alias)? {
            let name = text(record, "name").unwrap_or(id);
            names.push((id.clone(), name.to_string()));
        }
    }
    Ok(names)
}

fn permission_entities(
    raw: &RawDataset,
    alias: DatasetAlias,
    variant: EntityVariant,
) -> Result<Vec<Entity>, RecipeError> {
    build_entities(raw, alias, &BuildOptions::new(variant, &NamespaceFilter::Any).unscored())
}

fn parent_column(
    permission: &Entity,
    parents: &HashSet<String>,
) -> Result<Option<String>, RecipeError> {
    Ok(permission
        .text("parentId")?
        .filter(|id| parents.contains(*id))
        .map(str::to_string))
}

/// CRUD letters per object and profile or permission set id. `v`/`m` mark
/// view all and modify all.
pub(crate) struct ObjectPermissionsRecipe;

impl Recipe for ObjectPermissionsRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::ObjectPermissions
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(vec![
            DatasetRequest::new(DatasetAlias::ObjectPermissions),
            DatasetRequest::new(DatasetAlias::Profiles),
            DatasetRequest::new(DatasetAlias::PermissionSets),
        ])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        _parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let raw = datasets.require(DatasetAlias::ObjectPermissions)?;
        let names = parent_names(datasets)?;
        let parents: HashSet<String> = names.iter().map(|(id, _)| id.clone()).collect();
        let mut builder = MatrixBuilder::with_labeled_columns(names);

        for permission in permission_entities(raw, DatasetAlias::ObjectPermissions, EntityVariant::ObjectPermission)? {
            let (Some(column), Some(object)) =
                (parent_column(&permission, &parents)?, permission.text("objectType")?)
            else {
                continue;
            };
            let mut cell = String::new();
            for (flag, letter) in [
                ("isCreate", 'C'),
                ("isRead", 'R'),
                ("isEdit", 'U'),
                ("isDelete", 'D'),
                ("isViewAll", 'v'),
                ("isModifyAll", 'm'),
            ] {
                if permission.is_true(flag)? {
                    cell.push(letter);
                }
            }
            builder.set(object, || json!({ "objectType": object }), &column, cell);
        }
        Ok(RecipeOutput::Matrix(builder.build()))
    }
}

/// Application access per profile or permission set: `A` accessible, `V` visible.
pub(crate) struct AppPermissionsRecipe;

impl Recipe for AppPermissionsRecipe {
    fn alias(&self) -> RecipeAlias {
        RecipeAlias::AppPermissions
    }

    fn extract(&self, _parameters: &RecipeParameters) -> Result<Vec<DatasetRequest>, RecipeError> {
        Ok(vec![
            DatasetRequest::new(DatasetAlias::AppPermissions),
            DatasetRequest::new(DatasetAlias::Applications),
            DatasetRequest::new(DatasetAlias::Profiles),
            DatasetRequest::new(DatasetAlias::PermissionSets),
        ])
    }

    fn transform(
        &self,
        datasets: &DatasetResults,
        _parameters: &RecipeParameters,
    ) -> Result<RecipeOutput, RecipeError> {
        let raw = datasets.require(DatasetAlias::AppPermissions)?;
        let raw_apps = datasets.require(DatasetAlias::Applications)?;
        let names = parent_names(datasets)?;
        let parents: HashSet<String> = names.iter().map(|(id, _)| id.clone()).collect();
        let mut builder = MatrixBuilder::with_labeled_columns(names);

        let apps: Vec<EntityRef> = share(permission_entities(
            raw_apps,
            DatasetAlias::Applications,
            EntityVariant::Application,
        )?);
        let apps: EntityIndex = index_by_id(&apps);

        for mut permission in permission_entities(raw, DatasetAlias::AppPermissions, EntityVariant::AppPermission)? {
            if !resolve_reference(&mut permission, "appId", "appRef", &apps)? {
                continue;
            }
            let Some(column) = parent_column(&permission, &parents)? else {
                continue;
            };
            let Some(app) = permission.reference("appRef")? else {
                continue;
            };
            let (row, header) = {
                let app = app.read();
                let name = app.text("name")?.or(app.id()).unwrap_or_default().to_string();
                let header = json!({ "id": app.id(), "label": app.text("label")? });
                (name, header)
            };
            let mut cell = String::new();
            if permission.is_true("isAccessible")? {
                cell.push('A');
            }
            if permission.is_true("isVisible")? {
                cell.push('V');
            }
            builder.merge(&row, || header, &column, cell, |existing, more| {
                for letter in more.chars() {
                    if !existing.contains(letter) {
                        existing.push(letter);
                    }
                }
            });
        }
        Ok(RecipeOutput::Matrix(builder.build()))
    }
}
