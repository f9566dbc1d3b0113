use serde_json::json;

use super::common::{records, recipe, run_with};
use crate::recipes::dataset::{DatasetAlias, DatasetResults};
use crate::recipes::{
    builtin_recipes, NamespaceFilter, RecipeAlias, RecipeError, RecipeOutput, RecipeParameters,
};

#[test]
fn every_alias_has_exactly_one_builtin_recipe() {
    let recipes = builtin_recipes();
    for alias in RecipeAlias::ALL.iter() {
        let count = recipes.iter().filter(|recipe| recipe.alias() == *alias).count();
        assert_eq!(count, 1, "{alias} registered {count} times");
    }
    assert_eq!(recipes.len(), RecipeAlias::ALL.len());
}

#[test]
fn aliases_parse_from_their_kebab_names() {
    for alias in RecipeAlias::ALL.iter() {
        assert_eq!(alias.name().parse::<RecipeAlias>().ok(), Some(*alias));
    }
    assert_eq!(" Custom-Fields ".parse::<RecipeAlias>().ok(), Some(RecipeAlias::CustomFields));
    let unknown = "not-a-recipe".parse::<RecipeAlias>().unwrap_err();
    assert_eq!(unknown.0, "not-a-recipe");
}

#[test]
fn namespace_parameter_selects_the_filter() {
    assert_eq!(RecipeParameters::new().namespace(), NamespaceFilter::Any);
    assert_eq!(
        RecipeParameters::new().with("namespace", "*").namespace(),
        NamespaceFilter::Any
    );
    assert_eq!(
        RecipeParameters::new().with("namespace", "").namespace(),
        NamespaceFilter::Unpackaged
    );
    assert_eq!(
        RecipeParameters::new().with("namespace", "acme").namespace(),
        NamespaceFilter::Exact("acme".to_string())
    );
}

#[test]
fn namespace_filter_treats_blank_package_as_unpackaged() {
    assert!(NamespaceFilter::Unpackaged.accepts(None));
    assert!(NamespaceFilter::Unpackaged.accepts(Some("")));
    assert!(!NamespaceFilter::Unpackaged.accepts(Some("acme")));
    assert!(NamespaceFilter::Exact("acme".into()).accepts(Some("acme")));
    assert!(!NamespaceFilter::Exact("acme".into()).accepts(None));
    assert!(NamespaceFilter::Any.accepts(Some("other")));
}

#[test]
fn list_parameter_splits_on_commas_and_drops_blanks() {
    let parameters = RecipeParameters::new().with("permissions", " ModifyAllData, ,ViewSetup ");
    assert_eq!(parameters.list("permissions"), vec!["ModifyAllData", "ViewSetup"]);
    assert!(parameters.list("absent").is_empty());
}

#[test]
fn required_parameter_rejects_blank_values() {
    let parameters = RecipeParameters::new().with("permissions", "  ");
    assert!(matches!(
        parameters.require("permissions"),
        Err(RecipeError::InvalidParameter { name, .. }) if name == "permissions"
    ));
}

#[test]
fn custom_fields_object_parameter_changes_the_cache_key() {
    let all = recipe(RecipeAlias::CustomFields)
        .extract(&RecipeParameters::new())
        .expect("extract");
    let scoped = recipe(RecipeAlias::CustomFields)
        .extract(&RecipeParameters::new().with("object", "Account"))
        .expect("extract");
    let keys = |requests: &[crate::recipes::dataset::DatasetRequest]| {
        requests.iter().map(|request| request.cache_key()).collect::<Vec<_>>()
    };
    assert_eq!(keys(&all), vec!["customFields", "objects", "dependencies"]);
    assert_eq!(keys(&scoped), vec!["customFields_Account", "objects", "dependencies"]);
}

#[test]
fn extract_performs_no_io_and_declares_dependencies_only_when_used() {
    let labels = recipe(RecipeAlias::CustomLabels)
        .extract(&RecipeParameters::new())
        .expect("extract");
    assert!(labels.iter().any(|request| request.alias == DatasetAlias::Dependencies));

    let groups = recipe(RecipeAlias::Groups)
        .extract(&RecipeParameters::new())
        .expect("extract");
    assert!(groups.iter().all(|request| request.alias != DatasetAlias::Dependencies));
}

#[test]
fn transform_without_a_declared_dataset_is_missing_dataset() {
    let error = recipe(RecipeAlias::Profiles)
        .transform(&DatasetResults::new(), &RecipeParameters::new())
        .unwrap_err();
    assert!(matches!(error, RecipeError::MissingDataset(DatasetAlias::Profiles)));
}

#[test]
fn non_object_record_is_malformed() {
    let mut groups = records(Vec::new());
    groups.insert("00G1".to_string(), json!("not an object"));
    let datasets = DatasetResults::new().with(DatasetAlias::Groups, groups);
    let error = recipe(RecipeAlias::Groups)
        .transform(&datasets, &RecipeParameters::new())
        .unwrap_err();
    assert!(matches!(
        error,
        RecipeError::MalformedRecord { alias: DatasetAlias::Groups, id } if id == "00G1"
    ));
}

#[test]
fn current_user_permissions_requires_the_parameter() {
    let error = recipe(RecipeAlias::CurrentUserPermissions)
        .extract(&RecipeParameters::new())
        .unwrap_err();
    assert!(matches!(error, RecipeError::InvalidParameter { .. }));
}

#[test]
fn current_user_permissions_defaults_unknown_names_to_false() {
    let datasets = DatasetResults::new().with(
        DatasetAlias::CurrentUserPermissions,
        records(vec![json!({
            "id": "005A",
            "PermissionsModifyAllData": true,
            "PermissionsViewSetup": false
        })]),
    );
    let parameters =
        RecipeParameters::new().with("permissions", "ModifyAllData,ViewSetup,AuthorApex");
    let RecipeOutput::Map(permissions) =
        run_with(RecipeAlias::CurrentUserPermissions, &datasets, &parameters)
    else {
        panic!("expected a map");
    };
    assert_eq!(permissions.get("ModifyAllData"), Some(&json!(true)));
    assert_eq!(permissions.get("ViewSetup"), Some(&json!(false)));
    assert_eq!(permissions.get("AuthorApex"), Some(&json!(false)));
}

#[test]
fn organization_derives_edition_flags() {
    let datasets = DatasetResults::new().with(
        DatasetAlias::Organization,
        records(vec![json!({
            "id": "00D1", "name": "Acme", "type": "Enterprise Edition",
            "isSandbox": false, "isTrial": false
        })]),
    );
    let RecipeOutput::Single(organization) =
        run_with(RecipeAlias::Organization, &datasets, &RecipeParameters::new())
    else {
        panic!("expected a single entity");
    };
    let organization = organization.read();
    assert!(organization.is_true("isProduction").expect("declared"));
    assert!(organization.is_false("isDeveloperEdition").expect("declared"));
}

#[test]
fn organization_without_record_is_empty_dataset() {
    let datasets = DatasetResults::new().with(DatasetAlias::Organization, records(Vec::new()));
    let error = recipe(RecipeAlias::Organization)
        .transform(&datasets, &RecipeParameters::new())
        .unwrap_err();
    assert!(matches!(error, RecipeError::EmptyDataset(DatasetAlias::Organization)));
}
