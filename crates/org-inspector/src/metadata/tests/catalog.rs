use std::collections::BTreeSet;

use chrono::NaiveDate;
use proptest::prelude::*;

use crate::metadata::{
    is_old_api_version, platform_version_on, CatalogError, Entity, EntityVariant, RuleCatalog,
    RuleCategory, ScoreRule, current_platform_version,
};

fn rule(id: u32, applicable: &'static [EntityVariant]) -> ScoreRule {
    ScoreRule {
        id,
        description: "test rule",
        formula: |_| Ok(true),
        error_message: "test rule matched",
        bad_field: "name",
        applicable,
        category: RuleCategory::Useless,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn builtin_catalog_has_unique_ids() {
    let catalog = RuleCatalog::global();

    let ids: BTreeSet<u32> = catalog.rules().iter().map(|rule| rule.id).collect();

    assert_eq!(ids.len(), catalog.len());
    assert!(!catalog.is_empty());
    assert_eq!(catalog.rule(1).map(|rule| rule.description), Some("No reference anywhere for custom field"));
}

#[test]
fn startup_validation_installs_the_shared_catalog() {
    let validated = RuleCatalog::builtin().expect("built-in rules are valid");

    assert!(std::ptr::eq(validated, RuleCatalog::global()));
    assert_eq!(validated.len(), RuleCatalog::global().len());
}

#[test]
fn every_builtin_rule_reads_only_declared_properties() {
    for rule in RuleCatalog::global().rules() {
        for variant in rule.applicable {
            let blank = Entity::blank(*variant);
            assert!(
                rule.evaluate(&blank).is_ok(),
                "rule {} fails on a blank {variant}",
                rule.id
            );
        }
    }
}

#[test]
fn catalog_rejects_duplicate_ids() {
    let err = RuleCatalog::new(vec![
        rule(7, &[EntityVariant::Field]),
        rule(7, &[EntityVariant::Flow]),
    ])
    .expect_err("duplicate id");

    assert_eq!(err, CatalogError::DuplicateId(7));
}

#[test]
fn catalog_rejects_rules_without_variants() {
    let err = RuleCatalog::new(vec![rule(1, &[])]).expect_err("no variant");

    assert_eq!(err, CatalogError::NoApplicableVariant(1));
}

#[test]
fn catalog_rejects_non_scoring_variants() {
    let err = RuleCatalog::new(vec![rule(2, &[EntityVariant::Field, EntityVariant::Limit])])
        .expect_err("limits are not scored");

    assert_eq!(
        err,
        CatalogError::VariantWithoutScoring {
            rule_id: 2,
            variant: EntityVariant::Limit,
        }
    );
}

#[test]
fn category_queries_follow_catalog_order() {
    let catalog = RuleCatalog::global();

    let hard_coded_urls = catalog.ids_for_category(RuleCategory::HardCodedUrl);

    assert_eq!(hard_coded_urls, vec![40, 42, 44, 46, 48, 50, 52, 54]);
    assert_eq!(catalog.ids_for_category(RuleCategory::Dependency), vec![3]);
    assert!(catalog
        .by_category(RuleCategory::Security)
        .iter()
        .all(|rule| rule.category == RuleCategory::Security));
}

#[test]
fn applicable_rules_are_filtered_by_variant() {
    let catalog = RuleCatalog::global();

    let ids: Vec<u32> = catalog
        .applicable_to(EntityVariant::Field)
        .iter()
        .map(|rule| rule.id)
        .collect();

    assert_eq!(ids, vec![1, 3, 44, 45]);
    assert!(catalog.applicable_to(EntityVariant::Organization).is_empty());
}

#[test]
fn categories_parse_from_command_line_spellings() {
    assert_eq!(RuleCategory::parse("bad-code"), Some(RuleCategory::BadCode));
    assert_eq!(RuleCategory::parse("Hard Coded URL"), Some(RuleCategory::HardCodedUrl));
    assert_eq!(RuleCategory::parse("user_adoption"), Some(RuleCategory::UserAdoption));
    assert_eq!(RuleCategory::parse("style"), None);
    assert_eq!(RuleCategory::ApiVersion.to_string(), "API Version");
}

#[test]
fn platform_version_follows_release_calendar() {
    assert_eq!(platform_version_on(date(2022, 1, 10)), 53);
    assert_eq!(platform_version_on(date(2022, 2, 15)), 54);
    assert_eq!(platform_version_on(date(2022, 6, 1)), 55);
    assert_eq!(platform_version_on(date(2022, 10, 1)), 56);
    assert_eq!(platform_version_on(date(2023, 2, 1)), 57);
    assert_eq!(platform_version_on(date(2024, 1, 1)), 59);
}

#[test]
fn old_api_versions_are_three_years_behind() {
    let current = f64::from(current_platform_version());

    assert!(is_old_api_version(30.0));
    assert!(is_old_api_version(current - 9.0));
    assert!(!is_old_api_version(current - 8.0));
    assert!(!is_old_api_version(current));
}

proptest! {
    #[test]
    fn platform_version_never_decreases(first in 0u32..6_000, gap in 0u32..1_500) {
        let start = date(2022, 1, 1);
        let earlier = start + chrono::Duration::days(i64::from(first));
        let later = earlier + chrono::Duration::days(i64::from(gap));
        prop_assert!(platform_version_on(earlier) <= platform_version_on(later));
    }
}
