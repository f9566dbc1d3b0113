//! Built-in best-practice rules.
//!
//! Every id below is a literal and is part of the public contract: stored
//! dashboards and historical comparisons key on it. Append new rules with the
//! next free id; never renumber, reorder ids, or reuse a retired one.

use super::super::entity::{Entity, PropertyError};
use super::super::variant::EntityVariant::{self, *};
use super::catalog::{is_old_api_version, RuleCategory, ScoreRule};
use chrono::{Duration, Utc};
use serde_json::Value;

type Outcome = Result<bool, PropertyError>;

const UNREFERENCED_VARIANTS: &[EntityVariant] = &[
    CustomLabel,
    Flow,
    LightningPage,
    LightningAuraComponent,
    LightningWebComponent,
    VisualForceComponent,
    VisualForcePage,
];

const DEPENDENCY_VARIANTS: &[EntityVariant] = &[
    ApexClass,
    ApexTrigger,
    CustomLabel,
    Field,
    Flow,
    LightningPage,
    LightningAuraComponent,
    LightningWebComponent,
    VisualForceComponent,
    VisualForcePage,
];

const DESCRIBED_VARIANTS: &[EntityVariant] = &[
    Flow,
    LightningPage,
    LightningAuraComponent,
    LightningWebComponent,
    VisualForcePage,
    VisualForceComponent,
    Workflow,
    WebLink,
    FieldSet,
    ValidationRule,
    Document,
    CustomTab,
    EmailTemplate,
    Dashboard,
    Report,
];

const VERSIONED_VARIANTS: &[EntityVariant] = &[
    ApexClass,
    ApexTrigger,
    Flow,
    LightningAuraComponent,
    LightningWebComponent,
    VisualForcePage,
    VisualForceComponent,
    EmailTemplate,
];

const PASSWORD_EXPIRATION_MAX_DAYS: f64 = 90.0;
const PASSWORD_HISTORY_MIN: f64 = 3.0;
const PASSWORD_LENGTH_MIN: f64 = 8.0;
const PASSWORD_COMPLEXITY_MIN: f64 = 3.0;
const IP_RANGE_MAX_ADDRESSES: f64 = 100_000.0;
const LOGIN_HOURS_MAX_MINUTES: f64 = 1_200.0;
const COVERAGE_MIN: f64 = 0.75;
const TRIGGER_LENGTH_MAX: f64 = 5_000.0;
const FLOW_VERSIONS_MAX: f64 = 7.0;
const FAILED_LOGINS_MAX: f64 = 5.0;
const STALE_AFTER_DAYS: i64 = 365;

fn not_referenced(d: &Entity) -> Outcome {
    Ok(d.no_dependents())
}

fn dependency_lookup_failed(d: &Entity) -> Outcome {
    Ok(d.dependency_lookup_failed())
}

fn no_description(d: &Entity) -> Outcome {
    d.is_empty("description")
}

fn inactive(d: &Entity) -> Outcome {
    d.is_false("isActive")
}

fn has_hard_coded_urls(d: &Entity) -> Outcome {
    Ok(d.count("hardCodedURLs")? > 0)
}

fn has_hard_coded_ids(d: &Entity) -> Outcome {
    Ok(d.count("hardCodedIDs")? > 0)
}

fn api_version_too_old(d: &Entity) -> Outcome {
    Ok(d.number("apiVersion")?.is_some_and(is_old_api_version))
}

fn above(d: &Entity, property: &str, limit: f64) -> Outcome {
    Ok(d.number(property)?.is_some_and(|value| value > limit))
}

fn below(d: &Entity, property: &str, limit: f64) -> Outcome {
    Ok(d.number(property)?.is_some_and(|value| value < limit))
}

fn equals(d: &Entity, property: &str, expected: f64) -> Outcome {
    Ok(d.number(property)? == Some(expected))
}

fn stale(d: &Entity, property: &str) -> Outcome {
    let cutoff = Utc::now() - Duration::days(STALE_AFTER_DAYS);
    Ok(d.date(property)?.is_some_and(|date| date < cutoff))
}

/// True when any object in the list property carries `key` above `limit`.
fn any_item_above(d: &Entity, property: &str, key: &str, limit: f64) -> Outcome {
    match d.value(property)? {
        None => Ok(false),
        Some(Value::Array(items)) => Ok(items.iter().any(|item| {
            item.get(key)
                .and_then(Value::as_f64)
                .is_some_and(|value| value > limit)
        })),
        Some(_) => Err(PropertyError::TypeMismatch {
            variant: d.variant(),
            property: property.to_string(),
            expected: "a list",
        }),
    }
}

pub(crate) fn builtin_rules() -> Vec<ScoreRule> {
    vec![
        ScoreRule {
            id: 0,
            description: "Not referenced anywhere",
            formula: not_referenced,
            error_message: "This component is not referenced anywhere (as reported by the dependency lookup). Review the need to keep it in the org.",
            bad_field: "dependencies.referenced",
            applicable: UNREFERENCED_VARIANTS,
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 1,
            description: "No reference anywhere for custom field",
            formula: |d| Ok(d.is_true("isCustom")? && d.no_dependents()),
            error_message: "This custom field is not referenced anywhere (as reported by the dependency lookup). Review the need to keep it in the org.",
            bad_field: "dependencies.referenced",
            applicable: &[Field],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 2,
            description: "No reference anywhere for apex class",
            formula: |d| Ok(d.is_false("isTest")? && d.no_dependents()),
            error_message: "This apex class is not referenced anywhere (as reported by the dependency lookup). Review the need to keep it in the org.",
            bad_field: "dependencies.referenced",
            applicable: &[ApexClass],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 3,
            description: "Dependencies not found",
            formula: dependency_lookup_failed,
            error_message: "The dependency lookup failed for this component, so its usage could not be checked.",
            bad_field: "dependencies",
            applicable: DEPENDENCY_VARIANTS,
            category: RuleCategory::Dependency,
        },
        ScoreRule {
            id: 4,
            description: "No description",
            formula: no_description,
            error_message: "This component does not have a description. Document it so the next maintainer knows why it exists.",
            bad_field: "description",
            applicable: DESCRIBED_VARIANTS,
            category: RuleCategory::Documentation,
        },
        ScoreRule {
            id: 5,
            description: "No description for custom component",
            formula: |d| Ok(d.is_true("isCustom")? && d.is_empty("description")?),
            error_message: "This custom component does not have a description. Document it so the next maintainer knows why it exists.",
            bad_field: "description",
            applicable: &[PermissionSet, Profile],
            category: RuleCategory::Documentation,
        },
        ScoreRule {
            id: 6,
            description: "No explicit sharing in apex class",
            formula: |d| {
                Ok(d.is_false("isTest")?
                    && d.is_true("isClass")?
                    && d.is_empty("specifiedSharing")?)
            },
            error_message: "This apex class does not specify a sharing model. Declare with, without or inherited sharing explicitly.",
            bad_field: "specifiedSharing",
            applicable: &[ApexClass],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 7,
            description: "Schedulable should be scheduled",
            formula: |d| Ok(d.is_false("isScheduled")? && d.is_true("isSchedulable")?),
            error_message: "This apex class implements Schedulable but is not scheduled.",
            bad_field: "isScheduled",
            applicable: &[ApexClass],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 8,
            description: "Not able to compile class",
            formula: |d| d.is_true("needsRecompilation"),
            error_message: "This apex class could not be compiled by the platform. Recompile it or fix the underlying error.",
            bad_field: "name",
            applicable: &[ApexClass],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 9,
            description: "No coverage for this class",
            formula: |d| {
                Ok(d.is_false("isTest")?
                    && d.number("coverage")?.map_or(true, |coverage| coverage <= 0.0))
            },
            error_message: "This apex class is not covered by any test.",
            bad_field: "coverage",
            applicable: &[ApexClass],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 10,
            description: "Coverage not enough",
            formula: |d| {
                Ok(d
                    .number("coverage")?
                    .is_some_and(|coverage| coverage > 0.0 && coverage < COVERAGE_MIN))
            },
            error_message: "This apex class is covered below 75%. Improve its tests.",
            bad_field: "coverage",
            applicable: &[ApexClass],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 11,
            description: "At least one testing method failed",
            formula: |d| Ok(d.is_true("isTest")? && d.count("testFailedMethods")? > 0),
            error_message: "This test class has at least one failing method.",
            bad_field: "testFailedMethods",
            applicable: &[ApexClass],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 12,
            description: "Apex trigger should not contain SOQL statement",
            formula: |d| d.is_true("hasSOQL"),
            error_message: "This apex trigger runs a SOQL query. Move data access into a handler class.",
            bad_field: "hasSOQL",
            applicable: &[ApexTrigger],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 13,
            description: "Apex trigger should not contain DML action",
            formula: |d| d.is_true("hasDML"),
            error_message: "This apex trigger performs DML. Move data changes into a handler class.",
            bad_field: "hasDML",
            applicable: &[ApexTrigger],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 14,
            description: "Apex trigger should not contain logic",
            formula: |d| above(d, "length", TRIGGER_LENGTH_MAX),
            error_message: "This apex trigger is long enough to carry business logic. Keep triggers as thin dispatchers.",
            bad_field: "length",
            applicable: &[ApexTrigger],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 15,
            description: "No direct member for this group",
            formula: |d| {
                Ok(d.is_empty("relatedId")?
                    && d.count("directUserIds")? == 0
                    && d.count("directGroupIds")? == 0)
            },
            error_message: "This group has no direct user or group member.",
            bad_field: "directUserIds",
            applicable: &[Group],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 16,
            description: "Custom permset or profile with no member",
            formula: |d| Ok(d.is_true("isCustom")? && equals(d, "memberCounts", 0.0)?),
            error_message: "This custom permission set or profile is assigned to nobody.",
            bad_field: "memberCounts",
            applicable: &[PermissionSet, Profile],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 17,
            description: "Role with no active users",
            formula: |d| equals(d, "activeMembersCount", 0.0),
            error_message: "This role has no active user.",
            bad_field: "activeMembersCount",
            applicable: &[UserRole],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 18,
            description: "Active user not under LEX",
            formula: |d| d.is_false("onLightningExperience"),
            error_message: "This active user still works in the legacy interface.",
            bad_field: "onLightningExperience",
            applicable: &[User],
            category: RuleCategory::UserAdoption,
        },
        ScoreRule {
            id: 19,
            description: "Active user never logged",
            formula: |d| d.is_empty("lastLogin"),
            error_message: "This active user never logged in. Deactivate it to free the license.",
            bad_field: "lastLogin",
            applicable: &[User],
            category: RuleCategory::UserAdoption,
        },
        ScoreRule {
            id: 20,
            description: "Workflow with no action",
            formula: |d| Ok(d.count("actions")? == 0 && d.count("futureActions")? == 0),
            error_message: "This workflow rule has no immediate nor time-triggered action.",
            bad_field: "actions",
            applicable: &[Workflow],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 21,
            description: "Workflow with empty time triggered list",
            formula: |d| Ok(d.count("emptyTimeTriggers")? > 0),
            error_message: "This workflow rule declares time triggers without any action.",
            bad_field: "emptyTimeTriggers",
            applicable: &[Workflow],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 22,
            description: "Password policy with question containing password",
            formula: |d| d.is_true("passwordQuestion"),
            error_message: "This policy lets the password hint question contain the password itself.",
            bad_field: "passwordQuestion",
            applicable: &[ProfilePasswordPolicy],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 23,
            description: "Password policy with too big expiration",
            formula: |d| above(d, "passwordExpiration", PASSWORD_EXPIRATION_MAX_DAYS),
            error_message: "Passwords under this policy expire after more than 90 days.",
            bad_field: "passwordExpiration",
            applicable: &[ProfilePasswordPolicy],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 24,
            description: "Password policy with no expiration",
            formula: |d| equals(d, "passwordExpiration", 0.0),
            error_message: "Passwords under this policy never expire.",
            bad_field: "passwordExpiration",
            applicable: &[ProfilePasswordPolicy],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 25,
            description: "Password history too small",
            formula: |d| below(d, "passwordHistory", PASSWORD_HISTORY_MIN),
            error_message: "This policy remembers fewer than 3 previous passwords.",
            bad_field: "passwordHistory",
            applicable: &[ProfilePasswordPolicy],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 26,
            description: "Password minimum size too small",
            formula: |d| below(d, "minimumPasswordLength", PASSWORD_LENGTH_MIN),
            error_message: "This policy accepts passwords shorter than 8 characters.",
            bad_field: "minimumPasswordLength",
            applicable: &[ProfilePasswordPolicy],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 27,
            description: "Password complexity too weak",
            formula: |d| below(d, "passwordComplexity", PASSWORD_COMPLEXITY_MIN),
            error_message: "This policy does not require mixed character classes.",
            bad_field: "passwordComplexity",
            applicable: &[ProfilePasswordPolicy],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 28,
            description: "No max login attempts set",
            formula: |d| d.is_empty("maxLoginAttempts"),
            error_message: "This policy never locks an account after failed logins.",
            bad_field: "maxLoginAttempts",
            applicable: &[ProfilePasswordPolicy],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 29,
            description: "No lockout period set",
            formula: |d| d.is_empty("lockoutInterval"),
            error_message: "This policy does not define a lockout period.",
            bad_field: "lockoutInterval",
            applicable: &[ProfilePasswordPolicy],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 30,
            description: "IP Range too large",
            formula: |d| any_item_above(d, "ipRanges", "difference", IP_RANGE_MAX_ADDRESSES),
            error_message: "This profile allows logins from an IP range wider than 100,000 addresses.",
            bad_field: "ipRanges",
            applicable: &[ProfileRestrictions],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 31,
            description: "Login hours too large",
            formula: |d| any_item_above(d, "loginHours", "difference", LOGIN_HOURS_MAX_MINUTES),
            error_message: "This profile allows logins for more than 20 hours on at least one day.",
            bad_field: "loginHours",
            applicable: &[ProfileRestrictions],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 32,
            description: "Inactive component",
            formula: inactive,
            error_message: "This component is inactive. Delete it if it is no longer needed.",
            bad_field: "isActive",
            applicable: &[ValidationRule, RecordType, ApexTrigger, Workflow, EmailTemplate],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 33,
            description: "No active version for this flow",
            formula: |d| d.is_false("isVersionActive"),
            error_message: "This flow has no active version.",
            bad_field: "isVersionActive",
            applicable: &[Flow],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 34,
            description: "Too many versions under this flow",
            formula: |d| above(d, "versionsCount", FLOW_VERSIONS_MAX),
            error_message: "This flow keeps more than 7 versions. Delete obsolete ones.",
            bad_field: "versionsCount",
            applicable: &[Flow],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 35,
            description: "Migrate this process builder",
            formula: |d| d.is_true("isProcessBuilder"),
            error_message: "Process builders are retired. Migrate this one to a record-triggered flow.",
            bad_field: "currentVersionRef.type",
            applicable: &[Flow],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 36,
            description: "No description for the current version of a flow",
            formula: |d| match d.reference("currentVersionRef")? {
                Some(version) => version.read().is_empty("description"),
                None => Ok(false),
            },
            error_message: "The current version of this flow does not have a description.",
            bad_field: "currentVersionRef.description",
            applicable: &[Flow],
            category: RuleCategory::Documentation,
        },
        ScoreRule {
            id: 37,
            description: "API Version too old",
            formula: api_version_too_old,
            error_message: "This component runs on an API version at least three years old.",
            bad_field: "apiVersion",
            applicable: VERSIONED_VARIANTS,
            category: RuleCategory::ApiVersion,
        },
        ScoreRule {
            id: 38,
            description: "No assert in this Apex Test",
            formula: |d| Ok(d.is_true("isTest")? && equals(d, "nbSystemAsserts", 0.0)?),
            error_message: "This test class never asserts anything.",
            bad_field: "nbSystemAsserts",
            applicable: &[ApexClass],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 39,
            description: "Page layout not assigned to any profile",
            formula: |d| equals(d, "profileAssignmentCount", 0.0),
            error_message: "This page layout is not assigned to any profile.",
            bad_field: "profileAssignmentCount",
            applicable: &[PageLayout],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 40,
            description: "Hard-coded URL in apex code",
            formula: has_hard_coded_urls,
            error_message: "This apex code contains a hard-coded instance URL.",
            bad_field: "hardCodedURLs",
            applicable: &[ApexClass, ApexTrigger],
            category: RuleCategory::HardCodedUrl,
        },
        ScoreRule {
            id: 41,
            description: "Hard-coded ID in apex code",
            formula: has_hard_coded_ids,
            error_message: "This apex code contains a hard-coded record ID.",
            bad_field: "hardCodedIDs",
            applicable: &[ApexClass, ApexTrigger],
            category: RuleCategory::HardCodedId,
        },
        ScoreRule {
            id: 42,
            description: "Hard-coded URL in Visualforce",
            formula: has_hard_coded_urls,
            error_message: "This Visualforce markup contains a hard-coded instance URL.",
            bad_field: "hardCodedURLs",
            applicable: &[VisualForcePage, VisualForceComponent],
            category: RuleCategory::HardCodedUrl,
        },
        ScoreRule {
            id: 43,
            description: "Hard-coded ID in Visualforce",
            formula: has_hard_coded_ids,
            error_message: "This Visualforce markup contains a hard-coded record ID.",
            bad_field: "hardCodedIDs",
            applicable: &[VisualForcePage, VisualForceComponent],
            category: RuleCategory::HardCodedId,
        },
        ScoreRule {
            id: 44,
            description: "Hard-coded URL in a formula field",
            formula: has_hard_coded_urls,
            error_message: "This formula contains a hard-coded instance URL.",
            bad_field: "hardCodedURLs",
            applicable: &[Field],
            category: RuleCategory::HardCodedUrl,
        },
        ScoreRule {
            id: 45,
            description: "Hard-coded ID in a formula field",
            formula: has_hard_coded_ids,
            error_message: "This formula contains a hard-coded record ID.",
            bad_field: "hardCodedIDs",
            applicable: &[Field],
            category: RuleCategory::HardCodedId,
        },
        ScoreRule {
            id: 46,
            description: "Hard-coded URL in a validation rule",
            formula: has_hard_coded_urls,
            error_message: "This validation rule contains a hard-coded instance URL.",
            bad_field: "hardCodedURLs",
            applicable: &[ValidationRule],
            category: RuleCategory::HardCodedUrl,
        },
        ScoreRule {
            id: 47,
            description: "Hard-coded ID in a validation rule",
            formula: has_hard_coded_ids,
            error_message: "This validation rule contains a hard-coded record ID.",
            bad_field: "hardCodedIDs",
            applicable: &[ValidationRule],
            category: RuleCategory::HardCodedId,
        },
        ScoreRule {
            id: 48,
            description: "Hard-coded URL in a web link or tab",
            formula: has_hard_coded_urls,
            error_message: "This link contains a hard-coded instance URL.",
            bad_field: "hardCodedURLs",
            applicable: &[WebLink, CustomTab],
            category: RuleCategory::HardCodedUrl,
        },
        ScoreRule {
            id: 49,
            description: "Hard-coded ID in a web link or tab",
            formula: has_hard_coded_ids,
            error_message: "This link contains a hard-coded record ID.",
            bad_field: "hardCodedIDs",
            applicable: &[WebLink, CustomTab],
            category: RuleCategory::HardCodedId,
        },
        ScoreRule {
            id: 50,
            description: "Hard-coded URL in a home page component",
            formula: has_hard_coded_urls,
            error_message: "This home page component contains a hard-coded instance URL.",
            bad_field: "hardCodedURLs",
            applicable: &[HomePageComponent],
            category: RuleCategory::HardCodedUrl,
        },
        ScoreRule {
            id: 51,
            description: "Hard-coded ID in a home page component",
            formula: has_hard_coded_ids,
            error_message: "This home page component contains a hard-coded record ID.",
            bad_field: "hardCodedIDs",
            applicable: &[HomePageComponent],
            category: RuleCategory::HardCodedId,
        },
        ScoreRule {
            id: 52,
            description: "Hard-coded URL in an email template",
            formula: has_hard_coded_urls,
            error_message: "This email template contains a hard-coded instance URL.",
            bad_field: "hardCodedURLs",
            applicable: &[EmailTemplate],
            category: RuleCategory::HardCodedUrl,
        },
        ScoreRule {
            id: 53,
            description: "Hard-coded ID in an email template",
            formula: has_hard_coded_ids,
            error_message: "This email template contains a hard-coded record ID.",
            bad_field: "hardCodedIDs",
            applicable: &[EmailTemplate],
            category: RuleCategory::HardCodedId,
        },
        ScoreRule {
            id: 54,
            description: "Document stored as a hard-coded URL",
            formula: |d| d.is_true("isHardCodedURL"),
            error_message: "This document points at a hard-coded instance URL.",
            bad_field: "documentUrl",
            applicable: &[Document],
            category: RuleCategory::HardCodedUrl,
        },
        ScoreRule {
            id: 55,
            description: "Home page component with an empty body",
            formula: |d| d.is_true("isBodyEmpty"),
            error_message: "This home page component renders nothing.",
            bad_field: "isBodyEmpty",
            applicable: &[HomePageComponent],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 56,
            description: "Dashboard not viewed for a year",
            formula: |d| stale(d, "lastViewedDate"),
            error_message: "Nobody viewed this dashboard during the last year.",
            bad_field: "lastViewedDate",
            applicable: &[Dashboard],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 57,
            description: "Dashboard not refreshed for a year",
            formula: |d| stale(d, "lastRefreshDate"),
            error_message: "This dashboard was not refreshed during the last year.",
            bad_field: "lastRefreshDate",
            applicable: &[Dashboard],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 58,
            description: "Report not run for a year",
            formula: |d| stale(d, "lastRunDate"),
            error_message: "Nobody ran this report during the last year.",
            bad_field: "lastRunDate",
            applicable: &[Report],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 59,
            description: "Report never run",
            formula: |d| d.is_empty("lastRunDate"),
            error_message: "Nobody ever ran this report.",
            bad_field: "lastRunDate",
            applicable: &[Report],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 60,
            description: "Email template not used for a year",
            formula: |d| stale(d, "lastUsedDate"),
            error_message: "This email template was not sent during the last year.",
            bad_field: "lastUsedDate",
            applicable: &[EmailTemplate],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 61,
            description: "User bypassing multi-factor authentication",
            formula: |d| d.is_true("hasMfaByPass"),
            error_message: "This user is allowed to skip multi-factor authentication.",
            bad_field: "hasMfaByPass",
            applicable: &[User],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 62,
            description: "Too many failed logins",
            formula: |d| above(d, "numberFailedLogins", FAILED_LOGINS_MAX),
            error_message: "This user failed to log in more than 5 times in a row.",
            bad_field: "numberFailedLogins",
            applicable: &[User],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 63,
            description: "Password not changed for a year",
            formula: |d| stale(d, "lastPasswordChange"),
            error_message: "This user kept the same password for more than a year.",
            bad_field: "lastPasswordChange",
            applicable: &[User],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 64,
            description: "Custom permset or profile with admin-like permissions",
            formula: |d| Ok(d.is_true("isCustom")? && d.is_true("isAdminLike")?),
            error_message: "This custom permission set or profile grants admin-like permissions.",
            bad_field: "importantPermissions",
            applicable: &[PermissionSet, Profile],
            category: RuleCategory::Security,
        },
        ScoreRule {
            id: 65,
            description: "Permission set with no permission",
            formula: |d| {
                Ok(!d.is_true("isGroup")?
                    && equals(d, "nbFieldPermissions", 0.0)?
                    && equals(d, "nbObjectPermissions", 0.0)?)
            },
            error_message: "This permission set grants no field nor object permission.",
            bad_field: "nbObjectPermissions",
            applicable: &[PermissionSet],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 66,
            description: "Unused permission set license",
            formula: |d| Ok(equals(d, "usedCount", 0.0)? && above(d, "totalCount", 0.0)?),
            error_message: "None of the seats of this permission set license are used.",
            bad_field: "usedCount",
            applicable: &[PermissionSetLicense],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 67,
            description: "Permission set license fully consumed",
            formula: |d| Ok(equals(d, "remainingCount", 0.0)? && above(d, "totalCount", 0.0)?),
            error_message: "Every seat of this permission set license is used.",
            bad_field: "remainingCount",
            applicable: &[PermissionSetLicense],
            category: RuleCategory::Overuse,
        },
        ScoreRule {
            id: 68,
            description: "Permission set license not linked to any permission set",
            formula: |d| Ok(d.count("permissionSetIds")? == 0),
            error_message: "No permission set is linked to this license.",
            bad_field: "permissionSetIds",
            applicable: &[PermissionSetLicense],
            category: RuleCategory::Useless,
        },
        ScoreRule {
            id: 69,
            description: "Default record type is inactive",
            formula: |d| Ok(d.is_true("isDefault")? && d.is_false("isActive")?),
            error_message: "This record type is the default one but is inactive.",
            bad_field: "isDefault",
            applicable: &[RecordType],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 70,
            description: "Test class without executed method",
            formula: |d| {
                Ok(d.is_true("isTest")?
                    && d.count("testPassedMethods")? == 0
                    && d.count("testFailedMethods")? == 0)
            },
            error_message: "No method of this test class ran during the last test execution.",
            bad_field: "testPassedMethods",
            applicable: &[ApexClass],
            category: RuleCategory::BadCode,
        },
        ScoreRule {
            id: 71,
            description: "User with admin-like permissions",
            formula: |d| d.is_true("isAdminLike"),
            error_message: "This user holds admin-like permissions through a profile or permission set.",
            bad_field: "isAdminLike",
            applicable: &[User],
            category: RuleCategory::Security,
        },
    ]
}
