use serde_json::json;

use super::common::{find, ids, list, objects, records, reasons, rows, run, run_with, with_dependencies};
use crate::recipes::dataset::{DatasetAlias, DatasetResults, RawDataset};
use crate::recipes::{RecipeAlias, RecipeParameters};

fn field_dependencies() -> RawDataset {
    rows(vec![
        json!({ "id": "L1", "type": "Layout", "refId": "F2", "refType": "CustomField" }),
        json!({ "id": "F1", "type": "CustomField", "refId": "F3", "refType": "CustomField" }),
    ])
}

fn custom_field_datasets() -> DatasetResults {
    DatasetResults::new()
        .with(
            DatasetAlias::CustomFields,
            records(vec![
                json!({ "id": "F1", "name": "Amount__c", "isCustom": true, "objectId": "Invoice__c" }),
                json!({ "id": "F2", "name": "Status__c", "isCustom": true, "objectId": "Invoice__c" }),
                json!({ "id": "F3", "name": "Rate__c", "isCustom": true, "objectId": "Account", "package": "acme" }),
            ]),
        )
        .with(DatasetAlias::Objects, objects())
        .with(DatasetAlias::Dependencies, field_dependencies())
}

#[test]
fn custom_fields_are_linked_to_their_object() {
    let fields = list(run(RecipeAlias::CustomFields, &custom_field_datasets()));
    assert_eq!(ids(&fields), vec!["F1", "F2", "F3"]);

    let amount = find(&fields, "F1");
    let amount = amount.read();
    let object = amount
        .reference("objectRef")
        .expect("declared")
        .expect("object resolved");
    assert_eq!(object.read().text("label").expect("declared"), Some("Invoice"));
}

#[test]
fn custom_fields_are_scored_against_the_dependency_graph() {
    let fields = list(run(RecipeAlias::CustomFields, &custom_field_datasets()));
    assert_eq!(reasons(&find(&fields, "F1")), vec![1]);
    assert!(reasons(&find(&fields, "F2")).is_empty());
    assert!(reasons(&find(&fields, "F3")).is_empty());
    let score = find(&fields, "F1").read().score().map(|card| card.score());
    assert_eq!(score, Some(1));
}

#[test]
fn namespace_filter_applies_to_custom_fields() {
    let unpackaged = list(run_with(
        RecipeAlias::CustomFields,
        &custom_field_datasets(),
        &RecipeParameters::new().with("namespace", ""),
    ));
    assert_eq!(ids(&unpackaged), vec!["F1", "F2"]);

    let packaged = list(run_with(
        RecipeAlias::CustomFields,
        &custom_field_datasets(),
        &RecipeParameters::new().with("namespace", "acme"),
    ));
    assert_eq!(ids(&packaged), vec!["F3"]);
}

#[test]
fn field_with_unknown_object_keeps_an_empty_reference() {
    let datasets = DatasetResults::new()
        .with(
            DatasetAlias::CustomFields,
            records(vec![json!({ "id": "F9", "isCustom": true, "objectId": "Gone__c" })]),
        )
        .with(DatasetAlias::Objects, objects());
    let fields = list(run(RecipeAlias::CustomFields, &with_dependencies(datasets)));
    let field = find(&fields, "F9");
    assert!(field.read().reference("objectRef").expect("declared").is_none());
}

#[test]
fn apex_classes_link_test_classes_outside_the_namespace_filter() {
    let datasets = with_dependencies(DatasetResults::new().with(
        DatasetAlias::ApexClasses,
        records(vec![
            json!({ "id": "C1", "name": "InvoiceService", "relatedTestClassIds": ["T1"] }),
            json!({ "id": "T1", "name": "InvoiceServiceTest", "isTest": true, "package": "acme" }),
        ]),
    ));
    let classes = list(run_with(
        RecipeAlias::ApexClasses,
        &datasets,
        &RecipeParameters::new().with("namespace", ""),
    ));
    assert_eq!(ids(&classes), vec!["C1"]);

    let service = find(&classes, "C1");
    let service = service.read();
    let tests = service.references("relatedTestClassRefs").expect("declared");
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].id().as_deref(), Some("T1"));
}

#[test]
fn apex_triggers_are_linked_to_their_object() {
    let datasets = DatasetResults::new()
        .with(
            DatasetAlias::ApexTriggers,
            records(vec![json!({
                "id": "TR1", "name": "InvoiceTrigger", "objectId": "Invoice__c",
                "hasSOQL": true, "hasDML": true, "isActive": false
            })]),
        )
        .with(DatasetAlias::Objects, objects());
    let triggers = list(run(RecipeAlias::ApexTriggers, &with_dependencies(datasets)));
    let trigger = find(&triggers, "TR1");
    assert_eq!(reasons(&trigger), vec![12, 13, 32]);
    assert!(trigger.read().reference("objectRef").expect("declared").is_some());
}

fn flow_datasets() -> DatasetResults {
    DatasetResults::new()
        .with(
            DatasetAlias::Flows,
            records(vec![
                json!({
                    "id": "FL1", "name": "Invoice Process", "description": "Routes invoices",
                    "isVersionActive": true, "currentVersionId": "FV1"
                }),
                json!({
                    "id": "FL2", "name": "Reminder", "isVersionActive": true,
                    "currentVersionId": "FV2"
                }),
            ]),
        )
        .with(
            DatasetAlias::FlowVersions,
            records(vec![
                json!({ "id": "FV1", "type": "Workflow", "description": "v1" }),
                json!({ "id": "FV2", "type": "AutoLaunchedFlow" }),
            ]),
        )
        .with(
            DatasetAlias::Dependencies,
            rows(vec![
                json!({ "id": "LP1", "type": "FlexiPage", "refId": "FV1", "refType": "FlowVersion" }),
                json!({ "id": "LP2", "type": "FlexiPage", "refId": "FL2", "refType": "Flow" }),
            ]),
        )
}

#[test]
fn flows_flag_process_builders_from_their_current_version() {
    let flows = list(run(RecipeAlias::Flows, &flow_datasets()));
    let process = find(&flows, "FL1");
    let reminder = find(&flows, "FL2");
    assert!(process.read().is_true("isProcessBuilder").expect("declared"));
    assert!(reminder.read().is_false("isProcessBuilder").expect("declared"));
}

#[test]
fn flows_are_scored_after_the_version_join() {
    let flows = list(run(RecipeAlias::Flows, &flow_datasets()));
    // FL1 is only referenced through its version id.
    assert_eq!(reasons(&find(&flows, "FL1")), vec![35]);
    assert_eq!(reasons(&find(&flows, "FL2")), vec![4, 36]);
}

#[test]
fn simple_list_scores_dependencies_and_failed_lookups() {
    let datasets = DatasetResults::new()
        .with(
            DatasetAlias::CustomLabels,
            records(vec![
                json!({ "id": "CL1", "name": "Greeting" }),
                json!({ "id": "CL2", "name": "Farewell" }),
                json!({ "id": "CL3", "name": "Unknown" }),
            ]),
        )
        .with(
            DatasetAlias::Dependencies,
            rows(vec![
                json!({ "id": "VF1", "type": "ApexPage", "refId": "CL1", "refType": "CustomLabel" }),
                json!({ "failedId": "CL3" }),
            ]),
        );
    let labels = list(run(RecipeAlias::CustomLabels, &datasets));
    assert!(reasons(&find(&labels, "CL1")).is_empty());
    assert_eq!(reasons(&find(&labels, "CL2")), vec![0]);
    assert_eq!(reasons(&find(&labels, "CL3")), vec![3]);
}

#[test]
fn simple_list_uses_the_dataset_key_when_records_lack_an_id() {
    let mut groups = RawDataset::new();
    groups.insert("00G1".to_string(), json!({ "name": "Support", "type": "Queue" }));
    let datasets = DatasetResults::new().with(DatasetAlias::Groups, groups);
    let listed = list(run(RecipeAlias::Groups, &datasets));
    assert_eq!(ids(&listed), vec!["00G1"]);
}
