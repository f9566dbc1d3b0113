use serde_json::{json, Value};

use super::common::*;
use crate::metadata::{
    Entity, EntityConfig, EntityError, EntityRef, EntityVariant, Property, PropertyError,
};

#[test]
fn create_copies_declared_properties_only() {
    let entity = factory(EntityVariant::Field)
        .create(EntityConfig::new(json!({
            "id": "F1",
            "name": "Amount__c",
            "favouriteColour": "teal"
        })))
        .expect("field builds");

    assert_eq!(entity.id(), Some("F1"));
    assert_eq!(entity.text("name"), Ok(Some("Amount__c")));
    assert!(entity.get("favouriteColour").is_none());
    let names: Vec<&str> = entity.properties().map(|(name, _)| name).collect();
    assert_eq!(names, EntityVariant::Field.fields());
}

#[test]
fn sealed_entity_rejects_undeclared_properties() {
    let mut entity = factory(EntityVariant::Field)
        .create(EntityConfig::new(custom_field()))
        .expect("field builds");

    let err = entity
        .set("favouriteColour", "teal")
        .expect_err("property is not declared");

    assert_eq!(
        err,
        EntityError::UndeclaredProperty {
            variant: EntityVariant::Field,
            property: "favouriteColour".to_string(),
        }
    );
    assert!(entity.set("description", "Total amount").is_ok());
}

#[test]
fn scoring_state_exists_only_for_scoring_variants() {
    let field = Entity::blank(EntityVariant::Field);
    let organization = Entity::blank(EntityVariant::Organization);

    let card = field.score().expect("fields are scored");
    assert_eq!(card.score(), 0);
    assert!(card.bad_fields().is_empty());
    assert!(card.bad_reason_ids().is_empty());
    assert!(organization.score().is_none());
}

#[test]
fn serialization_follows_variant_capabilities() {
    let graph = field_graph();
    let field = scored_with_graph(EntityVariant::Field, custom_field(), &graph);
    let organization = scored(EntityVariant::Organization, json!({ "id": "00D1" }));

    let field = serde_json::to_value(&field).expect("serializes");
    let organization = serde_json::to_value(&organization).expect("serializes");

    assert_eq!(field["score"], json!(1));
    assert_eq!(field["badFields"], json!(["dependencies.referenced"]));
    assert_eq!(field["dependencies"]["hadError"], json!(false));
    assert_eq!(field["objectRef"], Value::Null);
    assert!(organization.get("score").is_none());
    assert!(organization.get("dependencies").is_none());
}

#[test]
fn references_serialize_as_identifiers() {
    let object = EntityRef::new(
        factory(EntityVariant::Object)
            .create(EntityConfig::new(json!({ "id": "Account" })))
            .expect("object builds"),
    );
    let mut field = Entity::blank(EntityVariant::Field);
    field.set_ref("objectRef", object.clone()).expect("declared");

    let json = serde_json::to_value(&field).expect("serializes");

    assert_eq!(json["objectRef"], json!("Account"));
    assert!(field
        .reference("objectRef")
        .expect("declared")
        .is_some_and(|target| target.ptr_eq(&object)));
}

#[test]
fn push_ref_accumulates_into_a_list() {
    let user = EntityRef::new(Entity::blank(EntityVariant::User));
    let mut role = Entity::blank(EntityVariant::UserRole);

    role.push_ref("activeMemberRefs", user.clone()).expect("declared");
    role.push_ref("activeMemberRefs", user).expect("declared");

    assert_eq!(role.references("activeMemberRefs").map(<[_]>::len), Ok(2));
    assert_eq!(role.count("activeMemberRefs"), Ok(2));
    assert!(matches!(role.get("activeMemberRefs"), Some(Property::Refs(_))));
}

#[test]
fn shared_reference_sees_later_mutation() {
    let version = EntityRef::new(Entity::blank(EntityVariant::FlowVersion));
    let mut flow = Entity::blank(EntityVariant::Flow);
    flow.set_ref("currentVersionRef", version.clone()).expect("declared");

    version.write().set("description", "Routes leads").expect("declared");

    let current = flow
        .reference("currentVersionRef")
        .expect("declared")
        .expect("linked");
    assert_eq!(current.read().text("description"), Ok(Some("Routes leads")));
}

#[test]
fn accessors_treat_absent_values_as_empty() {
    let entity = Entity::blank(EntityVariant::ApexClass);

    assert_eq!(entity.is_empty("description").ok(), None);
    assert_eq!(entity.is_empty("name"), Ok(true));
    assert_eq!(entity.count("hardCodedURLs"), Ok(0));
    assert_eq!(entity.is_true("isTest"), Ok(false));
    assert_eq!(entity.is_false("isTest"), Ok(false));
    assert_eq!(entity.number("coverage"), Ok(None));
    assert_eq!(entity.references("relatedTestClassRefs").map(<[_]>::len), Ok(0));
}

#[test]
fn accessors_report_type_mismatches() {
    let mut entity = Entity::blank(EntityVariant::ApexClass);
    entity.set("isTest", "yes").expect("declared");
    entity.set("coverage", true).expect("declared");

    assert!(matches!(
        entity.is_true("isTest"),
        Err(PropertyError::TypeMismatch { expected: "a boolean", .. })
    ));
    assert!(matches!(
        entity.number("coverage"),
        Err(PropertyError::TypeMismatch { expected: "a number", .. })
    ));
    assert!(matches!(
        entity.text("favouriteColour"),
        Err(PropertyError::Undeclared { .. })
    ));
}

#[test]
fn dates_parse_from_text_and_epoch_millis() {
    let mut entity = Entity::blank(EntityVariant::Report);
    entity
        .set("lastRunDate", "2023-04-05T10:00:00.000Z")
        .expect("declared");
    entity.set("createdDate", 1_680_688_800_000_i64).expect("declared");

    let last_run = entity.date("lastRunDate").expect("parses").expect("present");
    let created = entity.date("createdDate").expect("parses").expect("present");

    assert_eq!(last_run, created);
}

#[test]
fn blank_text_counts_as_empty() {
    let mut entity = Entity::blank(EntityVariant::Flow);
    entity.set("description", "   ").expect("declared");

    assert_eq!(entity.is_empty("description"), Ok(true));
}
