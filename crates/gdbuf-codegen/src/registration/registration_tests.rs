#![allow(non_snake_case)]

use super::*;
use crate::emitter::BindingEmitter;
use crate::mapper::MappedType;
use gdbuf_core::prelude::{FieldDef, FileDef, MessageDef};
use gdbuf_core::{GeneratorConfig, SchemaBuilder};

fn classes(file: FileDef) -> Vec<GeneratedClass> {
    let schema = SchemaBuilder::new().with_file(file).build().unwrap();
    let config = GeneratorConfig {
        enum_table: false,
        ..GeneratorConfig::default()
    };
    BindingEmitter::new(&schema, &config).unwrap().emit().unwrap()
}

fn order(table: &RegistrationTable) -> Vec<&str> {
    table
        .order()
        .into_iter()
        .map(|name| name.rsplit("::").next().unwrap_or(name))
        .collect()
}

#[test]
fn RegistrationTable___referenced_class___precedes_referencing_class() {
    let classes = classes(
        FileDef::new("test.proto")
            .message(
                MessageDef::new("Nested")
                    .field(FieldDef::new("dep", 1, "Dependency"))
                    .field(FieldDef::new("vals", 2, "int32").repeated()),
            )
            .message(MessageDef::new("Dependency").field(FieldDef::new("name", 1, "string"))),
    );

    let table = RegistrationTable::build(&classes, InitializationLevel::Scene).unwrap();

    assert_eq!(order(&table), vec!["Dependency", "Nested"]);
    assert_eq!(table.header_first().count(), 0);
}

#[test]
fn RegistrationTable___unrelated_classes___keep_emission_order() {
    let classes = classes(
        FileDef::new("test.proto")
            .message(MessageDef::new("C"))
            .message(MessageDef::new("A"))
            .message(MessageDef::new("B")),
    );

    let table = RegistrationTable::build(&classes, InitializationLevel::Scene).unwrap();

    assert_eq!(order(&table), vec!["C", "A", "B"]);
}

#[test]
fn RegistrationTable___self_reference___needs_no_header() {
    let classes = classes(FileDef::new("test.proto").message(
        MessageDef::new("RecursiveMessage")
            .field(FieldDef::new("child", 1, "RecursiveMessage"))
            .field(FieldDef::new("children", 2, "RecursiveMessage").repeated()),
    ));

    let table = RegistrationTable::build(&classes, InitializationLevel::Scene).unwrap();

    assert_eq!(table.len(), 1);
    assert!(!table.entries()[0].header_first);
    assert!(table.entries()[0].forward_refs.is_empty());
}

#[test]
fn RegistrationTable___mutual_cycle___marks_closing_class_header_first() {
    let classes = classes(
        FileDef::new("test.proto")
            .message(MessageDef::new("A").field(FieldDef::new("b", 1, "B")))
            .message(MessageDef::new("B").field(FieldDef::new("a", 1, "A"))),
    );

    let table = RegistrationTable::build(&classes, InitializationLevel::Scene).unwrap();

    assert_eq!(order(&table), vec!["B", "A"]);
    let a = &table.entries()[1];
    let b = &table.entries()[0];
    assert!(a.header_first);
    assert!(!b.header_first);
    assert_eq!(b.forward_refs, vec![a.qualified_name.clone()]);
}

#[test]
fn RegistrationTable___nested_cycle_through_parent___terminates() {
    let classes = classes(FileDef::new("test.proto").message(
        MessageDef::new("Tree")
            .field(FieldDef::new("root", 1, "Node"))
            .nested(MessageDef::new("Node").field(FieldDef::new("owner", 1, "Tree"))),
    ));

    let table = RegistrationTable::build(&classes, InitializationLevel::Scene).unwrap();

    assert_eq!(order(&table), vec!["Tree", "TreeNode"]);
    let header: Vec<_> = table.header_first().map(|e| e.qualified_name.as_str()).collect();
    assert_eq!(header, vec!["gdbuf::test::TreeNode"]);
}

#[test]
fn RegistrationTable___map_value_reference___is_an_edge() {
    let classes = classes(
        FileDef::new("test.proto")
            .message(MessageDef::new("Inventory").field(FieldDef::map("items", 1, "string", "Item")))
            .message(MessageDef::new("Item")),
    );

    let table = RegistrationTable::build(&classes, InitializationLevel::Scene).unwrap();

    assert_eq!(order(&table), vec!["Item", "Inventory"]);
}

#[test]
fn RegistrationTable___missing_class___returns_unresolved_reference() {
    let mut classes = classes(
        FileDef::new("test.proto").message(MessageDef::new("M").field(FieldDef::new("x", 1, "M"))),
    );
    classes[0].properties[0].mapped = MappedType::MessageRef("gone.Type".to_string());

    let result = RegistrationTable::build(&classes, InitializationLevel::Scene);

    match result {
        Err(SchemaError::UnresolvedTypeReference { type_name, location }) => {
            assert_eq!(type_name, "gone.Type");
            assert_eq!(location.field.as_deref(), Some("x"));
        }
        other => panic!("expected unresolved reference, got {other:?}"),
    }
}

#[test]
fn RegistrationTable___level_and_position___are_reported() {
    let classes = classes(FileDef::new("test.proto").message(MessageDef::new("M")));

    let table = RegistrationTable::build(&classes, InitializationLevel::Editor).unwrap();

    assert_eq!(table.level(), InitializationLevel::Editor);
    assert_eq!(table.position("gdbuf::test::M"), Some(0));
    assert_eq!(table.position("gdbuf::test::Nope"), None);
}
