#![allow(non_snake_case)]

use super::*;
use crate::descriptor::describe;
use gdbuf_codegen::Generator;
use gdbuf_core::prelude::{FieldDef, FileDef, MessageDef};
use gdbuf_core::SchemaBuilder;

/// `Holder` references `Item`; both in one file
fn descriptors() -> (Arc<ClassDescriptor>, Arc<ClassDescriptor>) {
    let schema = SchemaBuilder::new()
        .with_file(
            FileDef::new("items.proto")
                .message(MessageDef::new("Item").field(FieldDef::new("name", 1, "string")))
                .message(MessageDef::new("Holder").field(FieldDef::new("item", 1, "Item"))),
        )
        .build()
        .unwrap();
    let generation = Generator::default().generate(&schema).unwrap();
    let mut described = describe(&generation.classes).into_iter().map(Arc::new);
    described.next();
    let item = described.next().unwrap();
    let holder = described.next().unwrap();
    (item, holder)
}

#[test]
fn InMemoryRegistry___register_class___records_order() {
    let registry = InMemoryRegistry::new();
    let (item, holder) = descriptors();

    registry.register_class(item).unwrap();
    registry.register_class(holder).unwrap();

    assert_eq!(registry.registered(), vec!["Item", "Holder"]);
    assert!(registry.is_registered("Holder"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn InMemoryRegistry___duplicate_class___rejected() {
    let registry = InMemoryRegistry::new();
    let (item, _) = descriptors();
    registry.register_class(Arc::clone(&item)).unwrap();

    let err = registry.register_class(item).unwrap_err();

    assert_eq!(err, HostError::DuplicateClass("Item".into()));
    assert_eq!(registry.len(), 1);
}

#[test]
fn InMemoryRegistry___unknown_reference___rejected() {
    let registry = InMemoryRegistry::new();
    let (_, holder) = descriptors();

    let err = registry.register_class(holder).unwrap_err();

    assert_eq!(
        err,
        HostError::UnresolvedReference {
            class: "Holder".into(),
            target: "Item".into(),
        }
    );
    assert!(registry.is_empty());
}

#[test]
fn InMemoryRegistry___declared_reference___accepted() {
    let registry = InMemoryRegistry::new();
    let (item, holder) = descriptors();

    registry.declare_class("Item").unwrap();
    registry.register_class(holder).unwrap();
    registry.register_class(item).unwrap();

    assert!(!registry.is_declared("Item"));
    assert_eq!(registry.registered(), vec!["Holder", "Item"]);
}

#[test]
fn InMemoryRegistry___declare_registered_class___rejected() {
    let registry = InMemoryRegistry::new();
    let (item, _) = descriptors();
    registry.register_class(item).unwrap();

    let err = registry.declare_class("Item").unwrap_err();

    assert_eq!(err.error_code(), 1);
}

#[test]
fn InMemoryRegistry___unregister_class___removes_from_order() {
    let registry = InMemoryRegistry::new();
    let (item, _) = descriptors();
    registry.register_class(item).unwrap();

    registry.unregister_class("Item").unwrap();

    assert!(registry.registered().is_empty());
    assert_eq!(
        registry.unregister_class("Item").unwrap_err(),
        HostError::UnknownClass("Item".into())
    );
}

#[test]
fn InMemoryRegistry___instantiate___requires_registered_message() {
    let registry = InMemoryRegistry::new();
    let (item, _) = descriptors();

    assert!(matches!(
        registry.instantiate("Item"),
        Err(ObjectError::NotInstantiable(_))
    ));

    registry.register_class(item).unwrap();
    let object = registry.instantiate("Item").unwrap();

    assert_eq!(object.class_name(), "Item");
}

#[test]
fn InMemoryRegistry___clones___share_state() {
    let registry = InMemoryRegistry::new();
    let other = registry.clone();
    let (item, _) = descriptors();

    other.register_class(item).unwrap();

    assert!(registry.is_registered("Item"));
    assert!(!registry.manages_class_lifetime());
    assert!(InMemoryRegistry::managing_lifetime().manages_class_lifetime());
}
