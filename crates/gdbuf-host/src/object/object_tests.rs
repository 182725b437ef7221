#![allow(non_snake_case)]

use super::*;
use crate::registrar::Registrar;
use crate::registry::InMemoryRegistry;
use gdbuf_codegen::Generator;
use gdbuf_core::prelude::{FieldDef, FileDef, MessageDef};
use gdbuf_core::{InitializationLevel, SchemaBuilder};

fn registry() -> InMemoryRegistry {
    let file = FileDef::new("gdbuf_test.proto")
        .with_package("gdbuf.test")
        .message(MessageDef::new("Dependency").field(FieldDef::new("name", 1, "string")))
        .message(
            MessageDef::new("Nested")
                .field(FieldDef::new("dep", 1, "Dependency"))
                .field(FieldDef::new("vals", 2, "int32").repeated()),
        )
        .message(
            MessageDef::new("Recursive")
                .field(FieldDef::new("child", 1, "Recursive"))
                .field(FieldDef::new("depth", 2, "int32")),
        )
        .message(
            MessageDef::new("Scores")
                .field(FieldDef::map("points", 1, "string", "int32"))
                .field(FieldDef::map("deps", 2, "int32", "Dependency")),
        )
        .message(
            MessageDef::new("Choice")
                .oneof("pick")
                .field(FieldDef::new("a", 1, "int32").in_oneof("pick"))
                .field(FieldDef::new("b", 2, "string").in_oneof("pick"))
                .field(FieldDef::new("c", 3, "Dependency").in_oneof("pick")),
        )
        .message(MessageDef::new("Envelope").field(FieldDef::new("payload", 1, "google.protobuf.Any")))
        .message(
            MessageDef::new("Counter")
                .field(FieldDef::new("count", 1, "int32").optional())
                .field(FieldDef::new("plain", 2, "int32"))
                .field(FieldDef::new("ratio", 3, "double")),
        );
    let schema = SchemaBuilder::new().with_file(file).build().unwrap();
    let generation = Generator::default().generate(&schema).unwrap();
    let registry = InMemoryRegistry::new();
    Registrar::from_generation(&generation)
        .initialize(InitializationLevel::Scene, &registry)
        .unwrap();
    registry
}

#[test]
fn MessageObject___message_field___has_false_until_set() {
    let registry = registry();
    let nested = registry.instantiate("Nested").unwrap();
    let dep = registry.instantiate("Dependency").unwrap();

    assert!(!nested.lock().has("dep").unwrap());

    nested.lock().set("dep", dep.clone()).unwrap();

    let mut nested = nested.lock();
    assert!(nested.has("dep").unwrap());
    assert_eq!(nested.get("dep").unwrap(), Value::Object(dep));
}

#[test]
fn MessageObject___get_unset_message___materializes_sub_object() {
    let registry = registry();
    let nested = registry.instantiate("Nested").unwrap();

    let first = nested.lock().get("dep").unwrap();
    let second = nested.lock().get("dep").unwrap();

    let object = first.as_object().unwrap();
    assert_eq!(object.class_name(), "Dependency");
    assert_eq!(first, second);
    assert!(nested.lock().has("dep").unwrap());
}

#[test]
fn MessageObject___set_nil_message___clears() {
    let registry = registry();
    let nested = registry.instantiate("Nested").unwrap();
    nested.lock().get("dep").unwrap();

    nested.lock().set("dep", Value::Nil).unwrap();

    assert!(!nested.lock().has("dep").unwrap());
}

#[test]
fn MessageObject___set_wrong_class___type_mismatch() {
    let registry = registry();
    let nested = registry.instantiate("Nested").unwrap();
    let wrong = registry.instantiate("Counter").unwrap();

    let err = nested.lock().set("dep", wrong).unwrap_err();

    assert_eq!(
        err,
        ObjectError::TypeMismatch {
            property: "dep".into(),
            expected: "Dependency".into(),
            actual: "Counter".into(),
        }
    );
}

#[test]
fn MessageObject___recursive_field___nests_on_demand() {
    let registry = registry();
    let root = registry.instantiate("Recursive").unwrap();

    let child = root.lock().get("child").unwrap();
    let child = child.as_object().unwrap().clone();
    child.lock().set("depth", 1).unwrap();

    assert!(!child.lock().has("child").unwrap());
    assert_eq!(child.lock().get("depth").unwrap(), Value::Int(1));
    assert_eq!(root.lock().get("depth").unwrap(), Value::Int(0));
}

#[test]
fn MessageObject___self_reference___can_point_at_itself() {
    let registry = registry();
    let root = registry.instantiate("Recursive").unwrap();

    root.call("set_child", &[Value::Object(root.clone())]).unwrap();

    let child = root.call("get_child", &[]).unwrap();
    assert!(child.as_object().unwrap().ptr_eq(&root));
}

#[test]
fn MessageObject___repeated___appends_and_indexes_in_order() {
    let registry = registry();
    let nested = registry.instantiate("Nested").unwrap();
    let mut nested = nested.lock();

    for value in [4, 8, 15] {
        nested.append("vals", value).unwrap();
    }
    nested.set_at("vals", 1, 9).unwrap();
    nested.remove_at("vals", 0).unwrap();

    assert_eq!(nested.size("vals").unwrap(), 2);
    assert_eq!(nested.get_at("vals", 0).unwrap(), Value::Int(9));
    assert_eq!(nested.get_at("vals", 1).unwrap(), Value::Int(15));
    assert_eq!(
        nested.get("vals").unwrap(),
        Value::Array(vec![Value::Int(9), Value::Int(15)])
    );
}

#[test]
fn MessageObject___repeated_out_of_range___reports_size() {
    let registry = registry();
    let nested = registry.instantiate("Nested").unwrap();
    let mut nested = nested.lock();
    nested.append("vals", 1).unwrap();

    let err = nested.get_at("vals", 3).unwrap_err();
    let negative = nested.remove_at("vals", -1).unwrap_err();

    assert_eq!(
        err,
        ObjectError::IndexOutOfRange {
            property: "vals".into(),
            index: 3,
            size: 1,
        }
    );
    assert_eq!(negative.error_code(), 5);
}

#[test]
fn MessageObject___repeated_wrong_element___type_mismatch() {
    let registry = registry();
    let nested = registry.instantiate("Nested").unwrap();

    let err = nested.lock().append("vals", "nine").unwrap_err();

    assert!(matches!(err, ObjectError::TypeMismatch { .. }));
    assert_eq!(nested.lock().size("vals").unwrap(), 0);
}

#[test]
fn MessageObject___append_on_singular___unsupported() {
    let registry = registry();
    let counter = registry.instantiate("Counter").unwrap();

    let err = counter.lock().append("plain", 1).unwrap_err();

    assert_eq!(
        err,
        ObjectError::UnsupportedOperation {
            property: "plain".into(),
            operation: "append".into(),
        }
    );
}

#[test]
fn MessageObject___map___put_get_erase_contains() {
    let registry = registry();
    let scores = registry.instantiate("Scores").unwrap();
    let mut scores = scores.lock();

    scores.map_put("points", "ada", 10).unwrap();
    scores.map_put("points", "bob", 7).unwrap();
    scores.map_put("points", "ada", 12).unwrap();

    assert_eq!(scores.map_get("points", "ada").unwrap(), Value::Int(12));
    assert_eq!(scores.size("points").unwrap(), 2);
    assert!(scores.map_erase("points", "bob").unwrap());
    assert!(!scores.map_erase("points", "bob").unwrap());
    assert!(!scores.map_contains("points", "bob").unwrap());
    assert_eq!(scores.map_get("points", "bob").unwrap(), Value::Nil);
}

#[test]
fn MessageObject___map_key_of_wrong_type___invalid_key() {
    let registry = registry();
    let scores = registry.instantiate("Scores").unwrap();

    let err = scores.lock().map_put("points", 3, 1).unwrap_err();
    let float = scores.lock().map_contains("deps", 1.5).unwrap_err();

    assert!(matches!(err, ObjectError::InvalidKey { .. }));
    assert_eq!(float.error_code(), 7);
}

#[test]
fn MessageObject___map_of_messages___checks_value_class() {
    let registry = registry();
    let scores = registry.instantiate("Scores").unwrap();
    let dep = registry.instantiate("Dependency").unwrap();
    let wrong = registry.instantiate("Nested").unwrap();

    scores.lock().map_put("deps", 1, dep.clone()).unwrap();
    let err = scores.lock().map_put("deps", 2, wrong).unwrap_err();

    assert_eq!(scores.lock().map_get("deps", 1).unwrap(), Value::Object(dep));
    assert!(matches!(err, ObjectError::TypeMismatch { .. }));
}

#[test]
fn MessageObject___oneof___setting_member_clears_others() {
    let registry = registry();
    let choice = registry.instantiate("Choice").unwrap();
    let mut choice = choice.lock();

    choice.set("a", 5).unwrap();
    choice.set("b", "five").unwrap();

    assert!(!choice.has("a").unwrap());
    assert!(choice.has("b").unwrap());
    assert_eq!(choice.which("pick").unwrap(), "b");
    assert_eq!(choice.get("a").unwrap(), Value::Int(0));
}

#[test]
fn MessageObject___oneof_message_get___leaves_case_alone() {
    let registry = registry();
    let choice = registry.instantiate("Choice").unwrap();
    let mut choice = choice.lock();
    choice.set("a", 1).unwrap();

    let read = choice.get("c").unwrap();

    assert!(matches!(read, Value::Object(_)));
    assert_eq!(choice.which("pick").unwrap(), "a");
    assert!(choice.has("a").unwrap());
    assert!(!choice.has("c").unwrap());
    assert_eq!(choice.get("a").unwrap(), Value::Int(1));
}

#[test]
fn MessageObject___oneof_message_set___selects_member() {
    let registry = registry();
    let choice = registry.instantiate("Choice").unwrap();
    let mut choice = choice.lock();
    choice.set("a", 1).unwrap();
    let dependency = registry.instantiate("Dependency").unwrap();

    choice.set("c", Value::Object(dependency)).unwrap();

    assert_eq!(choice.which("pick").unwrap(), "c");
    assert!(!choice.has("a").unwrap());
}

#[test]
fn MessageObject___oneof_clear_of_unset_member___keeps_case() {
    let registry = registry();
    let choice = registry.instantiate("Choice").unwrap();
    let mut choice = choice.lock();
    choice.set("b", "x").unwrap();

    choice.clear("a").unwrap();
    assert_eq!(choice.which("pick").unwrap(), "b");

    choice.clear("b").unwrap();
    assert_eq!(choice.which("pick").unwrap(), "");
}

#[test]
fn MessageObject___any___packs_and_unpacks_by_type_name() {
    let registry = registry();
    let envelope = registry.instantiate("Envelope").unwrap();
    let dep = registry.instantiate("Dependency").unwrap();
    dep.lock().set("name", "core").unwrap();
    let mut envelope = envelope.lock();

    assert!(!envelope.has("payload").unwrap());
    envelope.pack("payload", &dep).unwrap();

    assert!(envelope.has("payload").unwrap());
    assert_eq!(
        envelope.type_url("payload").unwrap(),
        "type.googleapis.com/gdbuf.test.Dependency"
    );
    let unpacked = envelope.unpack("payload", "gdbuf.test.Dependency").unwrap();
    assert_eq!(unpacked, Value::Object(dep));
    assert_eq!(envelope.unpack("payload", "gdbuf.test.Nested").unwrap(), Value::Nil);
}

#[test]
fn MessageObject___any_set___unsupported() {
    let registry = registry();
    let envelope = registry.instantiate("Envelope").unwrap();

    let err = envelope.lock().set("payload", 1).unwrap_err();

    assert_eq!(err.error_code(), 6);
}

#[test]
fn MessageObject___optional_scalar___tracks_presence() {
    let registry = registry();
    let counter = registry.instantiate("Counter").unwrap();
    let mut counter = counter.lock();

    assert!(!counter.has("count").unwrap());
    counter.set("count", 0).unwrap();
    assert!(counter.has("count").unwrap());
    counter.clear("count").unwrap();

    assert!(!counter.has("count").unwrap());
    assert_eq!(counter.get("count").unwrap(), Value::Int(0));
}

#[test]
fn MessageObject___float_property___accepts_integers() {
    let registry = registry();
    let counter = registry.instantiate("Counter").unwrap();
    let mut counter = counter.lock();

    counter.set("ratio", 2).unwrap();

    assert_eq!(counter.get("ratio").unwrap().as_float(), Some(2.0));
}

#[test]
fn MessageObject___call___dispatches_emitted_methods() {
    let registry = registry();
    let choice = registry.instantiate("Choice").unwrap();

    choice.call("set_b", &[Value::from("hi")]).unwrap();

    assert_eq!(choice.call("get_b", &[]).unwrap(), Value::from("hi"));
    assert_eq!(choice.call("has_b", &[]).unwrap(), Value::Bool(true));
    assert_eq!(choice.call("which_pick", &[]).unwrap(), Value::from("b"));
    assert_eq!(
        choice.call("get_descriptor_name", &[]).unwrap(),
        Value::from("gdbuf.test.Choice")
    );
}

#[test]
fn MessageObject___call_container_methods___use_arguments() {
    let registry = registry();
    let nested = registry.instantiate("Nested").unwrap();
    let scores = registry.instantiate("Scores").unwrap();

    nested.call("add_vals", &[Value::Int(3)]).unwrap();
    scores.call("points_put", &[Value::from("k"), Value::Int(2)]).unwrap();

    assert_eq!(nested.call("vals_size", &[]).unwrap(), Value::Int(1));
    assert_eq!(nested.call("get_vals_at", &[Value::Int(0)]).unwrap(), Value::Int(3));
    assert_eq!(scores.call("points_get", &[Value::from("k")]).unwrap(), Value::Int(2));
    assert_eq!(
        scores.call("points_contains", &[Value::from("x")]).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn MessageObject___call_errors___name_the_method() {
    let registry = registry();
    let nested = registry.instantiate("Nested").unwrap();

    let unknown = nested.call("explode", &[]).unwrap_err();
    let arity = nested.call("add_vals", &[]).unwrap_err();
    let index = nested.call("get_vals_at", &[Value::from("0")]).unwrap_err();
    let wire = nested.call("serialize", &[]).unwrap_err();

    assert_eq!(
        unknown,
        ObjectError::UnknownMethod {
            class: "Nested".into(),
            method: "explode".into(),
        }
    );
    assert_eq!(
        arity,
        ObjectError::ArgumentCount {
            method: "add_vals".into(),
            expected: 1,
            actual: 0,
        }
    );
    assert!(matches!(index, ObjectError::TypeMismatch { .. }));
    assert_eq!(
        wire,
        ObjectError::ExternalRuntime {
            method: "serialize".into(),
        }
    );
}

#[test]
fn MessageObject___unknown_property___reports_class() {
    let registry = registry();
    let nested = registry.instantiate("Nested").unwrap();

    let err = nested.lock().get("missing").unwrap_err();

    assert_eq!(err.to_string(), "Nested has no property missing");
}
