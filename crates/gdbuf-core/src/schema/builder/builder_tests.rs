#![allow(non_snake_case)]

use super::*;
use crate::schema::def::{EnumDef, FieldDef, FileDef, MessageDef};
use test_case::test_case;

fn build_one(file: FileDef) -> SchemaResult<Schema> {
    SchemaBuilder::new().with_file(file).build()
}

fn build_message(message: MessageDef) -> SchemaResult<Schema> {
    build_one(FileDef::new("test.proto").message(message))
}

// ============================================================================
// Declaration and naming
// ============================================================================

#[test]
fn SchemaBuilder___nested_types___get_qualified_names() {
    let schema = build_one(
        FileDef::new("outer.proto").with_package("game.net").message(
            MessageDef::new("Outer")
                .nested(MessageDef::new("Inner").field(FieldDef::new("x", 1, "int32")))
                .nested_enum(EnumDef::new("Kind").value("KIND_UNSPECIFIED", 0)),
        ),
    )
    .unwrap();

    let inner = schema.message_by_name("game.net.Outer.Inner").unwrap();
    let inner = schema.message(inner);
    assert_eq!(inner.local_path, "Outer.Inner");
    assert!(inner.parent.is_some());
    assert!(schema.enum_by_name(".game.net.Outer.Kind").is_some());
}

#[test]
fn SchemaBuilder___messages___parents_precede_children() {
    let schema = build_message(
        MessageDef::new("A").nested(MessageDef::new("B").nested(MessageDef::new("C"))),
    )
    .unwrap();

    let names: Vec<_> = schema.messages().map(|(_, m)| m.full_name.as_str()).collect();
    assert_eq!(names, vec!["A", "A.B", "A.B.C"]);
}

#[test]
fn SchemaBuilder___duplicate_message_name___returns_duplicate_name() {
    let result = build_one(
        FileDef::new("dup.proto")
            .message(MessageDef::new("Thing"))
            .message(MessageDef::new("Thing")),
    );

    assert!(matches!(
        result,
        Err(SchemaError::DuplicateName { ref name, .. }) if name == "Thing"
    ));
}

#[test]
fn SchemaBuilder___same_name_in_different_scopes___is_allowed() {
    let result = build_one(
        FileDef::new("scopes.proto")
            .message(MessageDef::new("A").nested(MessageDef::new("Item")))
            .message(MessageDef::new("B").nested(MessageDef::new("Item"))),
    );

    assert!(result.is_ok());
}

#[test]
fn SchemaBuilder___duplicate_across_files_in_same_package___returns_duplicate_name() {
    let result = SchemaBuilder::new()
        .with_file(FileDef::new("a.proto").with_package("p").message(MessageDef::new("M")))
        .with_file(FileDef::new("b.proto").with_package("p").message(MessageDef::new("M")))
        .build();

    let err = result.unwrap_err();
    assert_eq!(err.file(), "b.proto");
}

#[test]
fn SchemaBuilder___duplicate_enum_value_name___returns_duplicate_name() {
    let result = build_one(
        FileDef::new("e.proto").enum_def(EnumDef::new("Color").value("RED", 0).value("RED", 1)),
    );

    assert!(matches!(result, Err(SchemaError::DuplicateName { .. })));
}

#[test]
fn SchemaBuilder___enum_value_beyond_int32___returns_invalid_enum_value() {
    let result = build_one(
        FileDef::new("e.proto").enum_def(EnumDef::new("Big").value("HUGE", 1 << 40)),
    );

    assert!(matches!(
        result,
        Err(SchemaError::InvalidEnumValue { number, .. }) if number == 1 << 40
    ));
}

#[test]
fn SchemaBuilder___negative_enum_value___is_allowed() {
    let schema = build_one(
        FileDef::new("e.proto").enum_def(EnumDef::new("Sign").value("ZERO", 0).value("NEG", -1)),
    )
    .unwrap();

    let id = schema.enum_by_name("Sign").unwrap();
    assert_eq!(schema.enum_type(id).values[1].number, -1);
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn SchemaBuilder___forward_reference___resolves() {
    let schema = build_one(
        FileDef::new("fwd.proto")
            .message(MessageDef::new("First").field(FieldDef::new("second", 1, "Second")))
            .message(MessageDef::new("Second")),
    )
    .unwrap();

    let first = schema.message(schema.message_by_name("First").unwrap());
    let second = schema.message_by_name("Second").unwrap();
    assert_eq!(first.fields[0].ty, FieldType::Message(second));
}

#[test]
fn SchemaBuilder___self_reference___resolves_to_own_id() {
    let schema = build_message(
        MessageDef::new("RecursiveMessage")
            .field(FieldDef::new("child", 1, "RecursiveMessage"))
            .field(FieldDef::new("depth", 2, "int32")),
    )
    .unwrap();

    let id = schema.message_by_name("RecursiveMessage").unwrap();
    assert_eq!(schema.message(id).fields[0].ty, FieldType::Message(id));
}

#[test]
fn SchemaBuilder___inner_scope___shadows_outer_name() {
    let schema = build_one(
        FileDef::new("shadow.proto")
            .message(MessageDef::new("Item"))
            .message(
                MessageDef::new("Holder")
                    .nested(MessageDef::new("Item"))
                    .field(FieldDef::new("item", 1, "Item"))
                    .field(FieldDef::new("outer_item", 2, ".Item")),
            ),
    )
    .unwrap();

    let holder = schema.message(schema.message_by_name("Holder").unwrap());
    let inner = schema.message_by_name("Holder.Item").unwrap();
    let outer = schema.message_by_name("Item").unwrap();
    assert_eq!(holder.fields[0].ty, FieldType::Message(inner));
    assert_eq!(holder.fields[1].ty, FieldType::Message(outer));
}

#[test]
fn SchemaBuilder___sibling_nested_reference___resolves_through_parent_scope() {
    let schema = build_one(
        FileDef::new("sib.proto").with_package("pkg").message(
            MessageDef::new("Outer")
                .nested(MessageDef::new("Left").field(FieldDef::new("right", 1, "Right")))
                .nested(MessageDef::new("Right")),
        ),
    )
    .unwrap();

    let left = schema.message(schema.message_by_name("pkg.Outer.Left").unwrap());
    let right = schema.message_by_name("pkg.Outer.Right").unwrap();
    assert_eq!(left.fields[0].ty, FieldType::Message(right));
}

#[test]
fn SchemaBuilder___well_known_type___resolves_without_definition() {
    let schema = build_message(
        MessageDef::new("Event")
            .field(FieldDef::new("at", 1, "google.protobuf.Timestamp"))
            .field(FieldDef::new("payload", 2, ".google.protobuf.Any")),
    )
    .unwrap();

    let event = schema.message(schema.message_by_name("Event").unwrap());
    assert_eq!(
        event.fields[0].ty,
        FieldType::WellKnown(WellKnownType::Timestamp)
    );
    assert_eq!(event.fields[1].ty, FieldType::WellKnown(WellKnownType::Any));
}

#[test]
fn SchemaBuilder___unknown_type___returns_unresolved_reference() {
    let result = build_message(MessageDef::new("Holder").field(FieldDef::new("thing", 1, "Missing")));

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "test.proto: Holder.thing: unresolved type reference `Missing`"
    );
}

#[test]
fn SchemaBuilder___cross_file_reference___resolves_by_package() {
    let schema = SchemaBuilder::new()
        .with_file(
            FileDef::new("dependency.proto")
                .with_package("dep")
                .message(MessageDef::new("Dependency").field(FieldDef::new("name", 1, "string"))),
        )
        .with_file(
            FileDef::new("user.proto")
                .import("dependency.proto")
                .message(MessageDef::new("User").field(FieldDef::new("dep", 1, "dep.Dependency"))),
        )
        .build()
        .unwrap();

    let user = schema.message(schema.message_by_name("User").unwrap());
    let dep = schema.message_by_name("dep.Dependency").unwrap();
    assert_eq!(user.fields[0].ty, FieldType::Message(dep));
    assert_eq!(schema.message(dep).file, FileId(0));
}

// ============================================================================
// Field validation
// ============================================================================

#[test_case(0 ; "zero")]
#[test_case(-4 ; "negative")]
#[test_case(536_870_912 ; "above maximum")]
fn SchemaBuilder___out_of_range_field_number___returns_invalid_field_number(number: i64) {
    let result = build_message(MessageDef::new("M").field(FieldDef::new("f", number, "int32")));

    assert!(matches!(
        result,
        Err(SchemaError::InvalidFieldNumber { number: n, .. }) if n == number
    ));
}

#[test]
fn SchemaBuilder___max_field_number___is_accepted() {
    let result = build_message(
        MessageDef::new("M").field(FieldDef::new("f", MAX_FIELD_NUMBER, "int32")),
    );

    assert!(result.is_ok());
}

#[test]
fn SchemaBuilder___implementation_reserved_number___returns_reserved_field_use() {
    let result = build_message(MessageDef::new("M").field(FieldDef::new("f", 19_500, "int32")));

    assert!(matches!(result, Err(SchemaError::ReservedFieldUse { .. })));
}

#[test]
fn SchemaBuilder___duplicate_field_number___names_existing_field() {
    let result = build_message(
        MessageDef::new("M")
            .field(FieldDef::new("a", 1, "int32"))
            .field(FieldDef::new("b", 1, "string")),
    );

    match result {
        Err(SchemaError::DuplicateFieldNumber {
            location,
            number,
            existing,
        }) => {
            assert_eq!(location.field.as_deref(), Some("b"));
            assert_eq!(number, 1);
            assert_eq!(existing, "a");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn SchemaBuilder___duplicate_field_name___returns_duplicate_name() {
    let result = build_message(
        MessageDef::new("M")
            .field(FieldDef::new("a", 1, "int32"))
            .field(FieldDef::new("a", 2, "int32")),
    );

    assert!(matches!(result, Err(SchemaError::DuplicateName { .. })));
}

#[test]
fn SchemaBuilder___reserved_number___returns_reserved_field_use() {
    let result = build_message(
        MessageDef::new("ReservedMessage")
            .reserve_range(2, 4)
            .field(FieldDef::new("third", 3, "int32")),
    );

    assert!(matches!(result, Err(SchemaError::ReservedFieldUse { .. })));
}

#[test]
fn SchemaBuilder___reserved_name___returns_reserved_field_use() {
    let result = build_message(
        MessageDef::new("ReservedMessage")
            .reserve_name("legacy")
            .field(FieldDef::new("legacy", 7, "int32")),
    );

    let err = result.unwrap_err();
    assert!(err.to_string().contains("`legacy` is reserved"));
}

#[test]
fn SchemaBuilder___fields_outside_reserved___are_accepted() {
    let schema = build_message(
        MessageDef::new("ReservedMessage")
            .reserve_range(2, 4)
            .reserve_range(9, MAX_FIELD_NUMBER)
            .reserve_name("foo")
            .field(FieldDef::new("one", 1, "int32"))
            .field(FieldDef::new("five", 5, "string")),
    )
    .unwrap();

    let message = schema.message(schema.message_by_name("ReservedMessage").unwrap());
    assert_eq!(message.reserved_ranges, vec![(2, 4), (9, 536_870_911)]);
    assert_eq!(message.reserved_names, vec!["foo".to_string()]);
}

// ============================================================================
// Maps
// ============================================================================

#[test_case("string")]
#[test_case("int64")]
#[test_case("sfixed32")]
#[test_case("bool")]
#[test_case("Color")]
fn SchemaBuilder___valid_map_key___is_accepted(key: &str) {
    let result = build_one(
        FileDef::new("maps.proto")
            .enum_def(EnumDef::new("Color").value("RED", 0))
            .message(MessageDef::new("MapMessage").field(FieldDef::map("m", 1, key, "string"))),
    );

    assert!(result.is_ok());
}

#[test_case("double")]
#[test_case("float")]
#[test_case("bytes")]
#[test_case("Value")]
#[test_case("google.protobuf.Timestamp")]
fn SchemaBuilder___invalid_map_key___returns_invalid_map_key_type(key: &str) {
    let result = build_one(
        FileDef::new("maps.proto")
            .message(MessageDef::new("Value"))
            .message(MessageDef::new("MapMessage").field(FieldDef::map("m", 1, key, "string"))),
    );

    assert!(matches!(
        result,
        Err(SchemaError::InvalidMapKeyType { ref key_type, .. }) if key_type == key
    ));
}

#[test]
fn SchemaBuilder___repeated_map___returns_invalid_nesting() {
    let result = build_message(
        MessageDef::new("M").field(FieldDef::map("m", 1, "string", "int32").repeated()),
    );

    assert!(matches!(result, Err(SchemaError::InvalidNesting { .. })));
}

#[test]
fn SchemaBuilder___map_of_messages___resolves_value() {
    let schema = build_one(
        FileDef::new("maps.proto")
            .message(MessageDef::new("Value"))
            .message(MessageDef::new("MapMessage").field(FieldDef::map("m", 1, "int32", "Value"))),
    )
    .unwrap();

    let holder = schema.message(schema.message_by_name("MapMessage").unwrap());
    let value = schema.message_by_name("Value").unwrap();
    assert_eq!(
        holder.fields[0].ty,
        FieldType::Map(Box::new(MapType {
            key: FieldType::Scalar(ScalarKind::Int32),
            value: FieldType::Message(value),
        }))
    );
    assert!(!holder.fields[0].has_presence());
}

// ============================================================================
// Oneofs
// ============================================================================

#[test]
fn SchemaBuilder___oneof_members___are_grouped_with_presence() {
    let schema = build_message(
        MessageDef::new("OneOfMessage")
            .oneof("choice")
            .field(FieldDef::new("name", 1, "string").in_oneof("choice"))
            .field(FieldDef::new("id", 2, "int32").in_oneof("choice"))
            .field(FieldDef::new("other", 3, "int32")),
    )
    .unwrap();

    let message = schema.message(schema.message_by_name("OneOfMessage").unwrap());
    assert_eq!(message.oneofs[0].fields, vec![0, 1]);
    assert_eq!(message.oneof_fields(0).count(), 2);
    assert!(message.fields[0].has_presence());
    assert!(!message.fields[2].has_presence());
}

#[test]
fn SchemaBuilder___repeated_oneof_member___returns_invalid_oneof_member() {
    let result = build_message(
        MessageDef::new("M")
            .oneof("choice")
            .field(FieldDef::new("ids", 1, "int32").repeated().in_oneof("choice")),
    );

    assert!(matches!(
        result,
        Err(SchemaError::InvalidOneofMember { ref oneof, .. }) if oneof == "choice"
    ));
}

#[test]
fn SchemaBuilder___map_oneof_member___returns_invalid_oneof_member() {
    let result = build_message(
        MessageDef::new("M")
            .oneof("choice")
            .field(FieldDef::map("m", 1, "string", "string").in_oneof("choice")),
    );

    assert!(matches!(result, Err(SchemaError::InvalidOneofMember { .. })));
}

#[test]
fn SchemaBuilder___undeclared_oneof___returns_invalid_oneof_member() {
    let result =
        build_message(MessageDef::new("M").field(FieldDef::new("x", 1, "int32").in_oneof("ghost")));

    assert!(matches!(result, Err(SchemaError::InvalidOneofMember { .. })));
}

#[test]
fn SchemaBuilder___empty_oneof___returns_invalid_oneof_member() {
    let result = build_message(
        MessageDef::new("M")
            .oneof("nothing")
            .field(FieldDef::new("x", 1, "int32")),
    );

    assert!(matches!(result, Err(SchemaError::InvalidOneofMember { .. })));
}

// ============================================================================
// Presence
// ============================================================================

#[test]
fn SchemaBuilder___proto3_presence___follows_label_and_type() {
    let schema = build_one(
        FileDef::new("p.proto")
            .message(MessageDef::new("Child"))
            .message(
                MessageDef::new("P")
                    .field(FieldDef::new("plain", 1, "int32"))
                    .field(FieldDef::new("opt", 2, "int32").optional())
                    .field(FieldDef::new("child", 3, "Child"))
                    .field(FieldDef::new("at", 4, "google.protobuf.Timestamp"))
                    .field(FieldDef::new("list", 5, "Child").repeated()),
            ),
    )
    .unwrap();

    let p = schema.message(schema.message_by_name("P").unwrap());
    let presence: Vec<_> = p.fields.iter().map(|f| f.has_presence()).collect();
    assert_eq!(presence, vec![false, true, true, true, false]);
}

#[test]
fn SchemaBuilder___proto2_singular_scalar___has_presence() {
    let schema = build_one(
        FileDef::new("p2.proto")
            .with_syntax(Syntax::Proto2)
            .message(MessageDef::new("Legacy").field(FieldDef::new("x", 1, "int32"))),
    )
    .unwrap();

    let legacy = schema.message(schema.message_by_name("Legacy").unwrap());
    assert!(legacy.fields[0].has_presence());
}

#[test]
fn SchemaBuilder___file_stem___strips_directories_and_extension() {
    let schema = build_one(FileDef::new("nested/deeply/nested.proto")).unwrap();

    assert_eq!(schema.files()[0].stem(), "nested");
}
