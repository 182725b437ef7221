//! End-to-end generation from an in-memory schema to files on disk

use gdbuf_codegen::{AccessorKind, Generator, MANIFEST_FILE};
use gdbuf_core::prelude::*;
use tempfile::TempDir;

fn game_schema() -> Schema {
    SchemaBuilder::new()
        .with_file(
            FileDef::new("game/items.proto")
                .with_package("game")
                .enum_def(EnumDef::new("Rarity").value("RARITY_COMMON", 0).value("RARITY_EPIC", 3))
                .message(
                    MessageDef::new("Item")
                        .field(FieldDef::new("name", 1, "string"))
                        .field(FieldDef::new("rarity", 2, "Rarity")),
                ),
        )
        .with_file(
            FileDef::new("game/player.proto")
                .with_package("game")
                .import("game/items.proto")
                .message(
                    MessageDef::new("Player")
                        .field(FieldDef::new("inventory", 1, "Item").repeated())
                        .field(FieldDef::map("equipped", 2, "string", "Item"))
                        .field(FieldDef::new("created", 3, "google.protobuf.Timestamp"))
                        .oneof("status")
                        .field(FieldDef::new("online", 4, "bool").in_oneof("status"))
                        .field(FieldDef::new("last_seen", 5, "int64").in_oneof("status")),
                ),
        )
        .build()
        .unwrap()
}

#[test]
fn generate___game_schema___orders_and_renders_everything() {
    let generation = Generator::default().generate(&game_schema()).unwrap();

    assert_eq!(generation.message_class_count(), 2);
    let order = generation.table.order();
    let item = order.iter().position(|n| *n == "gdbuf::items::Item").unwrap();
    let player = order.iter().position(|n| *n == "gdbuf::player::Player").unwrap();
    assert!(item < player);

    let player_class = generation.class("gdbuf::player::Player").unwrap();
    let inventory = player_class.property("inventory").unwrap();
    assert!(inventory.accessor(AccessorKind::Append).is_some());
    assert_eq!(player_class.oneofs[0].discriminator, "which_status");

    let rarity = generation
        .class("gdbuf::items::Item")
        .unwrap()
        .property("rarity")
        .unwrap();
    assert_eq!(rarity.host.cpp, "int32_t");

    for path in [
        "src/game/items.h",
        "src/game/items.cpp",
        "src/game/player.h",
        "src/game/player.cpp",
        "src/register_types.cpp",
        "doc_classes/Player.xml",
        MANIFEST_FILE,
    ] {
        assert!(generation.output.contains(path), "missing {path}");
    }
}

#[test]
fn generate___write_to___persists_output_tree() {
    let dir = TempDir::new().unwrap();
    let generation = Generator::default().generate(&game_schema()).unwrap();

    let written = generation.output.write_to(dir.path()).unwrap();

    assert_eq!(written, generation.output.len());
    let manifest = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(value["classes"]["gdbuf::items::Rarity"]["constants"]["RARITY_EPIC"], 3);
}

#[test]
fn generate___method_collision___fails_before_rendering() {
    let schema = SchemaBuilder::new()
        .with_file(
            FileDef::new("clash.proto").message(
                MessageDef::new("Clash")
                    .field(FieldDef::new("foo", 1, "int32").repeated())
                    .field(FieldDef::new("foo_at", 2, "int32")),
            ),
        )
        .build()
        .unwrap();

    let err = Generator::default().generate(&schema).unwrap_err();

    assert!(matches!(err, SchemaError::DuplicateName { .. }));
    assert_eq!(err.error_code(), 3);
}

#[test]
fn generate___same_message_name_in_two_files___fails_with_file_named() {
    let schema = SchemaBuilder::new()
        .with_file(FileDef::new("a.proto").with_package("a").message(MessageDef::new("Foo")))
        .with_file(FileDef::new("b.proto").with_package("b").message(MessageDef::new("Foo")))
        .build()
        .unwrap();

    let err = Generator::default().generate(&schema).unwrap_err();

    assert!(matches!(&err, SchemaError::DuplicateName { name, .. } if name == "Foo"));
    assert_eq!(err.file(), "b.proto");
}
