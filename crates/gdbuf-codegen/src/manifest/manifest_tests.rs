#![allow(non_snake_case)]

use super::*;
use crate::Generator;
use gdbuf_core::prelude::{EnumDef, FieldDef, FileDef, MessageDef};
use gdbuf_core::SchemaBuilder;

fn manifest(file: FileDef) -> Value {
    let schema = SchemaBuilder::new().with_file(file).build().unwrap();
    let config = GeneratorConfig::default();
    let generation = Generator::new(config.clone()).generate(&schema).unwrap();
    generate_manifest(&config, &generation.classes, &generation.table)
}

#[test]
fn generate_manifest___records_registration_order() {
    let value = manifest(FileDef::new("game.proto").with_package("game").message(
        MessageDef::new("Outer")
            .field(FieldDef::new("inner", 1, "Inner"))
            .nested(MessageDef::new("Inner")),
    ));

    assert_eq!(value["extension"], "gdbufgen");
    assert_eq!(value["initialization_level"], "scene");
    assert_eq!(
        value["registration_order"],
        json!(["gdbuf::gdbufgenEnums", "gdbuf::game::OuterInner", "gdbuf::game::Outer"])
    );
    assert_eq!(value["header_first"], json!([]));
}

#[test]
fn generate_manifest___describes_message_shape() {
    let value = manifest(FileDef::new("game.proto").with_package("game").message(
        MessageDef::new("Player")
            .field(FieldDef::new("name", 1, "string"))
            .field(FieldDef::map("stats", 2, "string", "int32"))
            .field(FieldDef::new("friend", 3, "Player")),
    ));

    let player = &value["classes"]["gdbuf::game::Player"];
    assert_eq!(player["kind"], "message");
    assert_eq!(player["base"], "RefCounted");
    assert_eq!(player["schema_name"], "game.Player");
    assert_eq!(player["source_file"], "game.proto");

    let properties = player["properties"].as_array().unwrap();
    assert_eq!(properties.len(), 3);
    assert_eq!(properties[0]["name"], "name");
    assert_eq!(properties[0]["variant"], "String");
    assert_eq!(properties[1]["type"], "map<string, int32>");
    assert_eq!(properties[1]["variant"], "Dictionary");
    assert!(
        properties[1]["methods"]
            .as_array()
            .unwrap()
            .contains(&json!("stats_put"))
    );
    assert_eq!(properties[2]["class_name"], "Player");
    assert_eq!(properties[2]["presence"], true);
    assert!(player.get("oneofs").is_none());
}

#[test]
fn generate_manifest___lists_enum_constants_and_oneofs() {
    let value = manifest(
        FileDef::new("shapes.proto")
            .enum_def(EnumDef::new("Kind").value("KIND_NONE", 0).value("KIND_BOX", 1))
            .message(
                MessageDef::new("Shape")
                    .oneof("form")
                    .field(FieldDef::new("radius", 1, "float").in_oneof("form"))
                    .field(FieldDef::new("side", 2, "float").in_oneof("form")),
            ),
    );

    let kind = &value["classes"]["gdbuf::shapes::Kind"];
    assert_eq!(kind["kind"], "enum");
    assert_eq!(kind["constants"]["KIND_BOX"], 1);

    let table = &value["classes"]["gdbuf::gdbufgenEnums"];
    assert_eq!(table["kind"], "enum_table");
    assert!(table.get("schema_name").is_none());

    let form = &value["classes"]["gdbuf::shapes::Shape"]["oneofs"][0];
    assert_eq!(form["name"], "form");
    assert_eq!(form["members"], json!(["radius", "side"]));
    assert_eq!(form["discriminator"], "which_form");
}

#[test]
fn render_manifest___is_pretty_with_trailing_newline() {
    let schema = SchemaBuilder::new()
        .with_file(FileDef::new("empty.proto"))
        .build()
        .unwrap();
    let config = GeneratorConfig::default();
    let generation = Generator::new(config.clone()).generate(&schema).unwrap();

    let text = render_manifest(&config, &generation.classes, &generation.table);

    assert!(text.starts_with("{\n  \""));
    assert!(text.ends_with("}\n"));
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["classes"]["gdbuf::gdbufgenEnums"]["kind"], "enum_table");
}
