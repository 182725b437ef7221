#![allow(non_snake_case)]

use super::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SCHEMA: &str = r#"
syntax = "proto3";
package game;

enum Rarity {
  RARITY_COMMON = 0;
  RARITY_EPIC = 3;
}

message Inventory {
  Item first = 1;
  map<string, Item> by_name = 2;

  message Item {
    string name = 1;
    Rarity rarity = 2;
  }
}
"#;

const CYCLE: &str = r#"
syntax = "proto3";
package cycle;

message A { B b = 1; }
message B { A a = 1; }
"#;

fn proto_dir(name: &str, source: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(name), source).unwrap();
    dir
}

fn args_for(dir: &TempDir) -> SchemaArgs {
    SchemaArgs {
        proto: Some(dir.path().to_path_buf()),
        ..Default::default()
    }
}

fn generation_for(dir: &TempDir) -> Generation {
    let args = args_for(dir);
    let config = args.resolve_config().unwrap();
    let schema = args.load_schema(&config).unwrap();
    Generator::new(config).generate(&schema).unwrap()
}

#[test]
fn run___valid_schema___writes_sources_docs_and_manifest() {
    let proto = proto_dir("inventory.proto", SCHEMA);
    let genout = TempDir::new().unwrap();
    let genout_path = genout.path().display().to_string();
    let args = args_for(&proto);

    run(&args, args.resolve_config().unwrap(), &genout_path).unwrap();

    let written = |relative: &str| PathBuf::from(&genout_path).join(relative);
    assert!(written("src/inventory.h").is_file());
    assert!(written("src/inventory.cpp").is_file());
    assert!(written("src/register_types.cpp").is_file());
    assert!(written("out/gdbufgen.gdextension").is_file());
    assert!(written("doc_classes/InventoryItem.xml").is_file());
    let manifest = fs::read_to_string(written("gdbuf_manifest.json")).unwrap();
    assert!(manifest.contains("\"RARITY_EPIC\": 3"));
}

#[test]
fn run___extension_name_flag___renames_descriptor() {
    let proto = proto_dir("inventory.proto", SCHEMA);
    let genout = TempDir::new().unwrap();
    let args = SchemaArgs {
        name: Some("inventory".to_string()),
        ..args_for(&proto)
    };

    run(
        &args,
        args.resolve_config().unwrap(),
        &genout.path().display().to_string(),
    )
    .unwrap();

    assert!(genout.path().join("out/inventory.gdextension").is_file());
}

#[test]
fn run___invalid_schema___writes_nothing() {
    let proto = proto_dir(
        "broken.proto",
        "syntax = \"proto3\";\nmessage Broken { Missing m = 1; }\n",
    );
    let genout = TempDir::new().unwrap();
    let args = args_for(&proto);

    let err = run(
        &args,
        args.resolve_config().unwrap(),
        &genout.path().display().to_string(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("Missing"));
    assert_eq!(fs::read_dir(genout.path()).unwrap().count(), 0);
}

#[test]
fn check___valid_schema___succeeds() {
    let proto = proto_dir("inventory.proto", SCHEMA);
    let args = args_for(&proto);

    check(&args, &args.resolve_config().unwrap()).unwrap();
}

#[test]
fn check___duplicate_field_number___names_the_field() {
    let proto = proto_dir(
        "dup.proto",
        "syntax = \"proto3\";\nmessage Dup { int32 a = 1; int32 b = 1; }\n",
    );
    let args = args_for(&proto);

    let err = check(&args, &args.resolve_config().unwrap()).unwrap_err();

    assert!(err.to_string().contains("dup.proto"));
}

#[test]
fn registration_lines___nested_messages___inner_first() {
    let proto = proto_dir("inventory.proto", SCHEMA);

    let lines = registration_lines(&generation_for(&proto));

    assert_eq!(
        lines,
        vec![
            "   1. gdbuf::gdbufgenEnums",
            "   2. gdbuf::inventory::Rarity",
            "   3. gdbuf::inventory::InventoryItem",
            "   4. gdbuf::inventory::Inventory",
        ]
    );
}

#[test]
fn registration_lines___cycle___marks_header_first() {
    let proto = proto_dir("cycle.proto", CYCLE);

    let lines = registration_lines(&generation_for(&proto));

    assert_eq!(lines[1], "   2. gdbuf::cycle::B -> gdbuf::cycle::A");
    assert_eq!(lines[2], "   3. gdbuf::cycle::A (header-first)");
}
