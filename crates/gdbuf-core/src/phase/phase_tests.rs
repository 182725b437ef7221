#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test]
fn InitializationLevel___default___is_scene() {
    assert_eq!(InitializationLevel::default(), InitializationLevel::Scene);
}

#[test]
fn InitializationLevel___ordering___follows_startup_order() {
    assert!(InitializationLevel::Core < InitializationLevel::Servers);
    assert!(InitializationLevel::Servers < InitializationLevel::Scene);
    assert!(InitializationLevel::Scene < InitializationLevel::Editor);
}

#[test_case("scene", InitializationLevel::Scene)]
#[test_case("SCENE", InitializationLevel::Scene)]
#[test_case("editor", InitializationLevel::Editor)]
#[test_case("core", InitializationLevel::Core)]
fn InitializationLevel___from_str___parses_case_insensitively(input: &str, expected: InitializationLevel) {
    assert_eq!(input.parse::<InitializationLevel>().unwrap(), expected);
}

#[test]
fn InitializationLevel___from_str_unknown___returns_error() {
    let result = "gameplay".parse::<InitializationLevel>();

    assert!(result.is_err());
}

#[test]
fn InitializationLevel___cpp_constant___uses_module_prefix() {
    assert_eq!(
        InitializationLevel::Scene.cpp_constant(),
        "MODULE_INITIALIZATION_LEVEL_SCENE"
    );
}
