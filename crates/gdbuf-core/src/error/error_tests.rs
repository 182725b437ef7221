#![allow(non_snake_case)]

use super::*;

#[test]
fn Location___field___displays_file_message_and_field() {
    let location = Location::field("test/proto/gdbuf_test.proto", "OuterNestedMessage", "inner");

    let display = location.to_string();

    assert_eq!(
        display,
        "test/proto/gdbuf_test.proto: OuterNestedMessage.inner"
    );
}

#[test]
fn Location___message___omits_field() {
    let location = Location::message("dependency.proto", "DependencyMessage");

    assert_eq!(location.to_string(), "dependency.proto: DependencyMessage");
}

#[test]
fn Location___empty_message___displays_only_file() {
    let location = Location::message("dependency.proto", "");

    assert_eq!(location.to_string(), "dependency.proto");
}

#[test]
fn SchemaError___unresolved_type_reference___names_file_message_field_and_type() {
    let err = SchemaError::UnresolvedTypeReference {
        location: Location::field("a.proto", "Holder", "thing"),
        type_name: "Missing".into(),
    };

    let display = err.to_string();

    assert_eq!(
        display,
        "a.proto: Holder.thing: unresolved type reference `Missing`"
    );
}

#[test]
fn SchemaError___invalid_field_number___mentions_upper_bound() {
    let err = SchemaError::InvalidFieldNumber {
        location: Location::field("a.proto", "M", "f"),
        number: 0,
    };

    assert!(err.to_string().contains("1..=536870911"));
}

#[test]
fn SchemaError___syntax___reports_line_and_column() {
    let err = SchemaError::Syntax {
        file: "broken.proto".into(),
        line: 3,
        column: 7,
        detail: "expected identifier".into(),
    };

    assert_eq!(
        err.to_string(),
        "broken.proto:3:7: syntax error: expected identifier"
    );
}

#[test]
fn SchemaError___file___returns_location_file() {
    let err = SchemaError::DuplicateFieldNumber {
        location: Location::field("x.proto", "M", "b"),
        number: 1,
        existing: "a".into(),
    };

    assert_eq!(err.file(), "x.proto");
}

#[test]
fn SchemaError___all_variants___have_unique_codes() {
    let location = Location::default();
    let errors = vec![
        SchemaError::Syntax {
            file: String::new(),
            line: 1,
            column: 1,
            detail: String::new(),
        },
        SchemaError::DuplicateFieldNumber {
            location: location.clone(),
            number: 1,
            existing: String::new(),
        },
        SchemaError::DuplicateName {
            location: location.clone(),
            scope: String::new(),
            name: String::new(),
        },
        SchemaError::InvalidFieldNumber {
            location: location.clone(),
            number: 0,
        },
        SchemaError::InvalidEnumValue {
            location: location.clone(),
            number: 0,
        },
        SchemaError::InvalidMapKeyType {
            location: location.clone(),
            key_type: String::new(),
        },
        SchemaError::InvalidOneofMember {
            location: location.clone(),
            oneof: String::new(),
            reason: String::new(),
        },
        SchemaError::InvalidNesting {
            location: location.clone(),
            reason: String::new(),
        },
        SchemaError::ReservedFieldUse {
            location: location.clone(),
            reason: String::new(),
        },
        SchemaError::UnresolvedTypeReference {
            location,
            type_name: String::new(),
        },
        SchemaError::InvalidDescriptor {
            file: String::new(),
            detail: String::new(),
        },
    ];

    let codes: Vec<u32> = errors.iter().map(|e| e.error_code()).collect();
    let unique: std::collections::HashSet<u32> = codes.iter().copied().collect();

    assert_eq!(codes.len(), unique.len(), "error codes must be unique");
}

#[test]
fn ConfigError___invalid___displays_reason() {
    let err = ConfigError::Invalid("extension_name cannot be empty".into());

    assert_eq!(
        err.to_string(),
        "invalid config: extension_name cannot be empty"
    );
}
