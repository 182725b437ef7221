//! JSON registration manifest (`gdbuf_manifest.json`).

use crate::ir::{ClassOrigin, GeneratedClass, Property};
use crate::registration::RegistrationTable;
use gdbuf_core::GeneratorConfig;
use serde_json::{Value, json};

/// Manifest file name within the output directory
pub const MANIFEST_FILE: &str = "gdbuf_manifest.json";

/// Build the manifest: registration order plus the shape of every class
pub fn generate_manifest(
    config: &GeneratorConfig,
    classes: &[GeneratedClass],
    table: &RegistrationTable,
) -> Value {
    let mut shapes = serde_json::Map::new();
    for class in classes {
        shapes.insert(class.qualified_name(), class_shape(class));
    }

    let header_first: Vec<&str> = table
        .header_first()
        .map(|e| e.qualified_name.as_str())
        .collect();

    json!({
        "extension": config.extension_name,
        "generator_version": env!("CARGO_PKG_VERSION"),
        "initialization_level": table.level().to_string(),
        "registration_order": table.order(),
        "header_first": header_first,
        "classes": shapes,
    })
}

/// Pretty-printed manifest text
pub fn render_manifest(
    config: &GeneratorConfig,
    classes: &[GeneratedClass],
    table: &RegistrationTable,
) -> String {
    format!("{:#}\n", generate_manifest(config, classes, table))
}

fn class_shape(class: &GeneratedClass) -> Value {
    let kind = match class.origin {
        ClassOrigin::Message(_) => "message",
        ClassOrigin::Enum(_) => "enum",
        ClassOrigin::EnumTable => "enum_table",
    };

    let mut shape = json!({
        "kind": kind,
        "base": class.base,
        "properties": class.properties.iter().map(property_shape).collect::<Vec<_>>(),
    });

    if !class.schema_name.is_empty() {
        shape["schema_name"] = json!(class.schema_name);
        shape["source_file"] = json!(class.source_file);
    }

    if !class.oneofs.is_empty() {
        shape["oneofs"] = class
            .oneofs
            .iter()
            .map(|o| {
                json!({
                    "name": o.name,
                    "members": o.members,
                    "discriminator": o.discriminator,
                })
            })
            .collect();
    }

    if !class.constants.is_empty() {
        let mut constants = serde_json::Map::new();
        for constant in &class.constants {
            constants.insert(constant.name.clone(), json!(constant.value));
        }
        shape["constants"] = Value::Object(constants);
    }

    shape
}

fn property_shape(property: &Property) -> Value {
    let mut shape = json!({
        "name": property.name,
        "number": property.number,
        "type": property.mapped.to_string(),
        "variant": property.host.variant.doc_name(),
        "presence": property.presence,
        "methods": property.accessors.iter().map(|a| a.method.as_str()).collect::<Vec<_>>(),
    });

    if let Some(class_name) = &property.host.class_name {
        shape["class_name"] = json!(class_name);
    }

    shape
}

#[cfg(test)]
#[path = "manifest/manifest_tests.rs"]
mod manifest_tests;
