//! Naming convention utilities for generated C++ and host-facing names.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `displayName` | [`to_snake_case`] | `display_name` |
//! | `snake_case` | [`to_pascal_case`] | `SnakeCase` |
//! | `OuterMood` | [`to_constant_case`] | `OUTER_MOOD` |
//! | `Outer.Inner` | [`class_name`] | `OuterInner` |
//! | `my-file` | [`to_identifier`] | `my_file` |

/// Convert camelCase or PascalCase to snake_case.
///
/// Input that is already snake_case is returned unchanged.
///
/// # Examples
///
/// ```
/// use gdbuf_codegen::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("displayName"), "display_name");
/// assert_eq!(to_snake_case("HTTPServer"), "http_server");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                None | Some('_') => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                Some(_) => false,
            };
            if boundary {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert a string to PascalCase.
///
/// Handles snake_case, kebab-case, and already-capitalized input.
///
/// # Examples
///
/// ```
/// use gdbuf_codegen::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
/// assert_eq!(to_pascal_case("hello-world"), "HelloWorld");
/// assert_eq!(to_pascal_case("hello"), "Hello");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['-', '_']).map(capitalize).collect()
}

/// Capitalize the first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert an identifier to CONSTANT_CASE.
pub fn to_constant_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

/// Host class name for a type nested at `local_path` (`Outer.Inner` → `OuterInner`).
///
/// # Examples
///
/// ```
/// use gdbuf_codegen::naming::class_name;
///
/// assert_eq!(
///     class_name("OuterNestedMessage.InnerNestedMessage"),
///     "OuterNestedMessageInnerNestedMessage"
/// );
/// ```
pub fn class_name(local_path: &str) -> String {
    local_path.split('.').collect()
}

/// Make an arbitrary string usable as a C++ identifier.
///
/// Characters outside `[A-Za-z0-9_]` become `_`; a leading digit gets a `_` prefix.
pub fn to_identifier(s: &str) -> String {
    let mut result: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Generated header path for a schema file (`a/b.proto` → `a/b.h`).
pub fn header_path(proto_path: &str) -> String {
    format!("{}.h", strip_proto(proto_path))
}

/// Generated source path for a schema file (`a/b.proto` → `a/b.cpp`).
pub fn source_path(proto_path: &str) -> String {
    format!("{}.cpp", strip_proto(proto_path))
}

fn strip_proto(proto_path: &str) -> &str {
    proto_path.strip_suffix(".proto").unwrap_or(proto_path)
}
