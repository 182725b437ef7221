//! C++ binding sources for the GDExtension host.
//!
//! Per schema file `src/<path>.h` and `src/<path>.cpp` hold every class
//! declared in that file. The registration unit (`src/register_types.*`)
//! registers classes in [`RegistrationTable`] order, and
//! `out/<extension>.gdextension` points the host at the entry symbol.

use crate::ir::{Accessor, AccessorKind, ClassOrigin, GeneratedClass, Property};
use crate::mapper::MappedType;
use crate::naming::{header_path, source_path, to_snake_case};
use crate::output::GeneratedOutput;
use crate::registration::RegistrationTable;
use gdbuf_core::GeneratorConfig;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const GENERATED_BANNER: &str = "// Code generated by gdbuf. DO NOT EDIT.\n";
const ENTRY_SYMBOL: &str = "gdextension_init";
const TYPE_URL_PREFIX: &str = "type.googleapis.com/";

/// Renders C++ sources for a generated class set
pub struct CppWriter<'a> {
    config: &'a GeneratorConfig,
    classes: &'a [GeneratedClass],
    table: &'a RegistrationTable,
    by_schema_name: HashMap<&'a str, &'a GeneratedClass>,
}

impl<'a> CppWriter<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        classes: &'a [GeneratedClass],
        table: &'a RegistrationTable,
    ) -> Self {
        let by_schema_name = classes
            .iter()
            .filter(|c| !c.schema_name.is_empty())
            .map(|c| (c.schema_name.as_str(), c))
            .collect();
        Self {
            config,
            classes,
            table,
            by_schema_name,
        }
    }

    /// Stage every C++ source and the extension descriptor
    pub fn write(&self, output: &mut GeneratedOutput) {
        for (file, classes) in self.classes_by_file() {
            output.add(format!("src/{}", header_path(file)), self.render_header(file, &classes));
            output.add(format!("src/{}", source_path(file)), self.render_source(file, &classes));
        }

        if let Some(table) = self.enum_table() {
            output.add("src/global_enums.h", render_global_enums(table));
        }
        output.add("src/register_types.h", render_register_types_header());
        output.add("src/register_types.cpp", self.render_register_types());
        output.add(
            format!("out/{}.gdextension", self.config.extension_name),
            self.render_gdextension(),
        );
    }

    fn enum_table(&self) -> Option<&'a GeneratedClass> {
        self.classes
            .iter()
            .find(|c| c.origin == ClassOrigin::EnumTable)
    }

    /// Classes grouped by schema file, files in emission order, classes in
    /// registration order
    fn classes_by_file(&self) -> Vec<(&'a str, Vec<&'a GeneratedClass>)> {
        let mut files: Vec<(&str, Vec<&GeneratedClass>)> = Vec::new();
        for class in self.classes {
            let known = files.iter().any(|(f, _)| *f == class.source_file);
            if !class.source_file.is_empty() && !known {
                files.push((class.source_file.as_str(), Vec::new()));
            }
        }
        for entry in self.table.entries() {
            let class = &self.classes[entry.class];
            if let Some((_, list)) = files.iter_mut().find(|(f, _)| *f == class.source_file) {
                list.push(class);
            }
        }
        files
    }

    /// Classes referenced from `classes` that live in other schema files
    fn external_refs(&self, file: &str, classes: &[&GeneratedClass]) -> Vec<&'a GeneratedClass> {
        let mut seen = BTreeSet::new();
        let mut external = Vec::new();
        for class in classes {
            for reference in class.references() {
                if let Some(target) = self.by_schema_name.get(reference.target)
                    && target.source_file != file
                    && seen.insert(target.qualified_name())
                {
                    external.push(*target);
                }
            }
        }
        external
    }

    fn render_header(&self, file: &str, classes: &[&GeneratedClass]) -> String {
        let mut code = String::new();
        code.push_str(GENERATED_BANNER);
        code.push_str(&format!("// source: {file}\n\n"));
        code.push_str("#pragma once\n\n");

        let bases: BTreeSet<String> = classes
            .iter()
            .map(|c| format!("godot_cpp/classes/{}.hpp", to_snake_case(&c.base)))
            .collect();
        for base in &bases {
            code.push_str(&format!("#include <{base}>\n"));
        }
        for include in [
            "godot_cpp/core/class_db.hpp",
            "godot_cpp/variant/array.hpp",
            "godot_cpp/variant/dictionary.hpp",
            "godot_cpp/variant/packed_byte_array.hpp",
            "godot_cpp/variant/packed_string_array.hpp",
            "godot_cpp/variant/string.hpp",
            "godot_cpp/variant/variant.hpp",
        ] {
            code.push_str(&format!("#include <{include}>\n"));
        }
        code.push('\n');

        // Classes from other files are only named here; their headers are
        // included by the source file.
        let mut external: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for target in self.external_refs(file, classes) {
            external
                .entry(target.namespace.as_str())
                .or_default()
                .push(target.name.as_str());
        }
        for (namespace, names) in &external {
            code.push_str(&format!("namespace {namespace} {{\n"));
            for name in names {
                code.push_str(&format!("class {name};\n"));
            }
            code.push_str("}\n\n");
        }

        for (namespace, group) in group_by_namespace(classes) {
            code.push_str(&format!("namespace {namespace} {{\n\n"));
            for class in &group {
                code.push_str(&format!("class {};\n", class.name));
            }
            for class in &group {
                code.push('\n');
                code.push_str(&render_class_declaration(class));
            }
            code.push_str(&format!("\n}} // namespace {namespace}\n"));
        }

        code
    }

    fn render_source(&self, file: &str, classes: &[&GeneratedClass]) -> String {
        let mut code = String::new();
        code.push_str(GENERATED_BANNER);
        code.push_str(&format!("// source: {file}\n\n"));
        code.push_str(&format!("#include \"{}\"\n\n", header_path(file)));

        let includes: BTreeSet<String> = self
            .external_refs(file, classes)
            .iter()
            .map(|c| header_path(&c.source_file))
            .collect();
        for include in &includes {
            code.push_str(&format!("#include \"{include}\"\n"));
        }
        if classes.iter().any(|c| c.is_message()) {
            code.push_str("#include \"gdbuf_wire.h\"\n");
        }
        code.push_str("\n#include <godot_cpp/core/error_macros.hpp>\n");

        for (namespace, group) in group_by_namespace(classes) {
            code.push_str(&format!("\nnamespace {namespace} {{\n"));
            for class in group {
                code.push('\n');
                code.push_str(&render_class_definition(class));
            }
            code.push_str(&format!("\n}} // namespace {namespace}\n"));
        }

        code
    }

    fn render_register_types(&self) -> String {
        let level = self.table.level().cpp_constant();
        let mut code = String::new();
        code.push_str(GENERATED_BANNER);
        code.push('\n');
        code.push_str("#include \"register_types.h\"\n\n");

        for (file, _) in self.classes_by_file() {
            code.push_str(&format!("#include \"{}\"\n", header_path(file)));
        }
        if self.enum_table().is_some() {
            code.push_str("#include \"global_enums.h\"\n");
        }
        code.push('\n');
        code.push_str("#include <gdextension_interface.h>\n");
        code.push_str("#include <godot_cpp/core/defs.hpp>\n");
        code.push_str("#include <godot_cpp/godot.hpp>\n\n");
        code.push_str("using namespace godot;\n\n");

        code.push_str("void initialize_gdextension_types(ModuleInitializationLevel p_level)\n{\n");
        code.push_str(&format!("\tif (p_level != {level}) {{\n\t\treturn;\n\t}}\n"));
        let headers: Vec<_> = self.table.header_first().collect();
        if !headers.is_empty() {
            code.push_str("\t// Header-first (cyclic references):\n");
            for entry in headers {
                code.push_str(&format!("\t//   {}\n", entry.qualified_name));
            }
        }
        for entry in self.table.entries() {
            code.push_str(&format!("\tGDREGISTER_CLASS({});\n", entry.qualified_name));
        }
        code.push_str("}\n\n");

        code.push_str("void uninitialize_gdextension_types(ModuleInitializationLevel p_level) {\n");
        code.push_str(&format!("\tif (p_level != {level}) {{\n\t\treturn;\n\t}}\n"));
        code.push_str("}\n\n");

        code.push_str("extern \"C\"\n{\n");
        code.push_str("\t// Initialization\n");
        code.push_str(&format!(
            "\tGDExtensionBool GDE_EXPORT {ENTRY_SYMBOL}(GDExtensionInterfaceGetProcAddress p_get_proc_address, GDExtensionClassLibraryPtr p_library, GDExtensionInitialization *r_initialization)\n"
        ));
        code.push_str("\t{\n");
        code.push_str("\t\tGDExtensionBinding::InitObject init_obj(p_get_proc_address, p_library, r_initialization);\n");
        code.push_str("\t\tinit_obj.register_initializer(initialize_gdextension_types);\n");
        code.push_str("\t\tinit_obj.register_terminator(uninitialize_gdextension_types);\n");
        code.push_str(&format!(
            "\t\tinit_obj.set_minimum_library_initialization_level({level});\n\n"
        ));
        code.push_str("\t\treturn init_obj.init();\n");
        code.push_str("\t}\n}\n");

        code
    }

    fn render_gdextension(&self) -> String {
        let name = &self.config.extension_name;
        let mut code = String::new();
        code.push_str("[configuration]\n\n");
        code.push_str(&format!("entry_symbol = \"{ENTRY_SYMBOL}\"\n"));
        code.push_str(&format!(
            "compatibility_minimum = \"{}\"\n\n",
            self.config.compatibility_minimum
        ));
        code.push_str("[libraries]\n\n");
        for (platform, suffix) in [
            ("macos", "framework"),
            ("windows.x86_64", "x86_64.dll"),
            ("linux.x86_64", "x86_64.so"),
        ] {
            let os = platform.split('.').next().unwrap_or(platform);
            for build in ["debug", "release"] {
                let key = match platform.split_once('.') {
                    Some((os, arch)) => format!("{os}.{build}.{arch}"),
                    None => format!("{platform}.{build}"),
                };
                code.push_str(&format!(
                    "{key} = \"res://bin/lib{name}.{os}.template_{build}.{suffix}\"\n"
                ));
            }
        }
        code
    }
}

fn render_register_types_header() -> String {
    let mut code = String::new();
    code.push_str(GENERATED_BANNER);
    code.push_str("\n#pragma once\n\n");
    code.push_str("#include <godot_cpp/core/class_db.hpp>\n\n");
    code.push_str("using namespace godot;\n\n");
    code.push_str("void initialize_gdextension_types(ModuleInitializationLevel p_level);\n");
    code.push_str("void uninitialize_gdextension_types(ModuleInitializationLevel p_level);\n");
    code
}

fn render_global_enums(table: &GeneratedClass) -> String {
    let mut code = String::new();
    code.push_str(GENERATED_BANNER);
    code.push_str("\n#pragma once\n\n");
    code.push_str(&format!(
        "#include <godot_cpp/classes/{}.hpp>\n",
        to_snake_case(&table.base)
    ));
    code.push_str("#include <godot_cpp/core/class_db.hpp>\n\n");
    code.push_str(&format!("namespace {} {{\n\n", table.namespace));
    push_docs(&mut code, table.docs.as_deref(), "");
    code.push_str(&format!(
        "class {name} : public godot::{base} {{\n\tGDCLASS({name}, godot::{base})\n\n",
        name = table.name,
        base = table.base
    ));
    code.push_str("protected:\n\tstatic void _bind_methods() {\n");
    for constant in &table.constants {
        code.push_str(&format!("\t\t{}\n", bind_constant(constant.name.as_str(), constant.value)));
    }
    code.push_str("\t}\n};\n\n");
    code.push_str(&format!("}} // namespace {}\n", table.namespace));
    code
}

fn group_by_namespace<'c>(
    classes: &[&'c GeneratedClass],
) -> Vec<(&'c str, Vec<&'c GeneratedClass>)> {
    let mut groups: Vec<(&str, Vec<&GeneratedClass>)> = Vec::new();
    for &class in classes {
        match groups.iter_mut().find(|(ns, _)| *ns == class.namespace) {
            Some((_, list)) => list.push(class),
            None => groups.push((class.namespace.as_str(), vec![class])),
        }
    }
    groups
}

fn push_docs(code: &mut String, docs: Option<&str>, indent: &str) {
    if let Some(docs) = docs {
        for line in docs.lines() {
            if line.is_empty() {
                code.push_str(&format!("{indent}///\n"));
            } else {
                code.push_str(&format!("{indent}/// {line}\n"));
            }
        }
    }
}

fn bind_constant(name: &str, value: i64) -> String {
    format!(
        "godot::ClassDB::bind_integer_constant(get_class_static(), godot::StringName(), \"{name}\", {value});"
    )
}

/// Member storage name for a property
fn member(property: &Property) -> String {
    format!("{}_", to_snake_case(&property.name))
}

fn oneof_case(class: &GeneratedClass, property: &Property) -> Option<String> {
    property
        .oneof
        .and_then(|i| class.oneofs.get(i))
        .map(|o| format!("{}_case_", to_snake_case(&o.name)))
}

fn uses_presence_flag(class: &GeneratedClass, property: &Property) -> bool {
    property.presence
        && oneof_case(class, property).is_none()
        && matches!(
            property.mapped,
            MappedType::Scalar(_) | MappedType::EnumRef(_) | MappedType::WellKnown(_)
        )
        && !property.mapped.is_any()
}

fn method_signature(class_prefix: &str, accessor: &Accessor) -> String {
    let returns = accessor
        .returns
        .as_ref()
        .map(|r| r.cpp.as_str())
        .unwrap_or("void");
    let params = accessor
        .params
        .iter()
        .map(|p| p.host.param_decl(&p.name))
        .collect::<Vec<_>>()
        .join(", ");
    let constness = if accessor.is_const { " const" } else { "" };
    format!("{returns} {class_prefix}{}({params}){constness}", accessor.method)
}

fn render_class_declaration(class: &GeneratedClass) -> String {
    let mut code = String::new();
    push_docs(&mut code, class.docs.as_deref(), "");
    code.push_str(&format!(
        "class {name} : public godot::{base} {{\n\tGDCLASS({name}, godot::{base})\n\n",
        name = class.name,
        base = class.base
    ));

    if !class.is_message() {
        code.push_str("protected:\n\tstatic void _bind_methods();\n};\n");
        return code;
    }

    code.push_str("public:\n");
    code.push_str(&format!(
        "\tstatic constexpr const char *DESCRIPTOR_NAME = \"{}\";\n\n",
        class.schema_name
    ));
    code.push_str(&format!("\t{}();\n\t~{}();\n", class.name, class.name));

    for property in &class.properties {
        code.push('\n');
        push_docs(&mut code, property.docs.as_deref(), "\t");
        for accessor in &property.accessors {
            code.push_str(&format!("\t{};\n", method_signature("", accessor)));
        }
    }
    if !class.oneofs.is_empty() {
        code.push('\n');
        for oneof in &class.oneofs {
            code.push_str(&format!("\tgodot::String {}() const;\n", oneof.discriminator));
        }
    }

    code.push('\n');
    code.push_str("\tgodot::String get_descriptor_name() const;\n");
    code.push_str("\tgodot::PackedByteArray serialize() const;\n");
    code.push_str("\tgodot::Error parse(const godot::PackedByteArray &p_bytes);\n\n");
    code.push_str("protected:\n\tstatic void _bind_methods();\n\n");
    code.push_str("private:\n");

    for property in &class.properties {
        let m = member(property);
        if property.mapped.is_any() {
            code.push_str(&format!("\tgodot::String {m}type_url_;\n"));
            code.push_str(&format!("\tgodot::PackedByteArray {m}value_;\n"));
            continue;
        }
        code.push_str(&format!("\t{} {m}{{}};\n", property.host.cpp));
        if uses_presence_flag(class, property) {
            code.push_str(&format!("\tbool has_{m} = false;\n"));
        }
    }
    for oneof in &class.oneofs {
        code.push_str(&format!(
            "\tint32_t {}_case_ = 0;\n",
            to_snake_case(&oneof.name)
        ));
    }

    code.push_str("};\n");
    code
}

fn render_class_definition(class: &GeneratedClass) -> String {
    let name = &class.name;
    let mut code = String::new();

    if !class.is_message() {
        code.push_str(&format!("void {name}::_bind_methods() {{\n"));
        for constant in &class.constants {
            code.push_str(&format!("\t{}\n", bind_constant(&constant.name, constant.value)));
        }
        code.push_str("}\n");
        return code;
    }

    code.push_str(&format!("{name}::{name}() {{}}\n\n"));
    code.push_str(&format!("{name}::~{name}() {{}}\n"));

    let prefix = format!("{name}::");
    for property in &class.properties {
        for accessor in &property.accessors {
            code.push('\n');
            code.push_str(&format!("{} {{\n", method_signature(&prefix, accessor)));
            for line in accessor_body(class, property, accessor.kind) {
                code.push_str(&format!("\t{line}\n"));
            }
            code.push_str("}\n");
        }
    }

    for oneof in &class.oneofs {
        let case = format!("{}_case_", to_snake_case(&oneof.name));
        code.push_str(&format!(
            "\ngodot::String {name}::{}() const {{\n\tswitch ({case}) {{\n",
            oneof.discriminator
        ));
        for member_name in &oneof.members {
            if let Some(property) = class.property(member_name) {
                code.push_str(&format!(
                    "\tcase {}:\n\t\treturn \"{}\";\n",
                    property.number, property.name
                ));
            }
        }
        code.push_str("\tdefault:\n\t\treturn godot::String();\n\t}\n}\n");
    }

    code.push_str(&format!(
        "\ngodot::String {name}::get_descriptor_name() const {{\n\treturn DESCRIPTOR_NAME;\n}}\n"
    ));
    code.push_str(&format!(
        "\ngodot::PackedByteArray {name}::serialize() const {{\n\treturn gdbuf::wire::serialize(DESCRIPTOR_NAME, this);\n}}\n"
    ));
    code.push_str(&format!(
        "\ngodot::Error {name}::parse(const godot::PackedByteArray &p_bytes) {{\n\treturn gdbuf::wire::parse(DESCRIPTOR_NAME, p_bytes, this);\n}}\n"
    ));

    code.push_str(&format!("\nvoid {name}::_bind_methods() {{\n"));
    let mut bindings: Vec<(&str, Vec<&str>)> = class
        .accessors()
        .map(|(_, a)| {
            let params = a.params.iter().map(|p| p.name.as_str()).collect();
            (a.method.as_str(), params)
        })
        .collect();
    bindings.extend(class.oneofs.iter().map(|o| (o.discriminator.as_str(), Vec::new())));
    bindings.push(("get_descriptor_name", Vec::new()));
    bindings.push(("serialize", Vec::new()));
    bindings.push(("parse", vec!["bytes"]));
    for (method, params) in bindings {
        code.push_str(&format!("\t{}\n", bind_method(name, method, &params)));
    }

    let bound: Vec<_> = class
        .properties
        .iter()
        .filter_map(|p| Some((p, p.setter()?, p.getter()?)))
        .collect();
    if !bound.is_empty() {
        code.push('\n');
    }
    for (property, setter, getter) in bound {
        code.push_str(&format!(
            "\tADD_PROPERTY({}, \"{setter}\", \"{getter}\");\n",
            property_info(property)
        ));
    }
    code.push_str("}\n");

    code
}

fn bind_method(class: &str, method: &str, params: &[&str]) -> String {
    let names: String = params.iter().map(|p| format!(", \"{p}\"")).collect();
    format!("godot::ClassDB::bind_method(godot::D_METHOD(\"{method}\"{names}), &{class}::{method});")
}

fn property_info(property: &Property) -> String {
    let host = &property.host;
    let variant = host.variant.cpp_enum();
    match (&host.hint, &host.class_name) {
        (_, Some(class_name)) => format!(
            "godot::PropertyInfo({variant}, \"{}\", godot::PROPERTY_HINT_NONE, \"\", godot::PROPERTY_USAGE_DEFAULT, \"{class_name}\")",
            property.name
        ),
        (Some(hint), None) => format!(
            "godot::PropertyInfo({variant}, \"{}\", {}, \"{}\")",
            property.name,
            hint.cpp_constant(),
            hint.hint_string()
        ),
        (None, None) => format!("godot::PropertyInfo({variant}, \"{}\")", property.name),
    }
}

/// Statement lines of one accessor's body
fn accessor_body(class: &GeneratedClass, property: &Property, kind: AccessorKind) -> Vec<String> {
    let m = member(property);
    let number = property.number;
    let case = oneof_case(class, property);
    let flag = uses_presence_flag(class, property).then(|| format!("has_{m}"));

    match kind {
        AccessorKind::Get => match (&property.mapped, &case) {
            (MappedType::MessageRef(_), Some(case)) => vec![
                format!("if ({case} != {number} || {m}.is_null()) {{"),
                format!("\t{} value;", property.host.cpp),
                "\tvalue.instantiate();".to_string(),
                "\treturn value;".to_string(),
                "}".to_string(),
                format!("return {m};"),
            ],
            (MappedType::MessageRef(_), None) => vec![
                format!("if ({m}.is_null()) {{"),
                format!("\t{} value;", property.host.cpp),
                "\tvalue.instantiate();".to_string(),
                format!("\tset_{}(value);", to_snake_case(&property.name)),
                "}".to_string(),
                format!("return {m};"),
            ],
            _ => vec![format!("return {m};")],
        },
        AccessorKind::Set => {
            let mut lines = sibling_clears(class, property);
            lines.push(format!("{m} = p_value;"));
            if let Some(flag) = &flag {
                lines.push(format!("{flag} = true;"));
            }
            if let Some(case) = &case {
                lines.push(format!("{case} = {number};"));
            }
            lines
        }
        AccessorKind::Has => match (&case, &flag) {
            (Some(case), _) => vec![format!("return {case} == {number};")],
            (None, Some(flag)) => vec![format!("return {flag};")],
            (None, None) if property.mapped.is_any() => {
                vec![format!("return !{m}type_url_.is_empty();")]
            }
            (None, None) => vec![format!("return {m}.is_valid();")],
        },
        AccessorKind::Clear => {
            let mut lines = match &property.mapped {
                MappedType::MessageRef(_) => vec![format!("{m}.unref();")],
                MappedType::Repeated(_) | MappedType::Map(..) => vec![format!("{m}.clear();")],
                _ if property.mapped.is_any() => vec![
                    format!("{m}type_url_ = godot::String();"),
                    format!("{m}value_ = godot::PackedByteArray();"),
                ],
                _ => vec![format!("{m} = {}();", property.host.cpp)],
            };
            if let Some(flag) = &flag {
                lines.push(format!("{flag} = false;"));
            }
            if let Some(case) = &case {
                lines.push(format!("if ({case} == {number}) {{"));
                lines.push(format!("\t{case} = 0;"));
                lines.push("}".to_string());
            }
            lines
        }
        AccessorKind::Size => vec![format!("return {m}.size();")],
        AccessorKind::Append => vec![format!("{m}.push_back(p_value);")],
        AccessorKind::GetAt => vec![
            format!("ERR_FAIL_INDEX_V(p_index, {m}.size(), {}());", returns_cpp(property, kind)),
            format!("return {m}[p_index];"),
        ],
        AccessorKind::SetAt => vec![
            format!("ERR_FAIL_INDEX(p_index, {m}.size());"),
            format!("{m}[p_index] = p_value;"),
        ],
        AccessorKind::RemoveAt => vec![
            format!("ERR_FAIL_INDEX(p_index, {m}.size());"),
            format!("{m}.remove_at(p_index);"),
        ],
        AccessorKind::MapGet => vec![format!("return {m}.get(p_key, godot::Variant());")],
        AccessorKind::MapPut => vec![format!("{m}[p_key] = p_value;")],
        AccessorKind::MapErase => vec![format!("return {m}.erase(p_key);")],
        AccessorKind::MapContains => vec![format!("return {m}.has(p_key);")],
        AccessorKind::Pack => {
            let mut lines = sibling_clears(class, property);
            lines.extend([
                "ERR_FAIL_COND_MSG(p_value.is_null(), \"cannot pack a null message\");".to_string(),
                format!(
                    "{m}type_url_ = godot::String(\"{TYPE_URL_PREFIX}\") + godot::String(p_value->call(\"get_descriptor_name\"));"
                ),
                format!("{m}value_ = p_value->call(\"serialize\");"),
            ]);
            if let Some(case) = &case {
                lines.push(format!("{case} = {number};"));
            }
            lines
        }
        AccessorKind::Unpack => vec![
            format!("if (!{m}type_url_.ends_with(godot::String(\"/\") + p_type_name)) {{"),
            "\treturn godot::Ref<godot::RefCounted>();".to_string(),
            "}".to_string(),
            format!("return gdbuf::wire::unpack(p_type_name, {m}value_);"),
        ],
        AccessorKind::TypeUrl => vec![format!("return {m}type_url_;")],
    }
}

fn returns_cpp(property: &Property, kind: AccessorKind) -> String {
    property
        .accessor(kind)
        .and_then(|a| a.returns.as_ref())
        .map(|r| r.cpp.clone())
        .unwrap_or_else(|| "godot::Variant".to_string())
}

/// Clear calls for the other members of the property's oneof
fn sibling_clears(class: &GeneratedClass, property: &Property) -> Vec<String> {
    let Some(oneof) = property.oneof.and_then(|i| class.oneofs.get(i)) else {
        return Vec::new();
    };
    oneof
        .members
        .iter()
        .filter(|name| **name != property.name)
        .map(|name| format!("clear_{}();", to_snake_case(name)))
        .collect()
}
