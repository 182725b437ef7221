//! Class reference docs (`doc_classes/<Class>.xml`) for the host editor.

use crate::ir::{Accessor, GeneratedClass};
use crate::output::GeneratedOutput;

const CLASS_XSD: &str =
    "https://raw.githubusercontent.com/godotengine/godot/master/doc/class.xsd";

/// Stage one reference page per generated class
pub fn write_docs(classes: &[GeneratedClass], output: &mut GeneratedOutput) {
    for class in classes {
        output.add(format!("doc_classes/{}.xml", class.name), render_class_doc(class));
    }
}

/// Render the XML reference page of one class
pub fn render_class_doc(class: &GeneratedClass) -> String {
    let docs = class.docs.as_deref().unwrap_or_default();
    let brief = docs.lines().next().unwrap_or_default();

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
    xml.push_str(&format!(
        "<class name=\"{}\" inherits=\"{}\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:noNamespaceSchemaLocation=\"{CLASS_XSD}\">\n",
        escape(&class.name),
        escape(&class.base)
    ));
    push_text_element(&mut xml, "brief_description", brief, 1);
    push_text_element(&mut xml, "description", docs, 1);
    xml.push_str("\t<tutorials>\n\t</tutorials>\n");

    let methods: Vec<&Accessor> = class.accessors().map(|(_, a)| a).collect();
    if !methods.is_empty() {
        xml.push_str("\t<methods>\n");
        for method in methods {
            push_method(&mut xml, method);
        }
        xml.push_str("\t</methods>\n");
    }

    let members: Vec<_> = class
        .properties
        .iter()
        .filter_map(|p| Some((p, p.setter()?, p.getter()?)))
        .collect();
    if !members.is_empty() {
        xml.push_str("\t<members>\n");
        for (property, setter, getter) in members {
            xml.push_str(&format!(
                "\t\t<member name=\"{}\" type=\"{}\" setter=\"{setter}\" getter=\"{getter}\">\n",
                escape(&property.name),
                escape(property.host.doc_type()),
            ));
            if let Some(docs) = &property.docs {
                for line in docs.lines() {
                    xml.push_str(&format!("\t\t\t{}\n", escape(line)));
                }
            }
            xml.push_str("\t\t</member>\n");
        }
        xml.push_str("\t</members>\n");
    }

    if !class.constants.is_empty() {
        xml.push_str("\t<constants>\n");
        for constant in &class.constants {
            xml.push_str(&format!(
                "\t\t<constant name=\"{}\" value=\"{}\">\n",
                escape(&constant.name),
                constant.value
            ));
            if let Some(docs) = &constant.docs {
                xml.push_str(&format!("\t\t\t{}\n", escape(docs)));
            }
            xml.push_str("\t\t</constant>\n");
        }
        xml.push_str("\t</constants>\n");
    }

    xml.push_str("</class>\n");
    xml
}

fn push_method(xml: &mut String, method: &Accessor) {
    xml.push_str(&format!("\t\t<method name=\"{}\"", escape(&method.method)));
    if method.is_const {
        xml.push_str(" qualifiers=\"const\"");
    }
    xml.push_str(">\n");
    let returns = method.returns.as_ref().map_or("void", |r| r.doc_type());
    xml.push_str(&format!("\t\t\t<return type=\"{}\" />\n", escape(returns)));
    for (index, param) in method.params.iter().enumerate() {
        xml.push_str(&format!(
            "\t\t\t<param index=\"{index}\" name=\"{}\" type=\"{}\" />\n",
            escape(&param.name),
            escape(param.host.doc_type())
        ));
    }
    xml.push_str("\t\t\t<description>\n\t\t\t</description>\n");
    xml.push_str("\t\t</method>\n");
}

fn push_text_element(xml: &mut String, tag: &str, text: &str, depth: usize) {
    let indent = "\t".repeat(depth);
    xml.push_str(&format!("{indent}<{tag}>\n"));
    for line in text.lines() {
        xml.push_str(&format!("{indent}\t{}\n", escape(line)));
    }
    xml.push_str(&format!("{indent}</{tag}>\n"));
}

/// Escape text for XML content and attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
