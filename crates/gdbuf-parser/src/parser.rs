//! Parse `.proto` source text into schema definitions using PEST.

use crate::comments::SourceComments;
use gdbuf_core::prelude::*;
use gdbuf_core::schema::def::{EnumValueDef, ReservedDef};
use gdbuf_core::Syntax;
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "proto.pest"]
struct ProtoParser;

/// Parse one schema file
///
/// `path` is the file's path relative to its schema root; it becomes
/// [`FileDef::path`] and is used in diagnostics.
pub fn parse_proto(path: &str, source: &str) -> SchemaResult<FileDef> {
    let pairs = ProtoParser::parse(Rule::proto, source).map_err(|e| from_pest_error(path, e))?;
    let ctx = Context {
        path,
        comments: SourceComments::new(source),
    };

    let mut file = FileDef::new(path);
    let mut explicit_syntax = false;

    if let Some(pair) = pairs.into_iter().next() {
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::syntax_decl => {
                    let at = inner.clone();
                    let value = ctx.first_string(inner)?;
                    file.syntax = Syntax::from_keyword(&value)
                        .filter(|syntax| *syntax != Syntax::Editions)
                        .ok_or_else(|| ctx.error(&at, format!("unknown syntax `{value}`")))?;
                    explicit_syntax = true;
                }
                Rule::edition_decl => {
                    file.syntax = Syntax::Editions;
                    explicit_syntax = true;
                }
                Rule::import_decl => {
                    let import = ctx.first_string(inner)?;
                    file.imports.push(import);
                }
                Rule::package_decl => {
                    if let Some(name) = inner.into_inner().find(|p| p.as_rule() == Rule::full_ident)
                    {
                        file.package = Some(name.as_str().to_string());
                    }
                }
                Rule::message_def => file.messages.push(ctx.build_message(inner)?),
                Rule::enum_def => file.enums.push(ctx.build_enum(inner)?),
                Rule::extend_def => {
                    tracing::warn!("{}: ignoring `extend` block", path);
                }
                Rule::service_def => {
                    tracing::debug!("{}: ignoring service definition", path);
                }
                _ => {}
            }
        }
    }

    if !explicit_syntax {
        // Files without a syntax statement are proto2
        file.syntax = Syntax::Proto2;
    }

    tracing::debug!(
        "Parsed {}: {} messages, {} enums",
        path,
        file.messages.len(),
        file.enums.len()
    );
    Ok(file)
}

struct Context<'s> {
    path: &'s str,
    comments: SourceComments<'s>,
}

impl<'s> Context<'s> {
    fn error(&self, pair: &Pair<'_, Rule>, detail: impl Into<String>) -> SchemaError {
        let (line, column) = pair.as_span().start_pos().line_col();
        SchemaError::Syntax {
            file: self.path.to_string(),
            line,
            column,
            detail: detail.into(),
        }
    }

    /// Leading comment, falling back to a trailing comment
    ///
    /// Block statements take their trailing comment from the line with the
    /// opening brace; simple statements from the line with the closing `;`.
    fn docs(&self, pair: &Pair<'_, Rule>, block: bool) -> Option<String> {
        let span = pair.as_span();
        let start = span.start_pos();
        if let Some(leading) = self.comments.leading(start.line_col().0) {
            return Some(leading);
        }

        if block {
            let line = start.line_of();
            let (_, column) = start.line_col();
            let rest = line.get(column.saturating_sub(1)..)?;
            let brace = rest.find('{')?;
            SourceComments::trailing(&rest[brace + 1..])
        } else {
            let end = span.end_pos();
            let line = end.line_of();
            let (_, column) = end.line_col();
            SourceComments::trailing(line.get(column.saturating_sub(1)..)?)
        }
    }

    fn first_string(&self, pair: Pair<'_, Rule>) -> SchemaResult<String> {
        let at = pair.clone();
        pair.into_inner()
            .find(|p| p.as_rule() == Rule::string_lit)
            .map(string_value)
            .ok_or_else(|| self.error(&at, "expected string literal"))
    }

    fn int(&self, pair: &Pair<'_, Rule>) -> SchemaResult<i64> {
        parse_int(pair.as_str())
            .ok_or_else(|| self.error(pair, format!("integer literal `{}` is out of range", pair.as_str())))
    }

    fn build_message(&self, pair: Pair<'_, Rule>) -> SchemaResult<MessageDef> {
        let docs = self.docs(&pair, true);
        let mut message = MessageDef::new("");
        message.docs = docs;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::ident => message.name = inner.as_str().to_string(),
                Rule::field => message.fields.push(self.build_field(inner, None)?),
                Rule::map_field => message.fields.push(self.build_map_field(inner, None)?),
                Rule::oneof_def => self.build_oneof(inner, &mut message)?,
                Rule::message_def => message.messages.push(self.build_message(inner)?),
                Rule::enum_def => message.enums.push(self.build_enum(inner)?),
                Rule::reserved_decl => self.build_reserved(inner, &mut message.reserved)?,
                Rule::extensions_decl => {
                    tracing::debug!("{}: {}: ignoring extension range", self.path, message.name);
                }
                Rule::extend_def => {
                    tracing::warn!("{}: {}: ignoring `extend` block", self.path, message.name);
                }
                _ => {}
            }
        }

        tracing::debug!("Discovered message {}", message.name);
        Ok(message)
    }

    fn build_field(&self, pair: Pair<'_, Rule>, oneof: Option<&str>) -> SchemaResult<FieldDef> {
        let docs = self.docs(&pair, false);
        let at = pair.clone();
        let mut label = Label::Singular;
        let mut type_name = None;
        let mut name = None;
        let mut number = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::label => {
                    label = Label::from_keyword(inner.as_str())
                        .ok_or_else(|| self.error(&inner, "unknown field label"))?;
                }
                Rule::type_name => type_name = Some(inner.as_str().to_string()),
                Rule::ident => name = Some(inner.as_str().to_string()),
                Rule::int_lit => number = Some(self.int(&inner)?),
                _ => {}
            }
        }

        let (Some(type_name), Some(name), Some(number)) = (type_name, name, number) else {
            return Err(self.error(&at, "incomplete field declaration"));
        };

        let mut field = FieldDef::new(name, number, type_name).with_label(label);
        field.oneof = oneof.map(str::to_string);
        field.docs = docs;
        Ok(field)
    }

    fn build_map_field(&self, pair: Pair<'_, Rule>, oneof: Option<&str>) -> SchemaResult<FieldDef> {
        let docs = self.docs(&pair, false);
        let at = pair.clone();
        let mut label = Label::Singular;
        let mut types = Vec::with_capacity(2);
        let mut name = None;
        let mut number = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::label => {
                    label = Label::from_keyword(inner.as_str())
                        .ok_or_else(|| self.error(&inner, "unknown field label"))?;
                }
                Rule::type_name => types.push(inner.as_str().to_string()),
                Rule::ident => name = Some(inner.as_str().to_string()),
                Rule::int_lit => number = Some(self.int(&inner)?),
                _ => {}
            }
        }

        let (Some(name), Some(number)) = (name, number) else {
            return Err(self.error(&at, "incomplete map field declaration"));
        };
        let mut types = types.into_iter();
        let (Some(key), Some(value)) = (types.next(), types.next()) else {
            return Err(self.error(&at, "map field needs a key and a value type"));
        };

        let mut field = FieldDef::map(name, number, key, value).with_label(label);
        field.oneof = oneof.map(str::to_string);
        field.docs = docs;
        Ok(field)
    }

    fn build_oneof(&self, pair: Pair<'_, Rule>, message: &mut MessageDef) -> SchemaResult<()> {
        let docs = self.docs(&pair, true);
        let mut inner = pair.into_inner().filter(|p| p.as_rule() != Rule::kw_oneof);
        let Some(name_pair) = inner.next() else {
            return Ok(());
        };
        let name = name_pair.as_str().to_string();

        for member in inner {
            match member.as_rule() {
                Rule::field => message.fields.push(self.build_field(member, Some(&name))?),
                Rule::map_field => message
                    .fields
                    .push(self.build_map_field(member, Some(&name))?),
                _ => {}
            }
        }

        message.oneofs.push(OneofDef { name, docs });
        Ok(())
    }

    fn build_reserved(&self, pair: Pair<'_, Rule>, reserved: &mut ReservedDef) -> SchemaResult<()> {
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::reserved_ranges => {
                    for range in inner.into_inner() {
                        reserved.ranges.push(self.build_range(range)?);
                    }
                }
                Rule::reserved_names => {
                    for name in inner.into_inner() {
                        let value = match name.clone().into_inner().next() {
                            Some(lit) if lit.as_rule() == Rule::string_lit => string_value(lit),
                            _ => name.as_str().to_string(),
                        };
                        reserved.names.push(value);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn build_range(&self, pair: Pair<'_, Rule>) -> SchemaResult<(i64, i64)> {
        let mut start = None;
        let mut end = None;
        let at = pair.clone();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::int_lit if start.is_none() => start = Some(self.int(&inner)?),
                Rule::int_lit => end = Some(self.int(&inner)?),
                Rule::kw_max => end = Some(gdbuf_core::schema::MAX_FIELD_NUMBER),
                _ => {}
            }
        }

        let start = start.ok_or_else(|| self.error(&at, "expected range start"))?;
        Ok((start, end.unwrap_or(start)))
    }

    fn build_enum(&self, pair: Pair<'_, Rule>) -> SchemaResult<EnumDef> {
        let docs = self.docs(&pair, true);
        let mut def = EnumDef::new("");
        def.docs = docs;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::ident => def.name = inner.as_str().to_string(),
                Rule::enum_value => {
                    let value_docs = self.docs(&inner, false);
                    let at = inner.clone();
                    let mut parts = inner.into_inner();
                    let (Some(name), Some(number)) = (parts.next(), parts.next()) else {
                        return Err(self.error(&at, "incomplete enum value"));
                    };
                    def.values.push(EnumValueDef {
                        name: name.as_str().to_string(),
                        number: self.int(&number)?,
                        docs: value_docs,
                    });
                }
                _ => {}
            }
        }

        tracing::debug!("Discovered enum {}", def.name);
        Ok(def)
    }
}

/// Unquoted, unescaped contents of a `string_lit` pair
fn string_value(pair: Pair<'_, Rule>) -> String {
    let raw = pair
        .into_inner()
        .next()
        .map(|p| p.as_str())
        .unwrap_or_default();
    unescape(raw)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Parse a decimal, hex (`0x`) or octal (`0`-prefixed) integer literal
pub(crate) fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

fn from_pest_error(path: &str, error: pest::error::Error<Rule>) -> SchemaError {
    let (line, column) = match error.line_col {
        pest::error::LineColLocation::Pos(pos) => pos,
        pest::error::LineColLocation::Span(start, _) => start,
    };
    let error = error.renamed_rules(|rule| rule_name(*rule).to_string());
    SchemaError::Syntax {
        file: path.to_string(),
        line,
        column,
        detail: error.variant.message().into_owned(),
    }
}

fn rule_name(rule: Rule) -> &'static str {
    match rule {
        Rule::ident | Rule::full_ident => "identifier",
        Rule::type_name => "type name",
        Rule::int_lit => "integer",
        Rule::float_lit => "number",
        Rule::string_lit => "string",
        Rule::constant => "constant",
        Rule::label => "field label",
        Rule::field | Rule::map_field => "field",
        Rule::message_def => "message",
        Rule::enum_def => "enum",
        Rule::enum_value => "enum value",
        Rule::oneof_def => "oneof",
        Rule::option_decl => "option",
        Rule::reserved_decl => "reserved",
        Rule::syntax_decl => "syntax statement",
        Rule::import_decl => "import",
        Rule::package_decl => "package",
        Rule::field_options => "field options",
        Rule::EOI => "end of file",
        _ => "token",
    }
}
