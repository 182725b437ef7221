//! Command implementations

use crate::args::SchemaArgs;
use anyhow::Result;
use gdbuf_codegen::{Generation, Generator};
use gdbuf_core::{GeneratorConfig, Schema};
use std::path::Path;

/// Generate command implementation
pub fn run(args: &SchemaArgs, config: GeneratorConfig, genout: &str) -> Result<()> {
    let schema = args.load_schema(&config)?;
    let extension = config.extension_name.clone();
    let generation = Generator::new(config).generate(&schema)?;
    let written = generation.output.write_to(Path::new(genout))?;

    print_schema_summary(&schema);
    println!("✓ Classes: {}", generation.classes.len());
    println!("✓ Wrote {written} files to {genout}");
    println!("\nGenerated extension {extension}");

    Ok(())
}

/// Check command implementation
///
/// Runs the whole pipeline so naming collisions are reported too, but writes
/// nothing.
pub fn check(args: &SchemaArgs, config: &GeneratorConfig) -> Result<()> {
    let schema = args.load_schema(config)?;
    Generator::new(config.clone()).generate(&schema)?;

    print_schema_summary(&schema);
    println!("\nSchema is valid!");

    Ok(())
}

/// Inspect command implementation
pub fn inspect(args: &SchemaArgs, config: GeneratorConfig) -> Result<()> {
    let schema = args.load_schema(&config)?;
    let generation = Generator::new(config).generate(&schema)?;

    println!(
        "Registration order (level {}):",
        generation.table.level()
    );
    for line in registration_lines(&generation) {
        println!("{line}");
    }

    Ok(())
}

/// One numbered line per registration step
pub fn registration_lines(generation: &Generation) -> Vec<String> {
    generation
        .table
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut line = format!("{:>4}. {}", index + 1, entry.qualified_name);
            if entry.header_first {
                line.push_str(" (header-first)");
            }
            if !entry.forward_refs.is_empty() {
                line.push_str(&format!(" -> {}", entry.forward_refs.join(", ")));
            }
            line
        })
        .collect()
}

fn print_schema_summary(schema: &Schema) {
    println!("✓ Files: {}", schema.files().len());
    println!("✓ Messages: {}", schema.message_count());
    println!("✓ Enums: {}", schema.enum_count());
}

#[cfg(test)]
#[path = "generate/generate_tests.rs"]
mod generate_tests;
