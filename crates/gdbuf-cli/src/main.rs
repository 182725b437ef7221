//! gdbuf CLI - Protobuf to GDExtension binding generator
//!
//! Commands:
//! - `gdbuf generate` - Generate C++ bindings, docs and the registration manifest
//! - `gdbuf check` - Ingest and validate a schema set without writing anything
//! - `gdbuf inspect` - Print the class registration order

use clap::{Parser, Subcommand};

mod args;
mod generate;
mod logging;

use args::SchemaArgs;

#[derive(Parser)]
#[command(name = "gdbuf")]
#[command(author, version, about = "Generate Godot bindings from protobuf schemas", long_about = None)]
struct Cli {
    /// Log at debug level (overrides the configured log_level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate bindings into the output directory
    Generate {
        #[command(flatten)]
        schema: SchemaArgs,

        /// Output directory for generated files
        #[arg(long, default_value = "genout")]
        genout: String,
    },

    /// Validate a schema set
    Check {
        #[command(flatten)]
        schema: SchemaArgs,
    },

    /// Print the registration order of the generated classes
    Inspect {
        #[command(flatten)]
        schema: SchemaArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let schema_args = match &cli.command {
        Commands::Generate { schema, .. }
        | Commands::Check { schema }
        | Commands::Inspect { schema } => schema,
    };
    let config = schema_args.resolve_config()?;
    logging::init(&config.log_level, cli.verbose);

    match cli.command {
        Commands::Generate { schema, genout } => {
            generate::run(&schema, config, &genout)?;
        }
        Commands::Check { schema } => {
            generate::check(&schema, &config)?;
        }
        Commands::Inspect { schema } => {
            generate::inspect(&schema, config)?;
        }
    }

    Ok(())
}
