use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rollabi_generator::Generator;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum EmptySchemaAction {
    Deny,
    Warn,
    Allow,
}

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Log debug output to stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct SchemaArgs {
    #[arg(value_parser, help = "The schema file or URL")]
    pub input: String,

    #[arg(
        long,
        default_value = "deny",
        value_enum,
        help = "What to do with a schema without reports, advances or inspects"
    )]
    pub empty_schema: EmptySchemaAction,
}

#[derive(Subcommand)]
pub enum Command {
    /// Checks a schema and lists the signature and selector of every message
    Check {
        #[command(flatten)]
        schema: SchemaArgs,
    },
    /// Generates the Contract ABI JSON or Rust bindings of a schema
    Generate {
        #[command(flatten)]
        schema: SchemaArgs,

        #[arg(long, default_value = "rust", value_enum)]
        target: Generator,

        #[arg(long, help = "Wrap the Rust bindings in `pub mod <MODULE>`")]
        module: Option<String>,

        #[arg(short, long, help = "Write to this file instead of stdout")]
        output: Option<PathBuf>,
    },
    /// Encodes a message from JSON arguments and prints the payload as hex
    Pack {
        #[command(flatten)]
        schema: SchemaArgs,

        #[arg(help = "Name of the report, advance or inspect")]
        message: String,

        #[arg(help = "Arguments as a JSON object keyed by field name, or a JSON array")]
        args: String,
    },
    /// Decodes a hex payload into its message name and JSON arguments
    Unpack {
        #[command(flatten)]
        schema: SchemaArgs,

        #[arg(help = "The payload as hex, with or without 0x")]
        payload: String,
    },
}
