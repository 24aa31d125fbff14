mod cli;
mod input;

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use rollabi_abi::json;
use rollabi_generator::GeneratorOptions;
use rollabi_schema::{read_schema, Schema};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, SchemaArgs};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_schema(args: &SchemaArgs) -> Result<Schema> {
    let document = input::read_input(&args.input)?;
    let empty_schema = match args.empty_schema {
        cli::EmptySchemaAction::Deny => rollabi_schema::EmptySchemaAction::Deny,
        cli::EmptySchemaAction::Warn => rollabi_schema::EmptySchemaAction::Warn,
        cli::EmptySchemaAction::Allow => rollabi_schema::EmptySchemaAction::Allow,
    };
    let schema = read_schema(&document, empty_schema)
        .with_context(|| format!("invalid schema {}", args.input))?;
    info!(
        structs = schema.structs.len(),
        messages = schema.message_count(),
        "loaded schema"
    );
    Ok(schema)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check { schema } => {
            let schema = load_schema(&schema)?;
            let registry = rollabi_generator::build_registry(&schema)?;
            for (category, message) in schema.messages() {
                let spec = registry
                    .by_name(&message.name)
                    .context("message missing from registry")?;
                println!("{category:<8} {} {}", spec.selector(), spec.signature());
            }
        }
        Command::Generate {
            schema,
            target,
            module,
            output,
        } => {
            let schema = load_schema(&schema)?;
            let code = target.generate(&schema, &GeneratorOptions { module })?;
            match output {
                Some(path) => fs::write(&path, code)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{code}"),
            }
        }
        Command::Pack {
            schema,
            message,
            args,
        } => {
            let schema = load_schema(&schema)?;
            let registry = rollabi_generator::build_registry(&schema)?;
            let spec = registry
                .by_name(&message)
                .ok_or_else(|| rollabi_abi::Error::UnknownMessage(message.clone()))?;
            let args: serde_json::Value =
                serde_json::from_str(&args).context("arguments are not valid JSON")?;
            let values = json::args_from_json(spec.params(), &args)?;
            let payload = spec.pack(&values)?;
            println!("0x{}", hex::encode(payload));
        }
        Command::Unpack { schema, payload } => {
            let schema = load_schema(&schema)?;
            let registry = rollabi_generator::build_registry(&schema)?;
            let payload = input::parse_payload(&payload)?;
            let (spec, values) = registry.unpack(&payload)?;
            let args = json::args_to_json(spec.params(), &values)?;
            let decoded = serde_json::json!({
                "message": spec.name(),
                "args": args,
            });
            println!("{decoded:#}");
        }
    }
    Ok(())
}
