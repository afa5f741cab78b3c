//! CLI entry point: renders a serializer tree (JSON) as hypermedia XML using
//! a mapping file.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use xml_api_serializer::{Mapper, Node, XmlTransformer};

#[derive(Parser, Debug)]
#[command(name = "xml-api-serializer")]
#[command(
    author,
    version,
    about = "Render object trees as hypermedia XML documents"
)]
struct Args {
    /// Mapping file (YAML or JSON); omit for an empty registry
    #[arg(short, long, env = "XML_API_MAPPINGS")]
    mappings: Option<PathBuf>,

    /// Input tree file (JSON or YAML); reads JSON from stdin when omitted
    input: Option<PathBuf>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print an example mapping file and exit.
    #[arg(long)]
    example_mappings: bool,

    /// Validate the mapping file and exit.
    #[arg(long)]
    validate: bool,
}

fn print_example_mappings() {
    let example = r#"# Mapping file example
# One entry per class emitted in `@type` markers.
- class: "Acme\\Domain\\Post"
  # Public alias, usable as a URL template placeholder
  alias: "Message"
  # Property renames, original -> output
  aliased_properties:
    title: headline
    content: body
  # Properties removed from the output
  hide_properties: []
  # Identifier properties, in declaration order
  id_properties:
    - postId
  urls:
    # Mandatory
    self: "http://example.com/posts/{postId}"
    # Optional relations, emitted in order
    comments: "http://example.com/posts/{postId}/comments"
"#;
    println!("{}", example);
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    if args.example_mappings {
        print_example_mappings();
        return Ok(());
    }

    // Load the mapping registry
    let mapper = if let Some(path) = &args.mappings {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping file: {}", path.display()))?;
        if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            Mapper::from_yaml(&content)?
        } else {
            Mapper::from_json(&content)?
        }
    } else {
        Mapper::default()
    };

    if args.validate {
        info!(mappings = mapper.len(), "Mapping file is valid");
        return Ok(());
    }

    // Read the input tree
    let input = if let Some(path) = &args.input {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?
    } else {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read input from stdin")?;
        buffer
    };

    let yaml_input = args
        .input
        .as_ref()
        .is_some_and(|path| path.extension().is_some_and(|e| e == "yaml" || e == "yml"));
    let tree = if yaml_input {
        serde_yaml::from_str::<Node>(&input).context("Input is not valid YAML")?
    } else {
        let value: serde_json::Value =
            serde_json::from_str(&input).context("Input is not valid JSON")?;
        Node::from(value)
    };

    let transformer = XmlTransformer::new(mapper);
    let xml = transformer
        .serialize(&tree)
        .context("Failed to serialize input tree")?;

    println!("{}", xml);

    Ok(())
}
