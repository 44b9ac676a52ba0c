use crate::decoder::decode_yaml;
use crate::extractor::FsReader;
use crate::generator::{Generator, Options};
use crate::postprocess::NoopPostProcessor;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// OpenAPI from comments - Build an OpenAPI document from @openapi doc comments and YAML files
#[derive(Parser, Debug)]
#[command(name = "openapi-from-comments")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Glob patterns or paths of the files to scan (appended after the config file's apis)
    #[arg(value_name = "APIS")]
    pub apis: Vec<String>,

    /// Options file (YAML or JSON) holding `definition` and `apis`
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root definition file (YAML or JSON); overrides the config file's definition
    #[arg(short = 'd', long = "definition", value_name = "FILE")]
    pub definition: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Skip the baseline structural validation of the generated document
    #[arg(long = "no-validate")]
    pub no_validate: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if args.config.is_none() && args.definition.is_none() {
        anyhow::bail!("Either --config or --definition must be given");
    }
    if args.config.is_none() && args.apis.is_empty() {
        anyhow::bail!("No API files given. Pass glob patterns or use --config");
    }

    for path in args.config.iter().chain(args.definition.iter()) {
        if !path.is_file() {
            anyhow::bail!("File does not exist: {}", path.display());
        }
    }

    if let Some(ref config) = args.config {
        info!("Config file: {}", config.display());
    }
    if let Some(ref definition) = args.definition {
        info!("Definition file: {}", definition.display());
    }
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Combines the config file, the definition file and the positional patterns.
pub fn build_options(args: &CliArgs) -> Result<Options> {
    let mut options = match &args.config {
        Some(path) => Options::from_file(&FsReader, path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => Options::default(),
    };

    if let Some(path) = &args.definition {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let definition = decode_yaml(&content)
            .with_context(|| format!("Failed to decode definition: {}", path.display()))?;
        options.definition = Some(definition);
    }

    if !args.apis.is_empty() {
        options
            .apis
            .get_or_insert_with(Vec::new)
            .extend(args.apis.iter().cloned());
    }

    Ok(options)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting OpenAPI document generation...");

    // Step 1: Assemble generation options
    let options = build_options(&args)?;
    let pattern_count = options.apis.as_ref().map_or(0, Vec::len);
    info!("Scanning {} API pattern(s)", pattern_count);

    // Step 2: Generate the document
    let generator = if args.no_validate {
        Generator::new().with_post_processor(NoopPostProcessor)
    } else {
        Generator::new()
    };
    let document = generator.generate(options)?;

    let path_count = document
        .get("paths")
        .and_then(|paths| paths.as_object())
        .map_or(0, |paths| paths.len());
    info!("OpenAPI document built with {} path(s)", path_count);

    // Step 3: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}
