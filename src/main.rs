//! OpenAPI from comments - Command-line tool for generating OpenAPI documentation.
//!
//! Collects `@openapi` (or legacy `@swagger`) annotations from doc comments and whole YAML
//! files, merges them onto a root definition and writes the resulting OpenAPI 3.0 document.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-comments [OPTIONS] [APIS]...
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-from-comments -d definition.yaml 'src/routes/*.js' components.yaml -o openapi.yaml
//! ```
//!
//! Generate JSON documentation from an options file:
//! ```bash
//! openapi-from-comments -c openapi.config.yaml -f json -o openapi.json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! openapi-from-comments -c openapi.config.yaml -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_comments::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI from comments starting...");

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
