//! OpenAPI from comments - OpenAPI documents assembled from doc-comment annotations.
//!
//! Route authors keep the OpenAPI description next to the handler, inside a `/** ... */`
//! block tagged `@openapi` (or the legacy `@swagger`). This library collects those
//! annotations, together with whole YAML files, and merges them onto a root definition to
//! produce one OpenAPI 3.0 document.
//!
//! # Architecture
//!
//! The library is organized into several modules that work together:
//!
//! 1. [`resolver`] - Expands glob patterns into the list of files to scan
//! 2. [`extractor`] - Reads each file: YAML files whole, other files as comment blocks
//! 3. [`comment`] - Splits `/** ... */` blocks into `@tag` records
//! 4. [`filter`] - Keeps `@openapi` / `@swagger` tags and decodes their YAML bodies
//! 5. [`document`] - The document type and the normalization of the root definition
//! 6. [`merger`] - Folds fragments into the document under per-key merge policies
//! 7. [`postprocess`] - Validates the finished document
//! 8. [`generator`] - Runs the whole pipeline for one set of options
//! 9. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_comments::{
//!     generator::{generate, Options},
//!     serializer::serialize_yaml,
//! };
//! use serde_json::json;
//!
//! let options = Options::new(
//!     json!({"info": {"title": "Example app", "version": "1.0.0"}}),
//!     vec!["./routes/*.js".to_string(), "./parameters.yaml".to_string()],
//! );
//! let document = generate(options).unwrap();
//!
//! let yaml = serialize_yaml(&document).unwrap();
//! println!("{}", yaml);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod comment;
pub mod decoder;
pub mod document;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod generator;
pub mod merger;
pub mod postprocess;
pub mod resolver;
pub mod serializer;

pub use document::Document;
pub use error::{Error, Result};
pub use generator::{generate, Generator, Options};
