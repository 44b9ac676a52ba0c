//! Serialization module for converting generated documents to YAML or JSON format.
//!
//! This module provides functions to serialize OpenAPI documents into standard formats
//! and write them to files or return them as strings.

use crate::document::Document;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a document to YAML format.
///
/// Keys are emitted in the order they were merged into the document, so the output reads
/// in the same order as the root definition and the annotations it was built from.
///
/// # Arguments
///
/// * `doc` - The generated document to serialize
///
/// # Returns
///
/// Returns the YAML string representation of the document.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use openapi_from_comments::document::Document;
/// use openapi_from_comments::serializer::serialize_yaml;
/// use serde_json::json;
///
/// let doc = Document::from_definition(json!({"info": {"title": "Shop", "version": "1"}})).unwrap();
/// let yaml = serialize_yaml(&doc).unwrap();
/// assert!(yaml.contains("title: Shop"));
/// ```
pub fn serialize_yaml(doc: &Document) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes a document to JSON format with pretty printing.
///
/// The output is indented for readability, which suits human review and version control.
///
/// # Arguments
///
/// * `doc` - The generated document to serialize
///
/// # Returns
///
/// Returns the pretty-printed JSON string representation of the document.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use openapi_from_comments::document::Document;
/// use openapi_from_comments::serializer::serialize_json;
/// use serde_json::json;
///
/// let doc = Document::from_definition(json!({"info": {"title": "Shop", "version": "1"}})).unwrap();
/// let json = serialize_json(&doc).unwrap();
/// assert!(json.contains("\"openapi\": \"3.0.0\""));
/// ```
pub fn serialize_json(doc: &Document) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Writes string content to a file.
///
/// Creates the file and any missing parent directories, or overwrites an existing file.
///
/// # Errors
///
/// Returns an error if the directory or the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
