//! Selection of OpenAPI annotations among decoded comment blocks.

use crate::comment::AnnotationBlock;
use crate::decoder::decode_yaml;
use crate::error::{Error, Result};
use crate::merger::Fragment;
use log::debug;
use std::path::Path;

/// Tag titles that mark an OpenAPI annotation: the primary marker and its legacy alias
pub const ANNOTATION_TAGS: [&str; 2] = ["openapi", "swagger"];

/// Decodes the body of every `@openapi` / `@swagger` tag into a fragment.
///
/// Order follows the blocks, then the tags inside each block. Tags with other titles are
/// ignored.
///
/// # Errors
///
/// Returns [`Error::DecodeError`] for the first annotation whose body is not valid YAML.
/// `file` only serves to locate that annotation in the message.
pub fn filter_annotations(file: &Path, blocks: &[AnnotationBlock]) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();

    for block in blocks {
        for tag in &block.tags {
            if !ANNOTATION_TAGS.contains(&tag.title.as_str()) {
                continue;
            }
            let fragment = decode_yaml(&tag.description).map_err(|e| Error::DecodeError {
                file: file.to_path_buf(),
                line: Some(block.line),
                message: format!("@{} annotation: {}", tag.title, e),
            })?;
            fragments.push(fragment);
        }
    }

    debug!(
        "Selected {} annotation(s) from {}",
        fragments.len(),
        file.display()
    );
    Ok(fragments)
}
