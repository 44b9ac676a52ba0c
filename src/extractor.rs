use crate::comment::{find_blocks, AnnotationBlock};
use crate::decoder::decode_yaml;
use crate::error::{Error, Result};
use crate::merger::Fragment;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions whose content is one whole declarative document
pub const DECLARATIVE_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Source of file contents.
///
/// The generator reads every file through this trait so that extraction can run against
/// in-memory fixtures as well as the real filesystem.
pub trait SourceReader {
    /// Reads the whole file as UTF-8 text.
    fn read(&self, path: &Path) -> Result<String>;
}

/// Reads files from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| Error::IoError {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// What one API file contributes before filtering.
#[derive(Debug, Clone, Default)]
pub struct ApiFile {
    /// Path of the file
    pub path: PathBuf,
    /// The decoded document of a YAML file (empty for every other file)
    pub yaml: Vec<Fragment>,
    /// Every doc-comment block of a non-YAML file
    pub jsdoc: Vec<AnnotationBlock>,
}

/// Returns `true` if the path carries one of the [`DECLARATIVE_EXTENSIONS`].
pub fn is_declarative(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DECLARATIVE_EXTENSIONS.contains(&ext))
}

/// Reads one API file and extracts its raw fragments.
///
/// YAML files (`.yaml`, `.yml`) are decoded as a single document. Any other file is scanned
/// for `/** ... */` blocks; a file without blocks yields nothing.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - A YAML file is not well-formed
pub fn parse_api_file(reader: &dyn SourceReader, path: &Path) -> Result<ApiFile> {
    debug!("Extracting fragments from: {}", path.display());

    let content = reader.read(path)?;
    let mut file = ApiFile {
        path: path.to_path_buf(),
        ..ApiFile::default()
    };

    if is_declarative(path) {
        let document = decode_yaml(&content).map_err(|e| Error::DecodeError {
            file: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;
        file.yaml.push(document);
    } else {
        file.jsdoc = find_blocks(&content);
    }

    debug!(
        "Extracted {} YAML document(s) and {} comment block(s) from {}",
        file.yaml.len(),
        file.jsdoc.len(),
        path.display()
    );

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    #[test]
    fn test_parse_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(
            &temp_dir,
            "parameters.yaml",
            "components:\n  parameters:\n    id:\n      name: id\n      in: path\n",
        );

        let file = parse_api_file(&FsReader, &path).unwrap();

        assert_eq!(file.path, path);
        assert!(file.jsdoc.is_empty());
        assert_eq!(
            file.yaml,
            vec![json!({"components": {"parameters": {"id": {"name": "id", "in": "path"}}}})]
        );
    }

    #[test]
    fn test_parse_yml_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(&temp_dir, "tags.yml", "tags:\n  - name: admin\n");

        let file = parse_api_file(&FsReader, &path).unwrap();
        assert_eq!(file.yaml.len(), 1);
    }

    #[test]
    fn test_yaml_comments_are_not_scanned() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(&temp_dir, "doc.yaml", "description: \"/** @openapi */\"\n");

        let file = parse_api_file(&FsReader, &path).unwrap();
        assert!(file.jsdoc.is_empty());
        assert_eq!(file.yaml.len(), 1);
    }

    #[test]
    fn test_parse_source_file_blocks() {
        let temp_dir = TempDir::new().unwrap();
        let code = r#"
/**
 * @openapi
 * /health:
 *   get:
 *     responses:
 *       '200':
 *         description: up
 */
export function health(req, res) {}

/** Plain documentation. */
export const VERSION = '1';
"#;
        let path = create_temp_file(&temp_dir, "health.ts", code);

        let file = parse_api_file(&FsReader, &path).unwrap();

        assert!(file.yaml.is_empty());
        assert_eq!(file.jsdoc.len(), 2);
        assert_eq!(file.jsdoc[0].tags[0].title, "openapi");
        assert!(file.jsdoc[1].tags.is_empty());
    }

    #[test]
    fn test_source_file_without_blocks() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(&temp_dir, "util.js", "// nothing to see\nmodule.exports = {};\n");

        let file = parse_api_file(&FsReader, &path).unwrap();
        assert!(file.yaml.is_empty());
        assert!(file.jsdoc.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_file(&temp_dir, "broken.yaml", "paths:\n  /x: [unclosed\n");

        let err = parse_api_file(&FsReader, &path).unwrap_err();
        match err {
            Error::DecodeError { file, .. } => assert_eq!(file, path),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = parse_api_file(&FsReader, Path::new("/nonexistent/routes.js")).unwrap_err();
        assert!(matches!(err, Error::IoError { .. }));
        assert!(err.to_string().contains("/nonexistent/routes.js"));
    }

    #[test]
    fn test_is_declarative() {
        assert!(is_declarative(Path::new("api/openapi.yaml")));
        assert!(is_declarative(Path::new("api/openapi.yml")));
        assert!(!is_declarative(Path::new("api/openapi.json")));
        assert!(!is_declarative(Path::new("api/routes.js")));
        assert!(!is_declarative(Path::new("api/yaml")));
    }
}
