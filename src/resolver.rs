use crate::error::{Error, Result};
use glob::MatchOptions;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions collected when an `apis` entry names a directory
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "yaml", "yml", "js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx", "coffee", "java", "kt",
    "scala", "groovy", "php", "go", "rs", "c", "h", "cc", "cpp", "hpp", "cs", "swift", "dart",
];

/// Expands one `apis` entry into concrete file paths.
pub trait PathExpander {
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// Expands glob patterns against the local filesystem.
///
/// A pattern without wildcards works as a literal path. Wildcards do not match a leading
/// dot, so hidden files are only picked up when the pattern spells the dot out. A pattern
/// naming an existing
/// directory is scanned recursively for files with one of the [`SOURCE_EXTENSIONS`],
/// skipping hidden entries, `target` and `node_modules`.
///
/// # Example
///
/// ```no_run
/// use openapi_from_comments::resolver::{GlobExpander, PathExpander};
///
/// let files = GlobExpander.expand("src/routes/**/*.js").unwrap();
/// println!("Found {} files", files.len());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobExpander;

impl PathExpander for GlobExpander {
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let path = Path::new(pattern);
        if path.is_dir() {
            return Ok(scan_directory(path));
        }

        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        let entries = glob::glob_with(pattern, options).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(path) => debug!("Skipping non-file match: {}", path.display()),
                Err(e) => warn!("Failed to access path: {}", e),
            }
        }
        Ok(files)
    }
}

fn scan_directory(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Don't filter the root directory itself
            if e.path() == root {
                return true;
            }
            let file_name = e.file_name().to_string_lossy();
            !file_name.starts_with('.') && file_name != "target" && file_name != "node_modules"
        })
    {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                let supported = path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
                if entry.file_type().is_file() && supported {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => warn!("Failed to access path: {}", e),
        }
    }

    files
}

/// Expands every pattern in order and concatenates the results.
///
/// Files matched by more than one pattern appear once per match; patterns that match
/// nothing contribute nothing.
///
/// # Arguments
///
/// * `expander` - Strategy that turns one pattern into file paths
/// * `patterns` - The `apis` entries, in the order they were given
///
/// # Returns
///
/// Returns the matched files, pattern by pattern, in the expander's order.
///
/// # Errors
///
/// Propagates the first expansion error, e.g. an invalid glob pattern.
///
/// # Example
///
/// ```no_run
/// use openapi_from_comments::resolver::{resolve_paths, GlobExpander};
///
/// let patterns = vec!["src/routes/*.js".to_string(), "docs".to_string()];
/// let files = resolve_paths(&GlobExpander, &patterns).unwrap();
/// for file in &files {
///     println!("{}", file.display());
/// }
/// ```
pub fn resolve_paths(expander: &dyn PathExpander, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let matched = expander.expand(pattern)?;
        if matched.is_empty() {
            debug!("No files matched: {}", pattern);
        } else {
            debug!("Pattern {} matched {} file(s)", pattern, matched.len());
        }
        files.extend(matched);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    fn pattern(root: &Path, suffix: &str) -> String {
        root.join(suffix).to_string_lossy().to_string()
    }

    #[test]
    fn test_expand_wildcard() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("users.js"), "").unwrap();
        fs::write(root.join("auth.js"), "").unwrap();
        fs::write(root.join("readme.md"), "").unwrap();

        let files = GlobExpander.expand(&pattern(root, "*.js")).unwrap();

        assert_eq!(file_names(&files), vec!["auth.js", "users.js"]);
    }

    #[test]
    fn test_expand_wildcard_skips_hidden_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.js"), "").unwrap();
        fs::write(root.join(".eslintrc.js"), "").unwrap();

        let files = GlobExpander.expand(&pattern(root, "*.js")).unwrap();
        assert_eq!(file_names(&files), vec!["a.js"]);

        let files = GlobExpander.expand(&pattern(root, ".*.js")).unwrap();
        assert_eq!(file_names(&files), vec![".eslintrc.js"]);
    }

    #[test]
    fn test_expand_literal_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("openapi.yaml"), "").unwrap();

        let files = GlobExpander.expand(&pattern(root, "openapi.yaml")).unwrap();
        assert_eq!(files, vec![root.join("openapi.yaml")]);
    }

    #[test]
    fn test_expand_no_match_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = GlobExpander.expand(&pattern(temp_dir.path(), "*.ts")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_expand_skips_matched_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("a.js"), "").unwrap();

        let files = GlobExpander.expand(&pattern(root, "*")).unwrap();
        assert_eq!(file_names(&files), vec!["a.js"]);
    }

    #[test]
    fn test_expand_invalid_pattern() {
        let err = GlobExpander.expand("routes/***.js").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_expand_directory_recursively() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("routes/admin")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join("routes/users.js"), "").unwrap();
        fs::write(root.join("routes/admin/audit.ts"), "").unwrap();
        fs::write(root.join("routes/logo.png"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(root.join(".cache/old.js"), "").unwrap();
        fs::write(root.join("openapi.yaml"), "").unwrap();

        let files = GlobExpander.expand(&root.to_string_lossy()).unwrap();

        assert_eq!(file_names(&files), vec!["openapi.yaml", "audit.ts", "users.js"]);
    }

    #[test]
    fn test_resolve_keeps_order_and_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.js"), "").unwrap();
        fs::write(root.join("b.yaml"), "").unwrap();

        let patterns = vec![
            pattern(root, "*.yaml"),
            pattern(root, "*.js"),
            pattern(root, "missing/*.js"),
            pattern(root, "a.js"),
        ];
        let files = resolve_paths(&GlobExpander, &patterns).unwrap();

        assert_eq!(file_names(&files), vec!["b.yaml", "a.js", "a.js"]);
    }

    #[test]
    fn test_resolve_with_custom_expander() {
        struct Fixed;
        impl PathExpander for Fixed {
            fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>> {
                Ok(vec![PathBuf::from(format!("{}.1", pattern)), PathBuf::from(format!("{}.2", pattern))])
            }
        }

        let files = resolve_paths(&Fixed, &["x".to_string(), "y".to_string()]).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("x.1"),
                PathBuf::from("x.2"),
                PathBuf::from("y.1"),
                PathBuf::from("y.2")
            ]
        );
    }
}
