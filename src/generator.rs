use crate::decoder::decode_yaml;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::extractor::{parse_api_file, FsReader, SourceReader};
use crate::filter::filter_annotations;
use crate::merger::merge_fragments;
use crate::postprocess::{BaselineValidator, PostProcessor};
use crate::resolver::{resolve_paths, GlobExpander, PathExpander};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Input of one generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Options {
    /// Root definition (`info`, `servers`, ...) that seeds the document
    pub definition: Option<Value>,
    /// Glob patterns or paths of the files to scan, in order
    pub apis: Option<Vec<String>>,
}

impl Options {
    pub fn new(definition: Value, apis: Vec<String>) -> Self {
        Self {
            definition: Some(definition),
            apis: Some(apis),
        }
    }

    /// Interprets a decoded options value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingOption`] for a `null` value and [`Error::InvalidOptions`] if
    /// the fields have the wrong shape.
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Err(Error::MissingOption("options"));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Loads options from a YAML or JSON file holding `definition` and `apis`.
    pub fn from_file(reader: &dyn SourceReader, path: &Path) -> Result<Self> {
        let content = reader.read(path)?;
        let value = decode_yaml(&content).map_err(|e| Error::DecodeError {
            file: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }
}

/// Builds an OpenAPI document from annotated files.
///
/// The generator owns its collaborators: how patterns are expanded, how files are read
/// and what runs on the finished document. [`Generator::new`] wires the filesystem
/// implementations and the [`BaselineValidator`].
///
/// # Example
///
/// ```no_run
/// use openapi_from_comments::generator::{Generator, Options};
/// use serde_json::json;
///
/// let options = Options::new(
///     json!({"info": {"title": "Shop", "version": "1.0.0"}}),
///     vec!["src/routes/*.js".to_string(), "docs/components.yaml".to_string()],
/// );
/// let document = Generator::new().generate(options).unwrap();
/// println!("{} paths", document.get("paths").unwrap().as_object().unwrap().len());
/// ```
pub struct Generator {
    expander: Box<dyn PathExpander>,
    reader: Box<dyn SourceReader>,
    post_processor: Box<dyn PostProcessor>,
}

impl Generator {
    pub fn new() -> Self {
        Self {
            expander: Box::new(GlobExpander),
            reader: Box::new(FsReader),
            post_processor: Box::new(BaselineValidator),
        }
    }

    pub fn with_expander(mut self, expander: impl PathExpander + 'static) -> Self {
        self.expander = Box::new(expander);
        self
    }

    pub fn with_reader(mut self, reader: impl SourceReader + 'static) -> Self {
        self.reader = Box::new(reader);
        self
    }

    pub fn with_post_processor(mut self, post_processor: impl PostProcessor + 'static) -> Self {
        self.post_processor = Box::new(post_processor);
        self
    }

    /// Runs one generation call.
    ///
    /// The definition is normalized into the seed document, every `apis` pattern is
    /// expanded, and each file's YAML document and then its `@openapi` annotations are
    /// merged in file order. The post-processor runs last; if it fails, the error is logged
    /// and the merged document is returned as is.
    ///
    /// # Arguments
    ///
    /// * `options` - The root definition and the `apis` patterns; the definition is consumed
    ///
    /// # Returns
    ///
    /// Returns the merged document, as rewritten by the post-processor when it succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `definition` or `apis` is missing, or the definition is not a mapping
    /// - A pattern is invalid or a file cannot be read
    /// - A YAML file or annotation body does not decode
    /// - A decoded fragment is not a mapping
    ///
    /// # Example
    ///
    /// ```no_run
    /// use openapi_from_comments::generator::{Generator, Options};
    /// use openapi_from_comments::postprocess::NoopPostProcessor;
    /// use serde_json::json;
    ///
    /// let generator = Generator::new().with_post_processor(NoopPostProcessor);
    /// let document = generator
    ///     .generate(Options::new(
    ///         json!({"info": {"title": "Shop", "version": "1.0.0"}}),
    ///         vec!["src/routes/**/*.js".to_string()],
    ///     ))
    ///     .unwrap();
    /// assert_eq!(document.get("openapi").unwrap(), "3.0.0");
    /// ```
    pub fn generate(&self, options: Options) -> Result<Document> {
        let definition = options.definition.ok_or(Error::MissingOption("definition"))?;
        if definition.is_null() {
            return Err(Error::MissingOption("definition"));
        }
        let apis = options.apis.ok_or(Error::MissingOption("apis"))?;

        let mut document = Document::from_definition(definition)?;
        let files = resolve_paths(self.expander.as_ref(), &apis)?;
        info!("Resolved {} API file(s) from {} pattern(s)", files.len(), apis.len());

        for path in &files {
            let mut file = parse_api_file(self.reader.as_ref(), path)?;
            let mut annotations = filter_annotations(path, &file.jsdoc)?;
            debug!(
                "Merging {} YAML and {} annotation fragment(s) from {}",
                file.yaml.len(),
                annotations.len(),
                path.display()
            );
            merge_fragments(&mut document, &mut file.yaml)?;
            merge_fragments(&mut document, &mut annotations)?;
        }

        match self.post_processor.process(&document) {
            Ok(processed) => Ok(processed),
            Err(e) => {
                warn!("Post-processing failed, returning the merged document: {:#}", e);
                Ok(document)
            }
        }
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs [`Generator::generate`] with the default collaborators.
pub fn generate(options: Options) -> Result<Document> {
    Generator::new().generate(options)
}
