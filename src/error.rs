use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    /// A mandatory option (`options`, `definition` or `apis`) was not supplied
    MissingOption(&'static str),
    /// The options value could not be interpreted
    InvalidOptions(String),
    /// The root definition is not a mapping
    InvalidDefinition(String),
    IoError { path: PathBuf, source: std::io::Error },
    InvalidPattern { pattern: String, message: String },
    /// A declarative document or annotation body failed to decode
    DecodeError {
        file: PathBuf,
        line: Option<usize>,
        message: String,
    },
    /// A fragment handed to the merger is not a mapping
    InvalidFragment { index: usize, found: &'static str },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MissingOption(name) => write!(f, "'{}' is required", name),
            Error::InvalidOptions(msg) => write!(f, "Invalid options: {}", msg),
            Error::InvalidDefinition(msg) => write!(f, "Invalid definition: {}", msg),
            Error::IoError { path, source } => {
                write!(f, "IO error on {}: {}", path.display(), source)
            }
            Error::InvalidPattern { pattern, message } => {
                write!(f, "Invalid path pattern '{}': {}", pattern, message)
            }
            Error::DecodeError {
                file,
                line: Some(line),
                message,
            } => write!(f, "Decode error {}:{}: {}", file.display(), line, message),
            Error::DecodeError {
                file,
                line: None,
                message,
            } => write!(f, "Decode error {}: {}", file.display(), message),
            Error::InvalidFragment { index, found } => write!(
                f,
                "Fragment #{} must be a mapping, found {}",
                index, found
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidOptions(err.to_string())
    }
}
