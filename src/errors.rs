use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in the `replacer` application.
///
/// This enum uses `thiserror` to wrap the kinds of errors that can occur, from
/// I/O issues while walking the tree to problems with the mapping file.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The mapping file given with `--in` could not be used.
    #[error("Input file error: {0}")]
    InputFile(#[from] InputFileError),

    /// A general configuration-related error.
    #[error("Config error: {0}")]
    Config(String),

    /// An error that occurred during the processing of a single file.
    #[error("File processing failed for {path}: {source}")]
    Processing {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error from the `walkdir` crate.
    #[error("Walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

/// Everything that can go wrong before a single file is touched.
#[derive(Error, Debug)]
pub enum InputFileError {
    #[error("no input file given, use --in <file.json>")]
    Missing,

    #[error("'{0}' does not reference a .json file")]
    NotJson(String),

    #[error("input file '{}' not found. Searched in:\n  - {}", .path.display(), .searched.join("\n  - "))]
    NotFound { path: PathBuf, searched: Vec<String> },

    #[error("could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Only strings, numbers and booleans can be used as replacements.
    #[error("value for key '{key}' must be a string, number or boolean")]
    UnsupportedValue { key: String },

    #[error("invalid pattern for key '{key}': {source}")]
    Pattern { key: String, source: regex::Error },
}

/// A convenient type alias for `Result<T, replacer::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps an error raised while reading or rewriting `path`.
    pub fn processing<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Processing {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
