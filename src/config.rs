use crate::errors::{Error, InputFileError, Result};
use crate::filters::{is_allowed, is_not_disallowed};
use crate::patterns::ReplacementMapping;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Decides which files the directory walk hands to the replacer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Include entries whose name starts with a dot.
    pub show_hidden: bool,
    /// Extensions to include. Empty means every extension.
    pub allowed_extensions: BTreeSet<String>,
    /// Extensions to skip. Empty means none are skipped.
    pub disallowed_extensions: BTreeSet<String>,
}

impl FilterConfig {
    pub fn new<A, D>(show_hidden: bool, allowed: A, disallowed: D) -> Self
    where
        A: IntoIterator<Item = String>,
        D: IntoIterator<Item = String>,
    {
        Self {
            show_hidden,
            allowed_extensions: allowed.into_iter().collect(),
            disallowed_extensions: disallowed.into_iter().collect(),
        }
    }

    /// A file is accepted when it is allowed AND not disallowed.
    pub fn accepts(&self, path: &Path) -> bool {
        is_allowed(path, &self.allowed_extensions)
            && is_not_disallowed(path, &self.disallowed_extensions)
    }
}

/// What to do when a single directory entry or file fails.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the whole run. Files already rewritten stay rewritten.
    #[default]
    Abort,
    /// Log a warning and carry on with the next entry.
    Skip,
}

impl ErrorPolicy {
    /// Applies the policy to `err`: `Abort` hands it back, `Skip` swallows it.
    pub fn recover(self, err: impl Into<Error>) -> Result<()> {
        let err = err.into();
        match self {
            ErrorPolicy::Abort => Err(err),
            ErrorPolicy::Skip => {
                warn!("{err}, skipping");
                Ok(())
            }
        }
    }
}

/// Everything one invocation needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The directory to process.
    pub dir: PathBuf,
    /// The `--in` argument as given by the user.
    pub input: Option<String>,
    pub filter: FilterConfig,
    pub dry_run: bool,
    pub on_error: ErrorPolicy,
    pub debug: bool,
}

impl RunConfig {
    pub fn new(dir: impl Into<PathBuf>, input: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            input: Some(input.into()),
            filter: FilterConfig::default(),
            dry_run: false,
            on_error: ErrorPolicy::default(),
            debug: false,
        }
    }
}

/// Loads the JSON mapping file that drives a run.
pub struct MappingLoader;

impl MappingLoader {
    /// Finds the mapping file named by `input`.
    ///
    /// The search order is:
    /// 1. The path as given (absolute, or relative to the current directory).
    /// 2. A path relative to `working_dir`, the directory being processed.
    pub fn find_input(input: &Path, working_dir: &Path) -> std::result::Result<PathBuf, InputFileError> {
        if input.is_file() {
            return Ok(input.to_path_buf());
        }

        let in_working_dir = working_dir.join(input);
        if !input.is_absolute() && in_working_dir.is_file() {
            return Ok(in_working_dir);
        }

        let mut searched = vec![input.display().to_string()];
        if !input.is_absolute() {
            searched.push(in_working_dir.display().to_string());
        }
        Err(InputFileError::NotFound {
            path: input.to_path_buf(),
            searched,
        })
    }

    /// Resolves, reads and compiles the mapping referenced by `input`.
    ///
    /// `input` must contain `.json`; anything else is rejected before the
    /// filesystem is consulted.
    pub fn load(
        input: Option<&str>,
        working_dir: &Path,
    ) -> std::result::Result<ReplacementMapping, InputFileError> {
        let input = input.ok_or(InputFileError::Missing)?;
        if !input.contains(".json") {
            return Err(InputFileError::NotJson(input.to_string()));
        }

        let path = Self::find_input(Path::new(input), working_dir)?;
        let text = fs::read_to_string(&path).map_err(|source| InputFileError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&path, &text)
    }

    /// Parses the text of a mapping file. `path` is only used in error messages.
    pub fn parse(path: &Path, text: &str) -> std::result::Result<ReplacementMapping, InputFileError> {
        let raw: IndexMap<String, Value> =
            serde_json::from_str(text).map_err(|source| InputFileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let pairs = raw
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key, s)),
                Value::Number(n) => Ok((key, n.to_string())),
                Value::Bool(b) => Ok((key, b.to_string())),
                _ => Err(InputFileError::UnsupportedValue { key }),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        ReplacementMapping::from_pairs(pairs)
    }
}
