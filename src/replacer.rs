use crate::config::{ErrorPolicy, MappingLoader, RunConfig};
use crate::errors::{Error, Result};
use crate::output_formatter::OutputFormatter;
use crate::patterns::ReplacementMapping;
use crate::walker;
use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Core engine for finding and replacing patterns in files.
///
/// A `Replacer` owns the compiled mapping and applies every rule, in order, to
/// each file it is given.
pub struct Replacer {
    mapping: ReplacementMapping,
}

/// Options for processing a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// If `true`, changes will be calculated but not written to disk.
    pub dry_run: bool,
}

/// The result of processing a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementResult {
    pub file: PathBuf,
    /// Matches found across all rules.
    pub num_matches: usize,
    /// Matches whose text differed from the replacement.
    pub num_replacements: usize,
    /// `true` if the file was (or, in a dry run, would be) modified.
    pub has_changed: bool,
}

/// What a whole run did.
#[derive(Debug)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub results: Vec<ReplacementResult>,
}

/// The results of a batch, plus the error that stopped it early, if any.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<ReplacementResult>,
    pub aborted: Option<Error>,
}

impl Replacer {
    pub fn new(mapping: ReplacementMapping) -> Self {
        Self { mapping }
    }

    /// Applies every rule to `content`.
    ///
    /// Returns the new content with the number of matches and replacements.
    /// A match that already equals its replacement is counted as a match only.
    pub fn process_content<'a>(&self, content: &'a str) -> (Cow<'a, str>, usize, usize) {
        let mut new_content = Cow::Borrowed(content);
        let mut num_matches = 0;
        let mut num_replacements = 0;

        for rule in self.mapping.rules() {
            let haystack = new_content.as_ref();
            let mut output = String::with_capacity(haystack.len());
            let mut last = 0;
            let mut replaced = 0;

            for m in rule.regex().find_iter(haystack) {
                num_matches += 1;
                let replacement = rule.expand(haystack, &m);
                if m.as_str() != replacement {
                    replaced += 1;
                }
                output.push_str(&haystack[last..m.start()]);
                output.push_str(&replacement);
                last = m.end();
            }

            if replaced > 0 {
                output.push_str(&haystack[last..]);
                num_replacements += replaced;
                new_content = Cow::Owned(output);
            }
        }

        (new_content, num_matches, num_replacements)
    }

    /// Processes a single file, applying all configured replacements.
    ///
    /// Files that are not valid UTF-8 are not text and yield `None`. If
    /// anything was replaced and `dry_run` is false, the new content is written
    /// back to the file atomically.
    pub fn process_file(
        &self,
        path: &Path,
        options: ProcessOptions,
    ) -> Result<Option<ReplacementResult>> {
        let bytes = fs::read(path).map_err(|e| Error::processing(path, e))?;
        let Ok(content) = String::from_utf8(bytes) else {
            debug!("{} is not UTF-8 text, skipping", path.display());
            return Ok(None);
        };

        let (new_content, num_matches, num_replacements) = self.process_content(&content);
        let has_changed = num_replacements > 0;

        if has_changed && !options.dry_run {
            write_atomically(path, new_content.as_ref())?;
        }

        Ok(Some(ReplacementResult {
            file: path.to_path_buf(),
            num_matches,
            num_replacements,
            has_changed,
        }))
    }

    /// Processes `files` one after another.
    ///
    /// A failing file either stops the batch or is skipped, depending on
    /// `on_error`. Files rewritten before an abort are left as they are and
    /// their results are kept in the outcome.
    pub fn run(&self, files: &[PathBuf], options: ProcessOptions, on_error: ErrorPolicy) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            results: Vec::with_capacity(files.len()),
            aborted: None,
        };
        for path in files {
            match self.process_file(path, options) {
                Ok(Some(result)) => {
                    debug!(
                        "{}: {} matches, {} replacements",
                        path.display(),
                        result.num_matches,
                        result.num_replacements
                    );
                    outcome.results.push(result);
                }
                Ok(None) => {}
                Err(err) => {
                    if let Err(err) = on_error.recover(err) {
                        outcome.aborted = Some(err);
                        break;
                    }
                }
            }
        }
        outcome
    }
}

/// Writes `content` to `path` through a temp file in the same directory.
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Err(format!("Could not get parent directory for {}", path.display()).into());
    };

    let rewrite = || -> io::Result<()> {
        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;

        // Preserve file permissions
        let perms = fs::metadata(path)?.permissions();
        fs::set_permissions(temp_file.path(), perms)?;

        temp_file.persist(path)?;
        Ok(())
    };
    rewrite().map_err(|e| Error::processing(path, e))
}

/// Writes the report for `outcome`, then hands back its abort error if it has one.
///
/// The report always covers the files processed so far, so an aborted run
/// still shows what it changed.
pub fn finish_batch<W: Write>(
    outcome: BatchOutcome,
    files_scanned: usize,
    dry_run: bool,
    out: &mut W,
) -> Result<RunSummary> {
    let files_changed = OutputFormatter::new(dry_run).write_output(out, &outcome.results)?;
    if let Some(err) = outcome.aborted {
        return Err(err);
    }
    Ok(RunSummary {
        files_scanned,
        files_changed,
        results: outcome.results,
    })
}

/// The main entry point of a run.
///
/// This function orchestrates the entire replacement process:
/// 1. It loads the mapping file. Nothing is touched if that fails.
/// 2. It walks the target directory to find all files to be processed.
/// 3. It processes the files sequentially.
/// 4. It writes the per-file report and summary to `out`.
pub fn run_replace<W: Write>(config: &RunConfig, out: &mut W) -> Result<RunSummary> {
    let mapping = MappingLoader::load(config.input.as_deref(), &config.dir)?;

    debug!("directory: {}", config.dir.display());
    debug!("show hidden: {}", config.filter.show_hidden);
    debug!("extensions: {:?}", config.filter.allowed_extensions);
    debug!("disallowed extensions: {:?}", config.filter.disallowed_extensions);
    for rule in mapping.rules() {
        debug!("rule: {:?} -> {:?}", rule.regex().as_str(), rule.replacement());
    }

    let files = walker::walk(&config.dir, &config.filter, config.on_error)?;

    let options = ProcessOptions {
        dry_run: config.dry_run,
    };
    let outcome = Replacer::new(mapping).run(&files, options, config.on_error);

    finish_batch(outcome, files.len(), config.dry_run, out)
}
