use crate::errors::{Error, Result};
use crate::replacer::ReplacementResult;
use std::io::{self, Write};

/// Exit status of a run that ended in an error.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Formats the outcome of a run as plain text.
pub struct OutputFormatter {
    dry_run: bool,
}

impl OutputFormatter {
    /// Creates a new `OutputFormatter`.
    ///
    /// # Arguments
    ///
    /// * `dry_run` - Whether the run only simulated its changes, which only
    ///   affects the wording of the summary line.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Writes one line per changed file followed by the summary.
    ///
    /// Unchanged files are left out entirely. Returns the number of changed files.
    ///
    /// # Arguments
    ///
    /// * `writer` - The `Write` target (e.g., `stdout` or a buffer).
    /// * `results` - The per-file results, in processing order.
    pub fn write_output<W: Write>(&self, writer: &mut W, results: &[ReplacementResult]) -> Result<usize> {
        let mut changed = 0;
        for line in results.iter().filter_map(format_entry) {
            writeln!(writer, "{line}")?;
            changed += 1;
        }

        writeln!(writer)?;
        writeln!(writer, "{}", self.format_summary(changed))?;
        writer.flush()?;

        Ok(changed)
    }

    /// The closing line, e.g. `3 files changed`.
    pub fn format_summary(&self, changed: usize) -> String {
        if self.dry_run {
            format!("{changed} files to be changed")
        } else {
            format!("{changed} files changed")
        }
    }
}

/// `<file name>: <n> replacements` for a changed file, `None` otherwise.
pub fn format_entry(result: &ReplacementResult) -> Option<String> {
    if !result.has_changed {
        return None;
    }
    let name = result
        .file
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| result.file.to_string_lossy());
    Some(format!("{}: {} replacements", name, result.num_replacements))
}

/// Reports a failed run and returns the exit status to use.
///
/// Mapping file problems print the fixed `Error: Input file error` line to
/// `out`, followed by the cause when `debug` is set. Anything else is written
/// to `err_out` with its full message.
pub fn report_error<O: Write, E: Write>(err: &Error, debug: bool, out: &mut O, err_out: &mut E) -> i32 {
    let written = match err {
        Error::InputFile(detail) => write_input_error(out, detail, debug),
        _ => writeln!(err_out, "Error: {err}").and_then(|_| err_out.flush()),
    };
    if let Err(e) = written {
        tracing::warn!("could not report error: {e}");
    }
    FAILURE_EXIT_CODE
}

fn write_input_error<W: Write>(out: &mut W, detail: &impl std::fmt::Display, debug: bool) -> io::Result<()> {
    writeln!(out, "Error: Input file error")?;
    if debug {
        writeln!(out)?;
        writeln!(out, "{detail}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InputFileError;
    use std::path::PathBuf;

    fn create_test_results() -> Vec<ReplacementResult> {
        vec![
            ReplacementResult {
                file: PathBuf::from("/work/src/main.rs"),
                num_matches: 3,
                num_replacements: 3,
                has_changed: true,
            },
            ReplacementResult {
                file: PathBuf::from("/work/README.md"),
                num_matches: 1,
                num_replacements: 0,
                has_changed: false,
            },
            ReplacementResult {
                file: PathBuf::from("/work/lib/util.rs"),
                num_matches: 1,
                num_replacements: 1,
                has_changed: true,
            },
        ]
    }

    #[test]
    fn test_text_output() {
        let formatter = OutputFormatter::new(false);
        let mut out: Vec<u8> = Vec::new();

        let changed = formatter.write_output(&mut out, &create_test_results()).unwrap();

        assert_eq!(changed, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "main.rs: 3 replacements\nutil.rs: 1 replacements\n\n2 files changed\n"
        );
    }

    #[test]
    fn test_dry_run_summary() {
        let formatter = OutputFormatter::new(true);
        let mut out: Vec<u8> = Vec::new();

        formatter.write_output(&mut out, &[]).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "\n0 files to be changed\n");
    }

    #[test]
    fn test_unchanged_entry_is_omitted() {
        let results = create_test_results();
        assert_eq!(format_entry(&results[1]), None);
        assert_eq!(format_entry(&results[0]).as_deref(), Some("main.rs: 3 replacements"));
    }

    #[test]
    fn test_input_error_message() {
        let err = Error::from(InputFileError::NotJson("map.yaml".to_string()));
        let (mut out, mut err_out): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());

        let code = report_error(&err, false, &mut out, &mut err_out);

        assert_eq!(code, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "Error: Input file error\n");
        assert!(err_out.is_empty());
    }

    #[test]
    fn test_input_error_detail_in_debug() {
        let err = Error::from(InputFileError::Missing);
        let (mut out, mut err_out): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());

        report_error(&err, true, &mut out, &mut err_out);

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error: Input file error\n\nno input file given, use --in <file.json>\n"
        );
    }

    #[test]
    fn test_other_errors_go_to_err_out() {
        let err = Error::from("disk full");
        let (mut out, mut err_out): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());

        let code = report_error(&err, false, &mut out, &mut err_out);

        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err_out).unwrap(),
            "Error: Config error: disk full\n"
        );
    }
}
