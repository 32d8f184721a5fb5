use crate::config::{ErrorPolicy, FilterConfig, RunConfig};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Bulk find-and-replace across a directory tree.
///
/// Every key of the JSON mapping file is searched for in every matching file
/// and replaced with its value. Parentheses and square brackets in keys are
/// matched literally; other regex characters such as `.` or `*` keep their
/// regex meaning.
#[derive(Parser, Debug)]
#[command(
    name = "replacer",
    version,
    about = "Bulk find-and-replace driven by a JSON mapping file",
    disable_help_flag = true,
    after_help = "EXAMPLES:
  replacer --in map.json                      # Replace in the current directory
  replacer --dir src --in map.json --ext rs   # Only .rs files
  replacer --in map.json --notext lock --dry  # Preview, skipping .lock files

Mapping file format (map.json):
  { \"oldName\": \"newName\", \"foo(x)\": \"bar(x)\" }

In replacements, $& inserts the match, $` the text before it, $' the text
after it and $$ a single dollar sign. Files that are not UTF-8 text are skipped."
)]
pub struct Args {
    /// The directory to process.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// JSON file of `search: replacement` pairs.
    #[arg(long = "in", value_name = "FILE.json")]
    pub input: Option<String>,

    /// Search all entries, including hidden files and folders.
    #[arg(long = "all", visible_alias = "a")]
    pub all: bool,

    /// A comma-separated list of allowed extensions.
    #[arg(long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// A comma-separated list of disallowed extensions.
    #[arg(long = "notext", value_delimiter = ',')]
    pub excluded_extensions: Vec<String>,

    /// Preview the changes without modifying any files.
    #[arg(long = "dry", visible_alias = "dry-run")]
    pub dry_run: bool,

    /// Run in debug mode.
    #[arg(long = "debug", visible_alias = "d")]
    pub debug: bool,

    /// What to do when a file or directory cannot be read or written.
    #[arg(long = "on-error", value_enum, default_value_t = ErrorPolicy::Abort)]
    pub on_error: ErrorPolicy,

    /// Show this help.
    #[allow(dead_code)]
    #[arg(short = 'h', long = "help", visible_alias = "h", action = ArgAction::Help)]
    help: Option<bool>,
}

impl Args {
    /// Resolves the parsed flags into the configuration of a run.
    pub fn into_run_config(self) -> RunConfig {
        RunConfig {
            dir: self.dir,
            input: self.input,
            filter: FilterConfig::new(self.all, self.extensions, self.excluded_extensions),
            dry_run: self.dry_run,
            on_error: self.on_error,
            debug: self.debug,
        }
    }
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> RunConfig {
        Args::try_parse_from(std::iter::once("replacer").chain(args.iter().copied()))
            .unwrap()
            .into_run_config()
    }

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--in", "map.json"]);
        assert_eq!(config.dir, PathBuf::from("."));
        assert_eq!(config.input.as_deref(), Some("map.json"));
        assert_eq!(config.filter, FilterConfig::default());
        assert!(!config.dry_run);
        assert!(!config.debug);
        assert_eq!(config.on_error, ErrorPolicy::Abort);
    }

    #[test]
    fn test_short_aliases() {
        let config = parse(&["--in", "m.json", "--a", "--d", "--dry", "--dir", "src"]);
        assert!(config.filter.show_hidden);
        assert!(config.debug);
        assert!(config.dry_run);
        assert_eq!(config.dir, PathBuf::from("src"));
    }

    #[test]
    fn test_extension_lists() {
        let config = parse(&["--in", "m.json", "--ext", "rs,toml", "--notext", "lock"]);
        let allowed: Vec<&str> = config
            .filter
            .allowed_extensions
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(allowed, ["rs", "toml"]);
        assert!(config.filter.disallowed_extensions.contains("lock"));
    }

    #[test]
    fn test_on_error_skip() {
        let config = parse(&["--in", "m.json", "--on-error", "skip"]);
        assert_eq!(config.on_error, ErrorPolicy::Skip);
    }

    #[test]
    fn test_missing_input_is_not_a_parse_error() {
        let config = parse(&[]);
        assert_eq!(config.input, None);
    }

    #[test]
    fn test_help_aliases() {
        for flag in ["--h", "--help", "-h"] {
            let err = Args::try_parse_from(["replacer", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp, "{flag}");
        }
    }
}
