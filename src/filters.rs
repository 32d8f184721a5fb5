//! Pure predicates deciding which directory entries take part in a run.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::Path;

/// Returns the part of the file name after its last `.`.
///
/// Names without a dot, and leading-dot names such as `.bashrc`, have the empty
/// extension. Case is kept as is.
pub fn extension_of(path: &Path) -> Cow<'_, str> {
    path.extension()
        .map(OsStr::to_string_lossy)
        .unwrap_or(Cow::Borrowed(""))
}

/// True if `allowed` is empty or contains the extension of `path`.
pub fn is_allowed(path: &Path, allowed: &BTreeSet<String>) -> bool {
    allowed.is_empty() || allowed.contains(extension_of(path).as_ref())
}

/// True if `disallowed` is empty or does not contain the extension of `path`,
/// i.e. the file should be kept.
pub fn is_not_disallowed(path: &Path, disallowed: &BTreeSet<String>) -> bool {
    disallowed.is_empty() || !disallowed.contains(extension_of(path).as_ref())
}

/// An entry is hidden when its name is a dot followed by anything but another dot.
pub fn is_hidden(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    let mut chars = name.chars();
    chars.next() == Some('.') && chars.next().is_some_and(|c| c != '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_lists_accept_everything() {
        let empty = BTreeSet::new();
        for name in ["a.txt", "Makefile", ".bashrc", "dir/b.tar.gz", "c."] {
            let path = Path::new(name);
            assert!(is_allowed(path, &empty), "{name}");
            assert!(is_not_disallowed(path, &empty), "{name}");
        }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a/b/c.txt")), "txt");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), "gz");
        assert_eq!(extension_of(Path::new("README")), "");
        assert_eq!(extension_of(Path::new(".bashrc")), "");
        assert_eq!(extension_of(Path::new("Upper.MD")), "MD");
    }

    #[test]
    fn test_allow_list() {
        let allowed = set(&["txt", "rs"]);
        assert!(is_allowed(Path::new("a.txt"), &allowed));
        assert!(is_allowed(Path::new("/abs/main.rs"), &allowed));
        assert!(!is_allowed(Path::new("b.md"), &allowed));
        // matching is case sensitive
        assert!(!is_allowed(Path::new("c.TXT"), &allowed));
    }

    #[test]
    fn test_deny_list() {
        let disallowed = set(&["lock"]);
        assert!(!is_not_disallowed(Path::new("Cargo.lock"), &disallowed));
        assert!(is_not_disallowed(Path::new("Cargo.toml"), &disallowed));
    }

    #[test]
    fn test_no_extension_matches_only_empty_entry() {
        let path = Path::new("Makefile");
        assert!(!is_allowed(path, &set(&["txt"])));
        assert!(is_allowed(path, &set(&["txt", ""])));
        assert!(is_not_disallowed(path, &set(&["txt"])));
        assert!(!is_not_disallowed(path, &set(&[""])));
    }

    #[test]
    fn test_allowed_and_disallowed_excludes() {
        let path = Path::new("notes.txt");
        let both = set(&["txt"]);
        assert!(!(is_allowed(path, &both) && is_not_disallowed(path, &both)));
    }

    #[test]
    fn test_hidden_names() {
        assert!(is_hidden(OsStr::new(".git")));
        assert!(is_hidden(OsStr::new(".env.local")));
        assert!(!is_hidden(OsStr::new(".")));
        assert!(!is_hidden(OsStr::new("..")));
        assert!(!is_hidden(OsStr::new("..cache")));
        assert!(!is_hidden(OsStr::new("visible.txt")));
    }
}
