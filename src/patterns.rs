use crate::errors::InputFileError;
use regex::{Match, Regex};
use std::borrow::Cow;

/// Characters escaped before a mapping key is compiled.
///
/// Only brackets and parentheses are escaped. Every other regex metacharacter
/// keeps its meaning, so `a.b` also matches `axb`.
const ESCAPED: [char; 4] = ['(', ')', '[', ']'];

/// Turns a mapping key into the pattern source that gets compiled.
pub fn escape_pattern(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for c in key.chars() {
        if ESCAPED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One compiled `key -> replacement` entry.
#[derive(Debug, Clone)]
pub struct Rule {
    key: String,
    regex: Regex,
    replacement: String,
}

impl Rule {
    pub fn new(key: String, replacement: String) -> Result<Self, InputFileError> {
        let regex = Regex::new(&escape_pattern(&key)).map_err(|source| InputFileError::Pattern {
            key: key.clone(),
            source,
        })?;
        Ok(Self {
            key,
            regex,
            replacement,
        })
    }

    /// The key exactly as it appeared in the mapping file.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// The text that replaces `m`, a match found in `haystack`.
    ///
    /// `$$` inserts a dollar sign, `$&` the matched text, `` $` `` the text
    /// before the match and `$'` the text after it. Any other `$` is kept as
    /// is; keys cannot contain capture groups, so `$1` stays literal.
    pub fn expand<'a>(&'a self, haystack: &'a str, m: &Match<'_>) -> Cow<'a, str> {
        if !self.replacement.contains('$') {
            return Cow::Borrowed(&self.replacement);
        }

        let mut expanded = String::with_capacity(self.replacement.len());
        let mut chars = self.replacement.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '$' {
                expanded.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => expanded.push('$'),
                Some('&') => expanded.push_str(&haystack[m.range()]),
                Some('`') => expanded.push_str(&haystack[..m.start()]),
                Some('\'') => expanded.push_str(&haystack[m.end()..]),
                _ => {
                    expanded.push('$');
                    continue;
                }
            }
            chars.next();
        }
        Cow::Owned(expanded)
    }
}

/// The ordered set of rules applied to every file.
///
/// Rules run in the order the keys appeared in the mapping file, each one
/// seeing the output of the rules before it.
#[derive(Debug, Clone, Default)]
pub struct ReplacementMapping {
    rules: Vec<Rule>,
}

impl ReplacementMapping {
    /// Compiles `(key, replacement)` pairs, keeping their order.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, InputFileError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let rules = pairs
            .into_iter()
            .map(|(key, replacement)| Rule::new(key, replacement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
