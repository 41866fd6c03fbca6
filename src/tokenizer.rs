use std::iter::FusedIterator;

use crate::PathGrammar;

/// Walks the components of a root-stripped path from either end.
///
/// Empty segments are skipped, and so are `.` segments unless the path is
/// verbatim. Each call consumes from the borrowed slice; build a new
/// tokenizer to scan again.
#[derive(Debug, Clone)]
pub struct PathTokenizer<'a> {
    remaining: &'a str,
    verbatim: bool,
    grammar: PathGrammar,
}

impl<'a> PathTokenizer<'a> {
    pub fn new(grammar: PathGrammar, path: &'a str, verbatim: bool) -> PathTokenizer<'a> {
        let is_sep = |c: char| c.is_ascii() && grammar.is_dir_separator(c as u8, verbatim);
        PathTokenizer {
            remaining: path.trim_matches(is_sep),
            verbatim,
            grammar,
        }
    }

    /// The part of the path not yet consumed.
    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.remaining
    }

    #[inline]
    fn is_sep(&self, b: u8) -> bool {
        self.grammar.is_dir_separator(b, self.verbatim)
    }

    #[inline]
    fn is_skipped(&self, token: &str) -> bool {
        !self.verbatim && token == "."
    }
}

impl<'a> Iterator for PathTokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let remaining = self.remaining;
            let bytes = remaining.as_bytes();
            let start = bytes.iter().position(|&b| !self.is_sep(b))?;
            let end = bytes[start..]
                .iter()
                .position(|&b| self.is_sep(b))
                .map_or(bytes.len(), |p| start + p);

            let token = &remaining[start..end];
            self.remaining = &remaining[end..];
            if !self.is_skipped(token) {
                return Some(token);
            }
        }
    }
}

impl<'a> DoubleEndedIterator for PathTokenizer<'a> {
    fn next_back(&mut self) -> Option<&'a str> {
        loop {
            let remaining = self.remaining;
            let bytes = remaining.as_bytes();
            let end = bytes.iter().rposition(|&b| !self.is_sep(b))? + 1;
            let start = bytes[..end]
                .iter()
                .rposition(|&b| self.is_sep(b))
                .map_or(0, |p| p + 1);

            let token = &remaining[start..end];
            self.remaining = &remaining[..start];
            if !self.is_skipped(token) {
                return Some(token);
            }
        }
    }
}

impl FusedIterator for PathTokenizer<'_> {}

impl PathGrammar {
    /// Tokenizes the part of `path` after its root.
    pub fn tokenize(self, path: &str) -> PathTokenizer<'_> {
        let root = self.classify_root(path);
        PathTokenizer::new(self, &path[root.len()..], root.is_verbatim())
    }
}
