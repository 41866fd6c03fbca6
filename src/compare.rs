use std::cmp::Ordering;

use crate::PathGrammar;

/// Orders by length first, then ASCII case-insensitively.
///
/// Strings of different lengths never compare equal, which is what the
/// component matchers rely on. This is not a lexicographic order: `"b"`
/// sorts before `"aa"`.
pub fn compare(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
    })
}

#[inline]
fn same(a: &str, b: &str) -> bool {
    compare(a, b) == Ordering::Equal
}

impl PathGrammar {
    /// Component-wise, ASCII case-insensitive prefix test. Roots must match
    /// exactly (modulo case), so a relative prefix never matches a rooted path.
    pub fn starts_with(self, path: &str, prefix: &str) -> bool {
        if path.is_empty() || prefix.is_empty() {
            return path.len() == prefix.len();
        }

        let path_root = self.classify_root(path);
        let prefix_root = self.classify_root(prefix);
        if !same(&path[..path_root.len()], &prefix[..prefix_root.len()]) {
            return false;
        }

        let mut path_tokens = self.tokenize(path);
        let mut prefix_tokens = self.tokenize(prefix);
        loop {
            match (path_tokens.next(), prefix_tokens.next()) {
                (_, None) => return true,
                (None, Some(_)) => return false,
                (Some(a), Some(b)) if same(a, b) => (),
                (Some(_), Some(_)) => return false,
            }
        }
    }

    /// Component-wise, ASCII case-insensitive suffix test. A rooted `suffix`
    /// must also carry the same root as `path`.
    pub fn ends_with(self, path: &str, suffix: &str) -> bool {
        if path.is_empty() || suffix.is_empty() {
            return suffix.is_empty();
        }

        let suffix_root = self.classify_root(suffix);
        if suffix_root.len() > 0 {
            let path_root = self.classify_root(path);
            if !same(&path[..path_root.len()], &suffix[..suffix_root.len()]) {
                return false;
            }
        }

        let mut path_tokens = self.tokenize(path);
        let mut suffix_tokens = self.tokenize(suffix);
        loop {
            match (path_tokens.next_back(), suffix_tokens.next_back()) {
                (_, None) => return true,
                (None, Some(_)) => return false,
                (Some(a), Some(b)) if same(a, b) => (),
                (Some(_), Some(_)) => return false,
            }
        }
    }
}
