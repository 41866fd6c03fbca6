use crate::PathGrammar;

impl PathGrammar {
    /// Joins path fragments with the primary separator.
    ///
    /// A rooted fragment discards everything accumulated before it, except
    /// once a verbatim root has been seen: from then on later roots are
    /// appended like any other fragment. Empty fragments are ignored.
    pub fn combine<I, S>(self, parts: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut combined = String::new();
        let mut has_verbatim_root = false;
        let mut needs_sep = false;

        for part in parts {
            let part = part.as_ref();
            if part.is_empty() {
                continue;
            }

            let root = self.classify_root(part);
            if root.len() > 0 && !has_verbatim_root {
                combined.clear();
                has_verbatim_root = root.is_verbatim();
            } else if needs_sep {
                combined.push(self.dir_separator());
            }
            combined.push_str(part);

            needs_sep = part
                .as_bytes()
                .last()
                .is_some_and(|&b| !self.is_dir_separator(b, root.is_verbatim()));
        }
        combined
    }
}
