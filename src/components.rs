use std::borrow::Cow;

use crate::{PathGrammar, Result, RootKind};

/// Byte offsets that split a path into root, parent directory, file name and
/// extension.
///
/// `root_len <= dir_len <= file_offset <= path.len()`. `ext_offset` is `0` when
/// there is no extension and otherwise points just past the `.` that starts
/// it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathComponents {
    pub root_len: usize,
    pub dir_len: usize,
    pub file_offset: usize,
    pub ext_offset: usize,
    pub verbatim: bool,
}

impl PathGrammar {
    pub fn split_path(self, path: &str) -> PathComponents {
        if path.is_empty() {
            return PathComponents::default();
        }

        let bytes = path.as_bytes();
        let (root_len, verbatim) = self.root_length(path);
        let is_sep = |b: u8| self.is_dir_separator(b, verbatim);

        // the byte right after the root never ends the directory part
        let file_offset = bytes
            .get(root_len + 1..)
            .and_then(|tail| tail.iter().rposition(|&b| is_sep(b)))
            .map_or(root_len, |p| root_len + 1 + p + 1);

        let mut dir_len = file_offset;
        while dir_len > root_len && is_sep(bytes[dir_len - 1]) {
            dir_len -= 1;
        }

        // dots in the first two bytes of the file name never start an extension
        let ext_offset = match bytes[file_offset..].iter().rposition(|&b| b == b'.') {
            Some(p) if p > 1 => file_offset + p + 1,
            _ => 0,
        };

        PathComponents {
            root_len,
            dir_len,
            file_offset,
            ext_offset,
            verbatim,
        }
    }

    /// The extension without its leading `.`; `None` when absent or empty.
    pub fn extension(self, path: &str) -> Option<&str> {
        let components = self.split_path(path);
        if components.ext_offset == 0 || components.ext_offset == path.len() {
            return None;
        }
        Some(&path[components.ext_offset..])
    }

    /// Unlike [`extension`](Self::extension), a trailing `.` counts.
    pub fn has_extension(self, path: &str) -> bool {
        self.split_path(path).ext_offset != 0
    }

    /// Replaces the extension, or removes it when `ext` is empty. `ext` may be
    /// given with or without its leading `.`.
    pub fn set_extension<'a>(self, path: &'a str, ext: &str) -> Cow<'a, str> {
        let components = self.split_path(path);
        if path.is_empty() || components.file_offset == path.len() {
            return Cow::Borrowed(path);
        }

        let stem_len = match components.ext_offset {
            0 => path.len(),
            offset => offset - 1,
        };
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        if ext.is_empty() {
            return Cow::Borrowed(&path[..stem_len]);
        }

        let mut buf = String::with_capacity(stem_len + ext.len() + 1);
        buf.push_str(&path[..stem_len]);
        buf.push('.');
        buf.push_str(ext);
        Cow::Owned(buf)
    }

    /// The root prefix, `None` when the path is relative.
    pub fn root(self, path: &str) -> Result<Option<&str>> {
        self.check_path(path)?;
        let root_len = self.classify_root(path).len();
        Ok((root_len > 0).then(|| &path[..root_len]))
    }

    /// Swaps the root of a rooted path. A `None` or empty `root` strips it.
    /// Relative paths are returned unchanged.
    pub fn set_root<'a>(self, path: &'a str, root: Option<&'a str>) -> Result<Cow<'a, str>> {
        self.check_path(path)?;
        if let Some(root) = root {
            self.check_path(root)?;
        }

        let root_len = self.classify_root(path).len();
        let root = root.unwrap_or_default();
        if root_len == path.len() && !root.is_empty() {
            return Ok(Cow::Borrowed(root));
        }
        if root_len == 0 {
            return Ok(Cow::Borrowed(path));
        }

        let rest = &path[root_len..];
        if root.is_empty() {
            return Ok(Cow::Borrowed(rest));
        }
        Ok(Cow::Owned(self.join_pair(root, rest)))
    }

    /// The directory part of `path`, without trailing separators. `None` for
    /// root-only paths and for bare file names.
    pub fn parent(self, path: &str) -> Option<&str> {
        let components = self.split_path(path);
        if components.root_len == path.len() || components.dir_len == 0 {
            return None;
        }
        Some(&path[..components.dir_len])
    }

    /// Replaces everything before the file name with `parent`.
    pub fn set_parent<'a>(self, path: &'a str, parent: &'a str) -> Cow<'a, str> {
        let components = self.split_path(path);
        let file_name = &path[components.file_offset..];
        if file_name.is_empty() {
            Cow::Borrowed(parent)
        } else if parent.is_empty() {
            Cow::Borrowed(file_name)
        } else {
            Cow::Owned(self.join_pair(parent, file_name))
        }
    }

    pub fn file_name(self, path: &str) -> Option<&str> {
        let file_offset = self.split_path(path).file_offset;
        if file_offset == path.len() {
            return None;
        }
        Some(&path[file_offset..])
    }

    /// Replaces the file name, or removes it when `file_name` is empty.
    pub fn set_file_name<'a>(self, path: &'a str, file_name: &'a str) -> Cow<'a, str> {
        let file_offset = self.split_path(path).file_offset;
        if file_offset == 0 {
            Cow::Borrowed(file_name)
        } else if file_name.is_empty() {
            Cow::Borrowed(&path[..file_offset])
        } else {
            Cow::Owned(self.join_file_name(&path[..file_offset], file_name))
        }
    }

    /// The file name without its extension.
    pub fn file_stem(self, path: &str) -> Option<&str> {
        let components = self.split_path(path);
        if components.file_offset == path.len() {
            return None;
        }
        let stem_end = match components.ext_offset {
            0 => path.len(),
            offset => offset - 1,
        };
        Some(&path[components.file_offset..stem_end])
    }

    /// Replaces the file stem and keeps the extension.
    pub fn set_file_stem<'a>(self, path: &'a str, file_stem: &str) -> Cow<'a, str> {
        let components = self.split_path(path);
        let head = &path[..components.file_offset];
        let ext = match components.ext_offset {
            0 => "",
            offset => &path[offset - 1..],
        };

        let mut buf = String::with_capacity(head.len() + file_stem.len() + ext.len() + 1);
        buf.push_str(head);
        if !head.is_empty() && !self.ends_with_separator(head) && !self.is_drive_prefix(head) {
            buf.push(self.dir_separator());
        }
        buf.push_str(file_stem);
        buf.push_str(ext);
        Cow::Owned(buf)
    }

    /// Splits into the directory part and the file name. A root-only path
    /// comes back whole in the first slot.
    pub fn split(self, path: &str) -> (Option<&str>, Option<&str>) {
        if path.is_empty() {
            return (None, None);
        }
        let components = self.split_path(path);
        let dir = (components.dir_len > 0).then(|| &path[..components.dir_len]);
        let file = (components.file_offset < path.len()).then(|| &path[components.file_offset..]);
        (dir, file)
    }

    /// Whether the byte at a 1-based `index` is a separator. Negative indexes
    /// count from the end, `-1` being the last byte.
    pub fn is_separator(self, path: &str, index: isize) -> bool {
        let len = path.len();
        let position = if index > 0 {
            index.unsigned_abs()
        } else if index == 0 || index.unsigned_abs() > len {
            1
        } else {
            len + 1 - index.unsigned_abs()
        };
        match path.as_bytes().get(position - 1) {
            Some(&b) => self.is_dir_separator(b, self.is_verbatim(path)),
            None => false,
        }
    }

    /// Drops one trailing separator unless it belongs to the root.
    pub fn trim_ending_separator(self, path: &str) -> &str {
        let root = self.classify_root(path);
        if path.len() == root.len() {
            return path;
        }
        match path.as_bytes().last() {
            Some(&b) if self.is_dir_separator(b, root.is_verbatim()) => &path[..path.len() - 1],
            _ => path,
        }
    }

    pub fn ends_with_separator(self, path: &str) -> bool {
        match path.as_bytes().last() {
            Some(&b) => self.is_dir_separator(b, self.is_verbatim(path)),
            None => false,
        }
    }

    /// Whether `head` is nothing but a drive-relative root such as `C:`.
    fn is_drive_prefix(self, head: &str) -> bool {
        let root = self.classify_root(head);
        root.kind() == RootKind::DriveRelative && root.len() == head.len()
    }

    /// Like [`join_pair`](Self::join_pair), but a bare `C:` head stays
    /// drive-relative.
    fn join_file_name(self, head: &str, file_name: &str) -> String {
        if self.is_drive_prefix(head) {
            let mut buf = String::with_capacity(head.len() + file_name.len());
            buf.push_str(head);
            buf.push_str(file_name);
            return buf;
        }
        self.join_pair(head, file_name)
    }

    /// `head` + separator + `tail`, skipping the separator when `head` already
    /// ends with one.
    pub(crate) fn join_pair(self, head: &str, tail: &str) -> String {
        let mut buf = String::with_capacity(head.len() + tail.len() + 1);
        buf.push_str(head);
        if !self.ends_with_separator(head) {
            buf.push(self.dir_separator());
        }
        buf.push_str(tail);
        buf
    }
}
