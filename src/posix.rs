use std::borrow::Cow;

use crate::{Root, RootKind};

pub const DIR_SEPARATOR: char = '/';
pub const ALT_DIR_SEPARATOR: char = '/';
pub const PATH_LIST_SEPARATOR: char = ':';

const SEP: u8 = DIR_SEPARATOR as u8;

#[inline]
pub fn is_posix_sep(c: char) -> bool {
    c == DIR_SEPARATOR
}

pub fn classify_posix_root(path: &str) -> Root {
    if path.starts_with(DIR_SEPARATOR) {
        Root::new(RootKind::Separator, 1)
    } else {
        Root::new(RootKind::None, 0)
    }
}

pub fn is_normalized(path: &str) -> bool {
    !path.as_bytes().windows(2).any(|w| w[0] == SEP && w[1] == SEP)
}

pub fn normalize(path: &str) -> Cow<'_, str> {
    if is_normalized(path) {
        return Cow::Borrowed(path);
    }

    let mut normalized = String::with_capacity(path.len());
    let mut skip_sep = false;
    for c in path.chars() {
        if !is_posix_sep(c) {
            normalized.push(c);
            skip_sep = false;
        } else if !skip_sep {
            normalized.push(c);
            skip_sep = true;
        }
    }
    Cow::Owned(normalized)
}

/// Collapses `.`, `..` and repeated separators in a rooted path.
///
/// `..` never rewinds past the root, and a walk that consumes everything
/// after the root leaves the root itself.
pub fn collapse_dots(path: &str, root_len: usize) -> String {
    debug_assert!(root_len > 0);

    let bytes = path.as_bytes();
    let len = bytes.len();
    // the root's trailing separator is re-emitted by the walk below
    let skip = if bytes[root_len - 1] == SEP {
        root_len - 1
    } else {
        root_len
    };

    let mut resolved = String::with_capacity(len);
    resolved.push_str(&path[..skip]);

    let mut i = skip;
    while i < len {
        if bytes[i] != SEP {
            let end = bytes[i..]
                .iter()
                .position(|&b| b == SEP)
                .map_or(len, |p| i + p);
            resolved.push_str(&path[i..end]);
            i = end;
            continue;
        }

        if i + 1 < len {
            // "//"
            if bytes[i + 1] == SEP {
                i += 1;
                continue;
            }

            // "/./" or trailing "/."
            if bytes[i + 1] == b'.' && (i + 2 == len || bytes[i + 2] == SEP) {
                i += 2;
                continue;
            }

            // "/../" or trailing "/.."
            if i + 2 < len
                && bytes[i + 1] == b'.'
                && bytes[i + 2] == b'.'
                && (i + 3 == len || bytes[i + 3] == SEP)
            {
                let rewind = resolved
                    .as_bytes()
                    .get(root_len..)
                    .and_then(|tail| tail.iter().rposition(|&b| b == SEP))
                    .map_or(skip, |p| root_len + p);
                resolved.truncate(rewind.max(skip));
                i += 3;
                continue;
            }
        }

        resolved.push(DIR_SEPARATOR);
        i += 1;
    }

    if skip != root_len && resolved.len() < root_len {
        resolved.push_str(&path[skip..root_len]);
    }
    resolved
}

pub fn is_valid_path_char(c: char) -> bool {
    c != '\0'
}

pub fn is_valid_file_name_char(c: char) -> bool {
    c != '\0' && c != DIR_SEPARATOR
}
