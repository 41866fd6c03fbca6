//! Path-string manipulation for two path grammars at once.
//!
//! Every operation works on the string alone: nothing here touches the
//! filesystem except [`PathContext::canonicalize`] and the Windows flavour of
//! [`PathContext::full_path`], which delegate to a [`SystemResolver`].
//!
//! ```
//! use path_grammar::PathGrammar;
//!
//! let posix = PathGrammar::Posix;
//! assert_eq!(posix.extension("/srv/www/index.html"), Some("html"));
//! assert_eq!(posix.combine(["x", "/y", "z"]), "/y/z");
//!
//! let windows = PathGrammar::Windows;
//! assert_eq!(windows.root(r"C:\Users\me").unwrap(), Some(r"C:\"));
//! assert!(!windows.is_fully_qualified("C:foo"));
//! ```

mod combine;
mod compare;
mod components;
mod context;
mod error;
pub mod posix;
#[cfg(test)]
mod proptests;
mod system;
mod tokenizer;
#[cfg(feature = "url")]
mod url;
mod validate;
pub mod windows;

use std::borrow::Cow;

pub use compare::compare;
pub use components::PathComponents;
pub use context::{PathContext, PathContextBuilder, DEFAULT_FILE_NAME_TEMPLATE};
pub use error::{PathError, Result, SystemError};
pub use system::{
    Clock, OsResolver, RandomSource, SystemClock, SystemResolver, XorShiftRandom,
};
pub use tokenizer::PathTokenizer;
#[cfg(feature = "url")]
pub use crate::url::PathToUrlError;

/// Separator of the grammar this crate was built for.
pub const DIR_SEPARATOR: char = PathGrammar::NATIVE.dir_separator();
/// Alternate separator of the native grammar; equal to [`DIR_SEPARATOR`] on POSIX.
pub const ALT_DIR_SEPARATOR: char = PathGrammar::NATIVE.alt_separator();
/// Separator between entries of a search-path list such as `PATH`.
pub const PATH_LIST_SEPARATOR: char = PathGrammar::NATIVE.path_list_separator();

/// The shape of a path's root prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    None,
    /// A single leading separator: `/` on POSIX, `\` or `/` on Windows.
    Separator,
    /// `C:`
    DriveRelative,
    /// `C:\`
    DriveAbsolute,
    /// `\\server\share\`
    Unc,
    /// `\\.\device\`, including `\\.\UNC\server\share\`
    Device,
    /// `\\?\anything\`
    Verbatim,
    /// `\\?\UNC\server\share\`
    VerbatimUnc,
}

impl RootKind {
    #[inline]
    pub fn is_verbatim(&self) -> bool {
        matches!(*self, RootKind::Verbatim | RootKind::VerbatimUnc)
    }
}

/// A classified root: its kind and its length in bytes from the start of the
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Root {
    kind: RootKind,
    len: usize,
}

impl Root {
    #[inline]
    pub(crate) fn new(kind: RootKind, len: usize) -> Root {
        Root { kind, len }
    }

    #[inline]
    pub fn kind(&self) -> RootKind {
        self.kind
    }

    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Verbatim roots turn off `/` as a separator and all `.`/`..` handling.
    #[inline]
    pub fn is_verbatim(&self) -> bool {
        self.kind.is_verbatim()
    }
}

/// One of the two supported path grammars.
///
/// The grammar is an ordinary value so that callers, and tests, can work with
/// Windows paths on a POSIX host and the other way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathGrammar {
    Posix,
    Windows,
}

impl Default for PathGrammar {
    fn default() -> Self {
        PathGrammar::NATIVE
    }
}

impl PathGrammar {
    #[cfg(windows)]
    pub const NATIVE: PathGrammar = PathGrammar::Windows;
    #[cfg(not(windows))]
    pub const NATIVE: PathGrammar = PathGrammar::Posix;

    pub const fn dir_separator(self) -> char {
        match self {
            PathGrammar::Posix => posix::DIR_SEPARATOR,
            PathGrammar::Windows => windows::DIR_SEPARATOR,
        }
    }

    pub const fn alt_separator(self) -> char {
        match self {
            PathGrammar::Posix => posix::ALT_DIR_SEPARATOR,
            PathGrammar::Windows => windows::ALT_DIR_SEPARATOR,
        }
    }

    pub const fn path_list_separator(self) -> char {
        match self {
            PathGrammar::Posix => posix::PATH_LIST_SEPARATOR,
            PathGrammar::Windows => windows::PATH_LIST_SEPARATOR,
        }
    }

    /// Whether `b` separates components. `verbatim` only matters on Windows,
    /// where it turns `/` back into an ordinary character.
    #[inline]
    pub fn is_dir_separator(self, b: u8, verbatim: bool) -> bool {
        match self {
            PathGrammar::Posix => posix::is_posix_sep(b as char),
            PathGrammar::Windows => windows::is_separator(b as char, verbatim),
        }
    }

    pub fn classify_root(self, path: &str) -> Root {
        match self {
            PathGrammar::Posix => posix::classify_posix_root(path),
            PathGrammar::Windows => windows::classify_windows_root(path),
        }
    }

    /// Length of the root prefix and whether it is verbatim.
    #[inline]
    pub fn root_length(self, path: &str) -> (usize, bool) {
        let root = self.classify_root(path);
        (root.len(), root.is_verbatim())
    }

    pub fn is_verbatim(self, path: &str) -> bool {
        match self {
            PathGrammar::Posix => false,
            PathGrammar::Windows => windows::is_verbatim(path),
        }
    }

    pub fn is_rooted(self, path: &str) -> bool {
        self.classify_root(path).len() > 0
    }

    /// Whether resolving `path` is independent of any current directory or
    /// current drive. `C:foo` is rooted but not fully qualified.
    pub fn is_fully_qualified(self, path: &str) -> bool {
        match self {
            PathGrammar::Posix => self.is_rooted(path),
            PathGrammar::Windows => windows::is_fully_qualified(path),
        }
    }

    pub fn is_absolute(self, path: &str) -> bool {
        match self {
            PathGrammar::Posix => self.is_rooted(path),
            PathGrammar::Windows => windows::is_absolute(path),
        }
    }

    pub fn is_normalized(self, path: &str) -> bool {
        match self {
            PathGrammar::Posix => posix::is_normalized(path),
            PathGrammar::Windows => windows::is_normalized(path),
        }
    }

    /// Rewrites alternate separators to the primary one and collapses
    /// separator runs. `.` and `..` are left alone, as are verbatim paths.
    ///
    /// Already-normalized input is returned borrowed.
    pub fn normalize(self, path: &str) -> Cow<'_, str> {
        match self {
            PathGrammar::Posix => posix::normalize(path),
            PathGrammar::Windows => windows::normalize(path),
        }
    }

    pub fn is_valid_path_char(self, c: char) -> bool {
        match self {
            PathGrammar::Posix => posix::is_valid_path_char(c),
            PathGrammar::Windows => windows::is_valid_path_char(c),
        }
    }

    pub fn is_valid_file_name_char(self, c: char) -> bool {
        match self {
            PathGrammar::Posix => posix::is_valid_file_name_char(c),
            PathGrammar::Windows => windows::is_valid_file_name_char(c),
        }
    }
}
