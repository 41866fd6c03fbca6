use crate::{PathError, PathGrammar, Result};

/// Longest path accepted by the validated operations.
pub(crate) const MAX_PATH_LEN: usize = i32::MAX as usize;

impl PathGrammar {
    /// `true` when `path` consists only of spaces, including the zero-length
    /// path.
    pub fn is_empty(self, path: &str) -> bool {
        path.bytes().all(|b| b == b' ')
    }

    pub fn is_valid_path(self, path: &str) -> bool {
        path.chars().all(|c| self.is_valid_path_char(c))
    }

    pub fn is_valid_file_name(self, path: &str) -> bool {
        path.chars().all(|c| self.is_valid_file_name_char(c))
    }

    /// Rejects over-long paths and paths with invalid characters. Zero-length
    /// input passes.
    pub(crate) fn check_path(self, path: &str) -> Result<()> {
        if path.len() > MAX_PATH_LEN {
            log::debug!("rejecting path of {} bytes", path.len());
            return Err(PathError::TooLong { len: path.len() });
        }
        if !self.is_valid_path(path) {
            log::debug!("rejecting invalid path {path:?}");
            return Err(PathError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(())
    }

    /// [`check_path`](Self::check_path) for optional arguments, which must
    /// also be non-empty when present.
    pub(crate) fn check_opt_path(self, path: Option<&str>) -> Result<()> {
        match path {
            None => Ok(()),
            Some(p) if self.is_empty(p) => {
                log::debug!("rejecting empty path {p:?}");
                Err(PathError::EmptyPath)
            }
            Some(p) => self.check_path(p),
        }
    }
}
