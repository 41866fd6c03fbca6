use crate::{
    posix, Clock, OsResolver, PathError, PathGrammar, RandomSource, Result, SystemClock,
    SystemResolver, XorShiftRandom,
};

/// Template used by [`PathContext::random_file_name`] when none is given.
pub const DEFAULT_FILE_NAME_TEMPLATE: &str = "rndXXXXXXXX";

const FILE_NAME_CHARS: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A grammar together with the outside services some operations need: the
/// OS resolver for full and canonical paths, a clock and a random source.
pub struct PathContext {
    grammar: PathGrammar,
    resolver: Box<dyn SystemResolver + Send + Sync>,
    clock: Box<dyn Clock + Send + Sync>,
    random: Box<dyn RandomSource + Send + Sync>,
}

impl std::fmt::Debug for PathContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathContext")
            .field("grammar", &self.grammar)
            .finish_non_exhaustive()
    }
}

impl Default for PathContext {
    fn default() -> Self {
        PathContext::builder().build()
    }
}

#[derive(Default)]
pub struct PathContextBuilder {
    grammar: Option<PathGrammar>,
    resolver: Option<Box<dyn SystemResolver + Send + Sync>>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    random: Option<Box<dyn RandomSource + Send + Sync>>,
}

impl PathContextBuilder {
    pub fn grammar(mut self, grammar: PathGrammar) -> Self {
        self.grammar = Some(grammar);
        self
    }

    pub fn resolver<R>(mut self, resolver: R) -> Self
    where
        R: SystemResolver + Send + Sync + 'static,
    {
        self.resolver = Some(Box::new(resolver));
        self
    }

    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn random<G>(mut self, random: G) -> Self
    where
        G: RandomSource + Send + Sync + 'static,
    {
        self.random = Some(Box::new(random));
        self
    }

    /// Fills the gaps with the native grammar, [`OsResolver`] and
    /// [`SystemClock`]; without an explicit random source one is seeded from
    /// the clock.
    pub fn build(self) -> PathContext {
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(SystemClock::new()));
        let random = self
            .random
            .unwrap_or_else(|| Box::new(XorShiftRandom::from_clock(clock.as_ref())));
        PathContext {
            grammar: self.grammar.unwrap_or(PathGrammar::NATIVE),
            resolver: self.resolver.unwrap_or_else(|| Box::new(OsResolver)),
            clock,
            random,
        }
    }
}

impl PathContext {
    pub fn builder() -> PathContextBuilder {
        PathContextBuilder::default()
    }

    pub fn new(grammar: PathGrammar) -> PathContext {
        PathContext::builder().grammar(grammar).build()
    }

    #[inline]
    pub fn grammar(&self) -> PathGrammar {
        self.grammar
    }

    #[inline]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Makes `path` absolute, collapsing `.` and `..` on POSIX.
    ///
    /// A relative `path` is resolved against `base` when given, which must be
    /// fully qualified, and otherwise against the current directory. Windows
    /// paths other than verbatim ones are handed to the OS resolver.
    pub fn full_path(&self, path: &str, base: Option<&str>) -> Result<String> {
        let grammar = self.grammar;
        grammar.check_path(path)?;
        grammar.check_opt_path(base)?;

        let base = match base {
            Some(base) if !grammar.is_fully_qualified(base) => {
                log::debug!("base path {base:?} is not fully qualified");
                return Err(PathError::NotFullyQualified {
                    path: base.to_string(),
                });
            }
            Some(base) if !grammar.is_fully_qualified(path) => base,
            _ => return self.resolve(path),
        };

        if path.is_empty() {
            self.resolve(base)
        } else {
            self.resolve(&grammar.join_with_separator(base, path))
        }
    }

    fn resolve(&self, path: &str) -> Result<String> {
        match self.grammar {
            PathGrammar::Windows if self.grammar.is_verbatim(path) => Ok(path.to_string()),
            PathGrammar::Windows => {
                log::trace!("resolving {path:?} through the system resolver");
                Ok(self.resolver.full_path(path)?)
            }
            PathGrammar::Posix => {
                let absolute = if self.grammar.is_rooted(path) {
                    path.to_string()
                } else {
                    let cwd = self.resolver.current_dir()?;
                    log::trace!("resolving {path:?} against {cwd:?}");
                    self.grammar.join_with_separator(&cwd, path)
                };
                let root_len = self.grammar.classify_root(&absolute).len();
                if root_len == 0 {
                    // the current directory itself was relative
                    return Err(PathError::NotFullyQualified { path: absolute });
                }
                Ok(posix::collapse_dots(&absolute, root_len))
            }
        }
    }

    /// Resolves `path` against the real filesystem, following links.
    pub fn canonicalize(&self, path: &str) -> Result<String> {
        if path.is_empty() {
            return Ok(String::new());
        }
        self.resolver.canonicalize(path).map_err(|err| {
            log::debug!("canonicalize {path:?} failed: {err}");
            PathError::from(err)
        })
    }

    /// Replaces every `X` in `template` with a random ASCII letter or digit.
    pub fn random_file_name(&self, template: Option<&str>) -> Result<String> {
        let template = template.unwrap_or(DEFAULT_FILE_NAME_TEMPLATE);
        if !template.contains('X') {
            return Err(PathError::InvalidTemplate {
                template: template.to_string(),
            });
        }

        Ok(template
            .chars()
            .map(|c| match c {
                'X' => {
                    let i = self.random.next_below(FILE_NAME_CHARS.len() as u64) as usize;
                    FILE_NAME_CHARS[i] as char
                }
                c => c,
            })
            .collect())
    }
}

impl PathGrammar {
    /// `head` + primary separator + `tail`, always inserting the separator.
    fn join_with_separator(self, head: &str, tail: &str) -> String {
        let mut buf = String::with_capacity(head.len() + tail.len() + 1);
        buf.push_str(head);
        buf.push(self.dir_separator());
        buf.push_str(tail);
        buf
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicU64, Ordering},
        time::{Duration, SystemTime},
    };

    use super::*;
    use crate::SystemError;

    struct FakeResolver {
        cwd: &'static str,
    }

    impl SystemResolver for FakeResolver {
        fn current_dir(&self) -> std::result::Result<String, SystemError> {
            Ok(self.cwd.to_string())
        }

        fn full_path(&self, path: &str) -> std::result::Result<String, SystemError> {
            Ok(format!("resolved:{path}"))
        }

        fn canonicalize(&self, path: &str) -> std::result::Result<String, SystemError> {
            Err(SystemError::new(Some(2), format!("{path}: not found")))
        }
    }

    struct FailingResolver;

    impl SystemResolver for FailingResolver {
        fn current_dir(&self) -> std::result::Result<String, SystemError> {
            Err(SystemError::new(Some(3), "no current directory"))
        }

        fn full_path(&self, path: &str) -> std::result::Result<String, SystemError> {
            Err(SystemError::new(Some(3), format!("{path}: path not found")))
        }

        fn canonicalize(&self, path: &str) -> std::result::Result<String, SystemError> {
            Err(SystemError::new(Some(3), format!("{path}: path not found")))
        }
    }

    struct CountingRandom(AtomicU64);

    impl RandomSource for CountingRandom {
        fn next_u64(&self) -> u64 {
            self.0.fetch_add(1, Ordering::Relaxed)
        }
    }

    struct StoppedClock;

    impl Clock for StoppedClock {
        fn monotonic(&self) -> Duration {
            Duration::ZERO
        }

        fn system_time(&self) -> SystemTime {
            SystemTime::UNIX_EPOCH
        }
    }

    fn posix() -> PathContext {
        PathContext::builder()
            .grammar(PathGrammar::Posix)
            .resolver(FakeResolver { cwd: "/home/user" })
            .random(CountingRandom(AtomicU64::new(0)))
            .build()
    }

    fn windows() -> PathContext {
        PathContext::builder()
            .grammar(PathGrammar::Windows)
            .resolver(FakeResolver { cwd: r"C:\work" })
            .build()
    }

    #[test]
    fn test_full_path_posix() {
        let ctx = posix();
        assert_eq!(ctx.full_path("/a/./b/../c", None).unwrap(), "/a/c");
        assert_eq!(ctx.full_path("docs/../src", None).unwrap(), "/home/user/src");
        assert_eq!(ctx.full_path("..", None).unwrap(), "/home");
        assert_eq!(ctx.full_path("x", Some("/base")).unwrap(), "/base/x");
        assert_eq!(ctx.full_path("", Some("/base/")).unwrap(), "/base/");
        assert_eq!(ctx.full_path("/abs", Some("/base")).unwrap(), "/abs");
    }

    #[test]
    fn test_full_path_is_identity_on_clean_rooted_paths() {
        let ctx = posix();
        for path in ["/", "/a", "/a/b/c", "/usr/lib/"] {
            assert_eq!(ctx.full_path(path, None).unwrap(), path);
        }
    }

    #[test]
    fn test_full_path_rejects_bad_arguments() {
        let ctx = posix();
        assert!(matches!(
            ctx.full_path("x", Some("rel")),
            Err(PathError::NotFullyQualified { .. })
        ));
        assert!(matches!(
            ctx.full_path("x", Some("   ")),
            Err(PathError::EmptyPath)
        ));
        assert!(matches!(
            ctx.full_path("a\0b", None),
            Err(PathError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_full_path_windows() {
        let ctx = windows();
        assert_eq!(
            ctx.full_path(r"\\?\C:\a\..\b", None).unwrap(),
            r"\\?\C:\a\..\b"
        );
        assert_eq!(ctx.full_path(r"a\b", None).unwrap(), r"resolved:a\b");
        assert_eq!(
            ctx.full_path(r"a\b", Some(r"D:\base")).unwrap(),
            r"resolved:D:\base\a\b"
        );
        assert!(ctx.full_path("x", Some("D:base")).is_err());
    }

    #[test]
    fn test_full_path_windows_reports_system_error() {
        let ctx = PathContext::builder()
            .grammar(PathGrammar::Windows)
            .resolver(FailingResolver)
            .build();
        match ctx.full_path(r"Z:\missing\x", None) {
            Err(PathError::System(err)) => {
                assert_eq!(err.code, Some(3));
                assert!(err.message.contains("missing"));
            }
            other => panic!("unexpected result {other:?}"),
        }
        // verbatim paths never reach the resolver
        assert_eq!(ctx.full_path(r"\\?\Z:\x", None).unwrap(), r"\\?\Z:\x");
    }

    #[test]
    fn test_full_path_posix_reports_missing_cwd() {
        let ctx = PathContext::builder()
            .grammar(PathGrammar::Posix)
            .resolver(FailingResolver)
            .build();
        assert!(matches!(
            ctx.full_path("rel", None),
            Err(PathError::System(SystemError { code: Some(3), .. }))
        ));
        assert_eq!(ctx.full_path("/abs/./x", None).unwrap(), "/abs/x");
    }

    #[test]
    fn test_canonicalize_reports_system_error() {
        let ctx = posix();
        assert_eq!(ctx.canonicalize("").unwrap(), "");
        match ctx.canonicalize("/missing") {
            Err(PathError::System(err)) => assert_eq!(err.code, Some(2)),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_random_file_name() {
        let ctx = posix();
        assert_eq!(ctx.random_file_name(Some("tmp-XXX.log")).unwrap(), "tmp-abc.log");
        assert_eq!(ctx.random_file_name(None).unwrap(), "rnddefghijk");
        assert!(matches!(
            ctx.random_file_name(Some("plain")),
            Err(PathError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_random_file_name_uses_valid_characters() {
        let ctx = PathContext::builder()
            .grammar(PathGrammar::Windows)
            .clock(StoppedClock)
            .build();
        let name = ctx.random_file_name(None).unwrap();
        assert_eq!(name.len(), DEFAULT_FILE_NAME_TEMPLATE.len());
        assert!(name.starts_with("rnd"));
        assert!(name[3..].bytes().all(|b| b.is_ascii_alphanumeric()));
        assert!(ctx.grammar().is_valid_file_name(&name));
        assert_eq!(ctx.clock().monotonic(), Duration::ZERO);
    }
}
