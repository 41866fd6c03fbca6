//! Property-based tests across the grammars.

use std::borrow::Cow;

use proptest::prelude::*;

use crate::{PathContext, PathGrammar, SystemError, SystemResolver};

struct RootCwd;

impl SystemResolver for RootCwd {
    fn current_dir(&self) -> Result<String, SystemError> {
        Ok(String::from("/"))
    }

    fn full_path(&self, path: &str) -> Result<String, SystemError> {
        Ok(path.to_string())
    }

    fn canonicalize(&self, path: &str) -> Result<String, SystemError> {
        Ok(path.to_string())
    }
}

// Plain component names: no separators, no dots
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,12}"
}

fn segments_strategy(min: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment_strategy(), min..6)
}

fn grammar_strategy() -> impl Strategy<Value = PathGrammar> {
    prop_oneof![Just(PathGrammar::Posix), Just(PathGrammar::Windows)]
}

// Noisy strings heavy in separators and dots
fn noisy_path_strategy() -> impl Strategy<Value = String> {
    "[a-c./\\\\]{0,24}"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Normalizing twice changes nothing the second time
    #[test]
    fn normalize_is_idempotent(grammar in grammar_strategy(), path in noisy_path_strategy()) {
        let once = grammar.normalize(&path).into_owned();
        let twice = grammar.normalize(&once);
        prop_assert!(matches!(twice, Cow::Borrowed(_)));
        prop_assert_eq!(twice.as_ref(), once.as_str());
        prop_assert!(grammar.is_normalized(&once));
    }

    // A single-byte stem never carries an extension
    #[test]
    fn single_byte_stem_has_no_extension(grammar in grammar_strategy(), stem in "[a-z]", ext in "[a-z]{1,4}") {
        let path = format!("{stem}.{ext}");
        prop_assert_eq!(grammar.extension(&path), None);
        prop_assert_eq!(grammar.file_stem(&path), Some(path.as_str()));
    }

    // A rooted POSIX path without dots or doubled separators resolves to itself
    #[test]
    fn full_path_keeps_clean_rooted_paths(segments in segments_strategy(0), trailing in any::<bool>()) {
        let ctx = PathContext::builder()
            .grammar(PathGrammar::Posix)
            .resolver(RootCwd)
            .build();
        let mut path = format!("/{}", segments.join("/"));
        if trailing && !segments.is_empty() {
            path.push('/');
        }
        prop_assert_eq!(ctx.full_path(&path, None).unwrap(), path);
    }

    // Relative paths resolve under the current directory
    #[test]
    fn full_path_roots_relative_paths(segments in segments_strategy(1)) {
        let ctx = PathContext::builder()
            .grammar(PathGrammar::Posix)
            .resolver(RootCwd)
            .build();
        let path = segments.join("/");
        prop_assert_eq!(ctx.full_path(&path, None).unwrap(), format!("/{path}"));
    }

    // split agrees with parent and file_name
    #[test]
    fn split_matches_parent_and_file_name(
        grammar in grammar_strategy(),
        segments in segments_strategy(2),
        rooted in any::<bool>(),
    ) {
        let sep = grammar.dir_separator().to_string();
        let mut path = segments.join(&sep);
        if rooted {
            path.insert_str(0, &sep);
        }
        let (dir, file) = grammar.split(&path);
        prop_assert_eq!(dir, grammar.parent(&path));
        prop_assert_eq!(file, grammar.file_name(&path));
        prop_assert_eq!(file, segments.last().map(String::as_str));
    }

    // Adding then removing an extension restores the path; stems need two bytes
    #[test]
    fn extension_added_then_removed(
        grammar in grammar_strategy(),
        dirs in segments_strategy(0),
        name in "[a-z0-9_-]{2,12}",
    ) {
        let sep = grammar.dir_separator().to_string();
        let path = dirs.iter().chain(std::iter::once(&name)).cloned().collect::<Vec<_>>().join(&sep);
        prop_assert!(!grammar.has_extension(&path));

        let with_ext = grammar.set_extension(&path, "txt");
        prop_assert_eq!(grammar.extension(&with_ext), Some("txt"));

        let without = grammar.set_extension(&with_ext, "");
        prop_assert!(!grammar.has_extension(&without));
        prop_assert_eq!(without.as_ref(), path.as_str());
    }

    // A path starts with its parent and ends with its file name
    #[test]
    fn path_is_bounded_by_parent_and_file_name(grammar in grammar_strategy(), segments in segments_strategy(2)) {
        let sep = grammar.dir_separator().to_string();
        let path = format!("{sep}{}", segments.join(&sep));

        let parent = grammar.parent(&path).unwrap();
        prop_assert!(grammar.starts_with(&path, parent));
        prop_assert!(grammar.starts_with(&path.to_uppercase(), parent));

        let file_name = grammar.file_name(&path).unwrap();
        prop_assert!(grammar.ends_with(&path, file_name));
    }

    // combine puts exactly one separator between plain fragments
    #[test]
    fn combine_joins_plain_fragments(grammar in grammar_strategy(), segments in segments_strategy(1)) {
        let sep = grammar.dir_separator().to_string();
        prop_assert_eq!(grammar.combine(&segments), segments.join(&sep));
    }
}
