//! # CODEOWNERS Patterns
//!
//! Gitignore-style path patterns on top of [`globset`].
//!
//! | Pattern          | Matches                                              |
//! |------------------|------------------------------------------------------|
//! | `*`              | everything                                           |
//! | `*.json`         | any `.json` file at any depth                        |
//! | `/data/`         | the top-level `data` directory and everything in it  |
//! | `data/tokens`    | `data/tokens` relative to the root, and descendants  |
//! | `tokens`         | any entry named `tokens`, and descendants            |
//! | `/data/tokens/*` | entries inside `data/tokens`, not the directory      |
//! | `**/index.md`    | `index.md` at any depth                              |
//! | `data/**/x`      | `x` anywhere below `data`                            |
//!
//! A pattern that matches a directory also matches everything beneath it.
//! A trailing `/` restricts the pattern to directories.

use globset::{GlobBuilder, GlobMatcher};

use regcheck_core::EntryKind;

/// A compiled CODEOWNERS pattern.
#[derive(Debug, Clone)]
pub struct OwnerPattern {
    source: String,
    matcher: GlobMatcher,
    dir_only: bool,
}

impl OwnerPattern {
    /// Compile a pattern as written in CODEOWNERS.
    ///
    /// # Errors
    ///
    /// Returns the glob error for malformed patterns, such as an unclosed
    /// or inverted character class.
    pub fn parse(pattern: &str) -> Result<Self, globset::Error> {
        let mut body = pattern;
        let dir_only = body.len() > 1 && body.ends_with('/');
        if dir_only {
            body = &body[..body.len() - 1];
        }

        // A slash anywhere but the end anchors the pattern at the root.
        let anchored = body.contains('/');
        let body = body.strip_prefix('/').unwrap_or(body);

        let glob = if anchored || body.starts_with("**") {
            body.to_string()
        } else {
            format!("**/{body}")
        };

        let matcher = GlobBuilder::new(&glob)
            .literal_separator(true)
            .backslash_escape(true)
            .build()?
            .compile_matcher();

        Ok(Self {
            source: pattern.to_string(),
            matcher,
            dir_only,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a `/`-separated repository-relative path.
    ///
    /// The entry itself is tested first, then each of its ancestor
    /// directories, innermost last.
    pub fn matches(&self, rel_path: &str, kind: EntryKind) -> bool {
        let self_match = (!self.dir_only || kind == EntryKind::Directory)
            && self.matcher.is_match(rel_path);
        self_match
            || rel_path
                .match_indices('/')
                .any(|(end, _)| self.matcher.is_match(&rel_path[..end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(pattern: &str, path: &str) -> bool {
        OwnerPattern::parse(pattern).unwrap().matches(path, EntryKind::File)
    }

    fn dir(pattern: &str, path: &str) -> bool {
        OwnerPattern::parse(pattern).unwrap().matches(path, EntryKind::Directory)
    }

    #[test]
    fn star_matches_everything() {
        assert!(file("*", "widget.json"));
        assert!(file("*", "data/tokens/widget.json"));
        assert!(dir("*", "data"));
    }

    #[test]
    fn extension_glob_matches_at_any_depth() {
        assert!(file("*.json", "data/a/b/widget.json"));
        assert!(!file("*.json", "data/a/b/widget.yaml"));
    }

    #[test]
    fn unanchored_name_matches_descendants() {
        assert!(dir("tokens", "data/tokens"));
        assert!(file("tokens", "data/tokens/widget.json"));
        assert!(!file("tokens", "data/tokenswap/widget.json"));
    }

    #[test]
    fn leading_slash_anchors_at_root() {
        assert!(file("/data", "data/widget.json"));
        assert!(!file("/data", "nested/data/widget.json"));
    }

    #[test]
    fn inner_slash_anchors_at_root() {
        assert!(file("data/tokens", "data/tokens/widget.json"));
        assert!(!file("data/tokens", "other/data/tokens/widget.json"));
    }

    #[test]
    fn single_star_does_not_cross_directories() {
        assert!(file("data/*/widget.json", "data/a/widget.json"));
        assert!(!file("data/*/widget.json", "data/a/b/widget.json"));
    }

    #[test]
    fn double_star_crosses_directories() {
        assert!(file("data/**/widget.json", "data/widget.json"));
        assert!(file("data/**/widget.json", "data/a/b/widget.json"));
        assert!(file("**/widget.json", "data/a/widget.json"));
        assert!(file("data/**", "data/a/b/c.json"));
    }

    #[test]
    fn trailing_wildcard_does_not_match_the_directory_itself() {
        assert!(!dir("/data/tokens/*", "data/tokens"));
        assert!(dir("/data/tokens/*", "data/tokens/0xabc"));
        assert!(file("/data/tokens/*", "data/tokens/a.json"));
        assert!(file("/data/tokens/*", "data/tokens/0xabc/a.json"));

        assert!(!dir("data/**", "data"));
        assert!(dir("data/**", "data/a"));
        assert!(!dir("data/tokens/", "data"));
    }

    #[test]
    fn trailing_slash_matches_directories_only() {
        assert!(dir("tokens/", "data/tokens"));
        assert!(file("tokens/", "data/tokens/widget.json"));
        assert!(!file("tokens/", "data/tokens"));
    }

    #[test]
    fn question_mark_and_classes() {
        assert!(file("data/v?.json", "data/v1.json"));
        assert!(!file("data/v?.json", "data/v10.json"));
        assert!(file("data/[ab].json", "data/a.json"));
        assert!(!file("data/[!ab].json", "data/a.json"));
        assert!(file("data/[!ab].json", "data/c.json"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(file("data/a+b(1).json", "data/a+b(1).json"));
        assert!(!file("data/a.json", "data/abjson"));
    }

    #[test]
    fn escaped_glob_characters_are_literal() {
        assert!(file(r"data/\*.json", "data/*.json"));
        assert!(!file(r"data/\*.json", "data/x.json"));
    }

    #[test]
    fn as_str_keeps_the_written_form() {
        assert_eq!(OwnerPattern::parse("/data/tokens/").unwrap().as_str(), "/data/tokens/");
    }
}
