//! # CODEOWNERS
//!
//! Discovery, parsing and lookup of repository ownership rules.
//!
//! ```text
//! # comment
//! *                         @registry/maintainers
//! /data/tokens/             @registry/tokens
//! /data/tokens/0xdead*      @alice bob@example.org
//! /data/archive/
//! ```
//!
//! Rules are evaluated bottom-up: the last rule whose pattern matches
//! decides the owners. The final rule above has no owners, so everything
//! under `data/archive/` is explicitly unowned.

use std::path::{Component, Path, PathBuf};

use regcheck_core::EntryKind;

use crate::pattern::OwnerPattern;
use crate::{OwnershipError, OwnershipResolver};

/// Locations probed for the CODEOWNERS file, in order, relative to the root.
pub const CODEOWNERS_LOCATIONS: [&str; 4] = [
    ".github/CODEOWNERS",
    ".gitlab/CODEOWNERS",
    "docs/CODEOWNERS",
    "CODEOWNERS",
];

/// One `<pattern> <owner>...` line.
#[derive(Debug, Clone)]
pub struct OwnerRule {
    /// Compiled pattern.
    pub pattern: OwnerPattern,
    /// Declared owners, possibly empty.
    pub owners: Vec<String>,
    /// One-based line number in the source file.
    pub line: usize,
}

/// Ownership rules of one repository.
#[derive(Debug, Clone)]
pub struct CodeOwners {
    root: PathBuf,
    source: PathBuf,
    rules: Vec<OwnerRule>,
}

impl CodeOwners {
    /// Find and load the CODEOWNERS file of the repository at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`OwnershipError::NotFound`] if none of
    /// [`CODEOWNERS_LOCATIONS`] exists, or a read/parse error for the file
    /// that was found.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self, OwnershipError> {
        let root = root.as_ref();
        let source = CODEOWNERS_LOCATIONS
            .iter()
            .map(|loc| root.join(loc))
            .find(|p| p.is_file())
            .ok_or_else(|| OwnershipError::NotFound {
                root: root.to_path_buf(),
            })?;
        Self::from_file(root, source)
    }

    /// Load rules from a specific file; matching is relative to `root`.
    pub fn from_file(
        root: impl AsRef<Path>,
        source: impl AsRef<Path>,
    ) -> Result<Self, OwnershipError> {
        let source = source.as_ref();
        let contents = std::fs::read_to_string(source).map_err(|e| OwnershipError::Io {
            path: source.to_path_buf(),
            source: e,
        })?;
        Self::parse(root, source, &contents)
    }

    /// Parse CODEOWNERS text. `source` is only used in error messages.
    pub fn parse(
        root: impl AsRef<Path>,
        source: impl AsRef<Path>,
        contents: &str,
    ) -> Result<Self, OwnershipError> {
        let source = source.as_ref();
        let mut rules = Vec::new();

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(pattern_text) = tokens.next() else {
                continue;
            };
            let owners: Vec<String> = tokens
                .take_while(|t| !t.starts_with('#'))
                .map(str::to_string)
                .collect();

            let pattern =
                OwnerPattern::parse(pattern_text).map_err(|e| OwnershipError::InvalidPattern {
                    path: source.to_path_buf(),
                    line: idx + 1,
                    pattern: pattern_text.to_string(),
                    source: e,
                })?;
            rules.push(OwnerRule {
                pattern,
                owners,
                line: idx + 1,
            });
        }

        tracing::debug!(source = %source.display(), rules = rules.len(), "loaded CODEOWNERS");
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            source: source.to_path_buf(),
            rules,
        })
    }

    /// The file the rules were loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Rules in file order.
    pub fn rules(&self) -> &[OwnerRule] {
        &self.rules
    }

    /// The last rule matching `path`, if any.
    pub fn matching_rule(&self, path: &Path, kind: EntryKind) -> Option<&OwnerRule> {
        let rel = self.relative(path)?;
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.pattern.matches(&rel, kind))
    }

    /// `/`-joined path relative to the root; `None` if outside it.
    fn relative(&self, path: &Path) -> Option<String> {
        let rel = if path.is_absolute() {
            path.strip_prefix(&self.root).ok()?
        } else {
            path
        };

        let mut parts = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if parts.is_empty() {
            return None;
        }
        Some(parts.join("/"))
    }
}

impl OwnershipResolver for CodeOwners {
    fn owners_of(&self, path: &Path, kind: EntryKind) -> Vec<String> {
        match self.matching_rule(path, kind) {
            Some(rule) => {
                tracing::trace!(
                    path = %path.display(),
                    pattern = rule.pattern.as_str(),
                    line = rule.line,
                    "matched CODEOWNERS rule"
                );
                rule.owners.clone()
            }
            None => Vec::new(),
        }
    }
}
