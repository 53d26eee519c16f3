//! Core domain types for folder2md documents.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{Folder2MdError, Result};

/// Sentinel accepted in place of an extension list to embed every file.
pub const ALL_EXTENSIONS: &str = "all";

// ---------------------------------------------------------------------------
// ExtensionFilter
// ---------------------------------------------------------------------------

/// Which files get their content embedded, keyed by language tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtensionFilter {
    /// No filtering: every listed file is embedded.
    #[default]
    All,
    /// Only files whose language tag is in the set.
    Only(BTreeSet<String>),
}

impl ExtensionFilter {
    /// Whether a file with the given language tag should be embedded.
    pub fn allows(&self, tag: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(tags) => tags.contains(tag),
        }
    }
}

impl std::str::FromStr for ExtensionFilter {
    type Err = Folder2MdError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(ALL_EXTENSIONS) {
            return Ok(Self::All);
        }

        let tags: BTreeSet<String> = trimmed
            .split(',')
            .map(|entry| {
                let entry = entry.trim();
                entry.strip_prefix('.').unwrap_or(entry).to_lowercase()
            })
            .filter(|entry| !entry.is_empty())
            .collect();

        if tags.is_empty() {
            return Err(Folder2MdError::validation(format!(
                "extension filter '{s}' names no extensions (use '{ALL_EXTENSIONS}' to embed everything)"
            )));
        }

        Ok(Self::Only(tags))
    }
}

impl std::fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_EXTENSIONS),
            Self::Only(tags) => {
                let joined: Vec<&str> = tags.iter().map(String::as_str).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Language tags
// ---------------------------------------------------------------------------

/// Language identifier for a fenced block: the lowercase extension without its dot.
///
/// Files without an extension (including dotfiles like `.env`) yield an empty tag.
pub fn language_tag(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// FileContent
// ---------------------------------------------------------------------------

/// Outcome of loading a file for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// The file decoded as UTF-8 text.
    Text(String),
    /// The bytes are not valid UTF-8.
    Undecodable,
    /// Reading failed; carries the error description.
    ReadFailed(String),
}

impl FileContent {
    /// Whether the content was embedded verbatim.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_sentinel() {
        assert_eq!("all".parse::<ExtensionFilter>().unwrap(), ExtensionFilter::All);
        assert_eq!(" ALL ".parse::<ExtensionFilter>().unwrap(), ExtensionFilter::All);
    }

    #[test]
    fn parses_extension_list() {
        let filter: ExtensionFilter = "py, .YAML,sh,,md".parse().unwrap();
        assert!(filter.allows("py"));
        assert!(filter.allows("yaml"));
        assert!(filter.allows("md"));
        assert!(!filter.allows("ts"));
        assert!(!filter.allows(""));
        assert_eq!(filter.to_string(), "md,py,sh,yaml");
    }

    #[test]
    fn rejects_empty_list() {
        let err = " , ,".parse::<ExtensionFilter>().unwrap_err();
        assert!(err.to_string().contains("names no extensions"));
    }

    #[test]
    fn all_allows_untagged_files() {
        assert!(ExtensionFilter::All.allows(""));
        assert!(ExtensionFilter::All.allows("ts"));
    }

    #[test]
    fn language_tag_from_extension() {
        assert_eq!(language_tag(Path::new("web/src/app.TS")), "ts");
        assert_eq!(language_tag(Path::new("a/b/archive.tar.gz")), "gz");
        assert_eq!(language_tag(Path::new("Makefile")), "");
        assert_eq!(language_tag(Path::new(".env")), "");
    }

    #[test]
    fn file_content_kinds() {
        assert!(FileContent::Text("x".into()).is_text());
        assert!(!FileContent::Undecodable.is_text());
        assert!(!FileContent::ReadFailed("denied".into()).is_text());
    }
}
