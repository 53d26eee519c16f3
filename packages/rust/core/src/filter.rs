//! Path predicates deciding what the traversal writes.
//!
//! All matching is plain substring matching on the path string (with `/`
//! separators), except file listing which compares whole path components.

use std::borrow::Cow;
use std::path::{Component, Path};

use folder2md_shared::FilterConfig;

/// Path as a string with `/` separators on every platform.
pub fn path_key(path: &Path) -> Cow<'_, str> {
    let raw = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        raw
    } else {
        Cow::Owned(raw.replace(std::path::MAIN_SEPARATOR, "/"))
    }
}

/// True if the directory (and everything under it) must be left out.
pub fn should_skip_directory(path: &Path, config: &FilterConfig) -> bool {
    let key = path_key(path);
    config
        .hard_excludes
        .iter()
        .chain(config.exclude_patterns.iter())
        .any(|pattern| !pattern.is_empty() && key.contains(pattern.as_str()))
}

/// False if a subtree marker is configured and the directory lies outside it.
///
/// Directories failing this check are still descended into.
pub fn emits_output(path: &Path, config: &FilterConfig) -> bool {
    match config.subtree_marker.as_deref() {
        Some(marker) if !marker.is_empty() => path_key(path).contains(marker),
        _ => true,
    }
}

/// False if any component of the file's path is a hard-excluded name.
pub fn should_list_file(path: &Path, config: &FilterConfig) -> bool {
    !path.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            config.hard_excludes.iter().any(|excluded| *excluded == name)
        }
        _ => false,
    })
}

/// True if a listed file's content should be embedded.
pub fn should_embed_content(path: &Path, tag: &str, config: &FilterConfig) -> bool {
    if !config.venv_marker.is_empty() && path_key(path).contains(config.venv_marker.as_str()) {
        return false;
    }
    config.extensions.allows(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folder2md_shared::AppConfig;

    fn defaults() -> FilterConfig {
        FilterConfig::try_from(&AppConfig::default()).unwrap()
    }

    #[test]
    fn hard_excludes_match_anywhere() {
        let cfg = defaults();
        assert!(should_skip_directory(Path::new("./trima/CLAM/models"), &cfg));
        assert!(should_skip_directory(Path::new("./.venv/lib"), &cfg));
        assert!(should_skip_directory(Path::new("./pkg/__pycache__"), &cfg));
        assert!(should_skip_directory(Path::new("./.git/objects"), &cfg));
        // substring, not segment: `.github` contains `.git`
        assert!(should_skip_directory(Path::new("./.github/workflows"), &cfg));
        assert!(!should_skip_directory(Path::new("./web/src"), &cfg));
    }

    #[test]
    fn exclude_patterns_are_substrings() {
        let mut cfg = defaults();
        cfg.exclude_patterns = vec!["web/src/core/sse".into(), "web/src/app/landing".into()];
        assert!(should_skip_directory(Path::new("./web/src/core/sse"), &cfg));
        assert!(should_skip_directory(Path::new("./web/src/core/sse/parts"), &cfg));
        assert!(should_skip_directory(Path::new("./web/src/app/landing-old"), &cfg));
        assert!(!should_skip_directory(Path::new("./web/src/core"), &cfg));
    }

    #[test]
    fn empty_patterns_never_match() {
        let mut cfg = defaults();
        cfg.exclude_patterns = vec![String::new()];
        assert!(!should_skip_directory(Path::new("./web"), &cfg));
    }

    #[test]
    fn subtree_marker_gates_output() {
        let mut cfg = defaults();
        assert!(emits_output(Path::new("./docs"), &cfg));

        cfg.subtree_marker = Some("./web/src".into());
        assert!(!emits_output(Path::new("./"), &cfg));
        assert!(!emits_output(Path::new("./web"), &cfg));
        assert!(emits_output(Path::new("./web/src"), &cfg));
        assert!(emits_output(Path::new("./web/src/app"), &cfg));
    }

    #[test]
    fn listing_skips_hard_excluded_segments_only() {
        let cfg = defaults();
        assert!(!should_list_file(Path::new("./repo/CLAM/weights.bin"), &cfg));
        assert!(!should_list_file(Path::new("./vendor/lib/.git"), &cfg));
        assert!(should_list_file(Path::new("./repo/CLAMP/readme.md"), &cfg));
        assert!(should_list_file(Path::new("./repo/.gitignore"), &cfg));
    }

    #[test]
    fn embedding_respects_venv_marker() {
        let cfg = defaults();
        assert!(!should_embed_content(Path::new("./venv/lib/site.py"), "py", &cfg));
        assert!(should_embed_content(Path::new("./src/venv.py"), "py", &cfg));
    }

    #[test]
    fn embedding_respects_extension_filter() {
        let mut cfg = defaults();
        cfg.extensions = "py,yaml".parse().unwrap();
        assert!(should_embed_content(Path::new("./a/b.py"), "py", &cfg));
        assert!(!should_embed_content(Path::new("./a/b.ts"), "ts", &cfg));
        assert!(!should_embed_content(Path::new("./a/Makefile"), "", &cfg));
    }
}
