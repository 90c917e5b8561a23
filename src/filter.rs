/*!
 * Path inclusion rules
 */

use std::path::Path;

use glob_match::glob_match;
use globset::GlobBuilder;

use crate::config::FilterConfig;

const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// Decide whether an entry takes part in the document
///
/// `relative_path` is the `/`-separated path from the scan root. Rules apply
/// in order: whitelist gate, hidden gate, path globs, then folder names for
/// directories or file globs for files.
pub fn should_include(
    absolute_path: &Path,
    relative_path: &str,
    is_dir: bool,
    config: &FilterConfig,
) -> bool {
    let rel = relative_path.replace('\\', "/");
    let name = absolute_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| rel.rsplit('/').next().unwrap_or_default().to_string());

    if !config.whitelist_paths.is_empty()
        && !config
            .whitelist_paths
            .iter()
            .any(|entry| whitelist_admits(entry, &rel, is_dir))
    {
        return false;
    }

    if !config.show_hidden && name.starts_with('.') {
        return false;
    }

    if config
        .ignore_paths
        .iter()
        .any(|pattern| path_glob_matches(pattern, &rel))
    {
        return false;
    }

    if is_dir {
        return !rel
            .split('/')
            .any(|segment| config.ignore_folders.contains(segment));
    }

    !config
        .ignore_files
        .iter()
        .any(|pattern| glob_match(pattern, &name))
}

/// Shell-style match of a relative path where `*` also crosses `/`
///
/// Invalid patterns never match.
pub fn path_glob_matches(pattern: &str, rel: &str) -> bool {
    match GlobBuilder::new(pattern).literal_separator(false).build() {
        Ok(glob) => glob.compile_matcher().is_match(rel),
        Err(e) => {
            log::warn!("Ignoring invalid path pattern '{}': {}", pattern, e);
            false
        }
    }
}

/// Check one whitelist entry against a relative path
fn whitelist_admits(entry: &str, rel: &str, is_dir: bool) -> bool {
    let entry = entry.replace('\\', "/");
    let entry = entry.trim_end_matches('/');
    if entry.is_empty() {
        return true;
    }

    if !entry.contains(GLOB_CHARS) {
        return rel == entry
            || is_within(rel, entry)
            // ancestor, so traversal can reach the whitelisted path
            || is_within(entry, rel);
    }

    if glob_match(entry, rel) {
        return true;
    }
    if !is_dir {
        return false;
    }

    // Directories are admitted on the way to, and beneath, the literal base of the glob
    let literal = &entry[..entry.find(GLOB_CHARS).unwrap_or(entry.len())];
    let base = match literal.rfind('/') {
        Some(idx) => &literal[..idx],
        None => "",
    };
    base.is_empty() || rel == base || is_within(rel, base) || is_within(base, rel)
}

/// True if `path` lies strictly below `dir`
fn is_within(path: &str, dir: &str) -> bool {
    path.len() > dir.len() && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn check(rel: &str, is_dir: bool, config: &FilterConfig) -> bool {
        should_include(&Path::new("/root").join(rel), rel, is_dir, config)
    }

    #[test]
    fn test_whitelist_prefix() {
        let config = FilterConfig {
            whitelist_paths: vec!["src/".into()],
            ..FilterConfig::permissive()
        };
        assert!(check("src", true, &config));
        assert!(check("src/main.rs", false, &config));
        assert!(!check("docs/readme.txt", false, &config));
        assert!(!check("srcx/main.rs", false, &config));
    }

    #[test]
    fn test_whitelist_ancestor_of_nested_file() {
        let config = FilterConfig {
            whitelist_paths: vec!["a/b/c.txt".into()],
            ..FilterConfig::permissive()
        };
        assert!(check("a", true, &config));
        assert!(check("a/b", true, &config));
        assert!(check("a/b/c.txt", false, &config));
        assert!(!check("a/b/d.txt", false, &config));
    }

    #[test]
    fn test_whitelist_glob() {
        let config = FilterConfig {
            whitelist_paths: vec!["src/**/*.rs".into()],
            ..FilterConfig::permissive()
        };
        assert!(check("src", true, &config));
        assert!(check("src/deep/nested", true, &config));
        assert!(check("src/deep/nested/lib.rs", false, &config));
        assert!(!check("src/notes.txt", false, &config));
        assert!(!check("tests", true, &config));
    }

    #[test]
    fn test_ignored_folder_beats_whitelist() {
        let config = FilterConfig {
            whitelist_paths: vec!["src/".into()],
            ignore_folders: BTreeSet::from(["ignored".to_string()]),
            ..FilterConfig::permissive()
        };
        assert!(!check("src/ignored", true, &config));
        assert!(check("src/kept", true, &config));
    }

    #[test]
    fn test_hidden_gate() {
        let config = FilterConfig {
            ignore_files: vec![],
            ..FilterConfig::default()
        };
        assert!(!check(".env", false, &config));

        let config = FilterConfig {
            ignore_files: vec![".env".into()],
            ..FilterConfig::permissive()
        };
        assert!(!check(".env", false, &config));
        assert!(check(".envrc", false, &config));
    }

    #[test]
    fn test_ignore_paths_and_files() {
        let config = FilterConfig {
            ignore_paths: vec!["docs/*".into()],
            ignore_files: vec!["*.log".into()],
            ..FilterConfig::permissive()
        };
        assert!(!check("docs/guide.txt", false, &config));
        assert!(check("docs", true, &config));
        assert!(!check("deep/dir/run.log", false, &config));
        assert!(check("deep/dir/run.txt", false, &config));
    }

    #[test]
    fn test_ignore_paths_star_crosses_directories() {
        let config = FilterConfig {
            ignore_paths: vec!["*.log".into(), "*/test_*.py".into(), "build/*".into()],
            ..FilterConfig::permissive()
        };
        assert!(!check("run.log", false, &config));
        assert!(!check("logs/run.log", false, &config));
        assert!(!check("a/b/test_util.py", false, &config));
        assert!(!check("build/out/bin.o", false, &config));
        assert!(check("test_top.py", false, &config));
        assert!(check("logs/run.txt", false, &config));
    }

    #[test]
    fn test_invalid_path_pattern_never_matches() {
        assert!(!path_glob_matches("src/[", "src/["));
        assert!(path_glob_matches("src/{a,b}/*", "src/a/deep/x.rs"));
    }
}
