/*!
 * Directory walking and tree rendering
 */

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::FilterConfig;
use crate::filter::should_include;
use crate::renderer::language_for;
use crate::types::FileEntry;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_PREFIX: &str = "│   ";
const SPACE_PREFIX: &str = "    ";

/// Walker producing the tree rendering and the canonical file list
pub struct Scanner {
    /// Filtering rules
    filter: FilterConfig,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(filter: FilterConfig) -> Self {
        Self { filter }
    }

    /// Walk `root`, returning the tree lines joined by `\n` and the included files
    ///
    /// A `root` that is not a directory yields an empty tree and no files.
    pub fn walk(&self, root: &Path) -> (String, Vec<FileEntry>) {
        let mut lines = Vec::new();
        let mut files = Vec::new();

        if root.is_dir() {
            self.walk_directory(root, root, "", &mut lines, &mut files);
        } else {
            log::debug!("{} is not a directory, nothing to walk", root.display());
        }

        log::info!(
            "Walked {}: {} tree lines, {} files",
            root.display(),
            lines.len(),
            files.len()
        );
        (lines.join("\n"), files)
    }

    fn walk_directory(
        &self,
        root: &Path,
        dir: &Path,
        prefix: &str,
        lines: &mut Vec<String>,
        files: &mut Vec<FileEntry>,
    ) {
        let entries: Vec<(DirEntry, String, bool)> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|result| match result {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Error reading directory {}: {}", dir.display(), e);
                    None
                }
            })
            .filter_map(|entry| {
                let is_dir = self.classify(&entry)?;
                let rel = relative_path(root, entry.path())?;
                if should_include(entry.path(), &rel, is_dir, &self.filter) {
                    Some((entry, rel, is_dir))
                } else {
                    log::debug!("Filtered out {}", rel);
                    None
                }
            })
            .collect();

        let count = entries.len();
        for (index, (entry, rel, is_dir)) in entries.into_iter().enumerate() {
            let is_last = index + 1 == count;
            let pointer = if is_last { LAST_BRANCH } else { BRANCH };
            let name = entry.file_name().to_string_lossy();

            if is_dir {
                lines.push(format!("{}{}{}/", prefix, pointer, name));
                let child_prefix = format!(
                    "{}{}",
                    prefix,
                    if is_last { SPACE_PREFIX } else { PIPE_PREFIX }
                );
                self.walk_directory(root, entry.path(), &child_prefix, lines, files);
            } else {
                lines.push(format!("{}{}{}", prefix, pointer, name));
                files.push(file_entry(entry.into_path(), rel));
            }
        }
    }

    /// Directory or file; `None` for entries that are neither (e.g. links to directories)
    fn classify(&self, entry: &DirEntry) -> Option<bool> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return Some(true);
        }
        if file_type.is_symlink() && entry.path().is_dir() {
            log::debug!("Not following directory link {}", entry.path().display());
            return None;
        }
        Some(false)
    }
}

/// Root-relative, `/`-separated path of `path`
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

fn file_entry(absolute_path: PathBuf, relative_path: String) -> FileEntry {
    let extension = absolute_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    let language = language_for(&extension);

    FileEntry {
        absolute_path,
        relative_path,
        extension,
        language,
    }
}
