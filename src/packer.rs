/*!
 * Packing a directory into a project document
 */

use std::path::{Component, Path, PathBuf};

use indicatif::ProgressBar;

use crate::config::FilterConfig;
use crate::error::{OfpError, Result};
use crate::locale::Locale;
use crate::renderer;
use crate::scanner::Scanner;
use crate::types::ProjectDocument;
use crate::writer::MarkdownWriter;

/// Pack `root` with English section titles and return the document text
pub fn pack(root: &Path, filter: &FilterConfig) -> Result<String> {
    let packer = Packer::new(filter.clone());
    let document = packer.pack(root)?;
    Ok(packer.writer().assemble(&document))
}

/// Walks, renders and assembles one directory
pub struct Packer {
    scanner: Scanner,
    locale: Locale,
    progress: ProgressBar,
}

impl Packer {
    /// Create a packer with English titles and no progress display
    pub fn new(filter: FilterConfig) -> Self {
        Self {
            scanner: Scanner::new(filter),
            locale: Locale::default(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Use section titles in `locale`
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Report rendering progress on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Writer matching this packer's locale
    pub fn writer(&self) -> MarkdownWriter {
        MarkdownWriter::new(self.locale)
    }

    /// Build the document for `root`
    pub fn pack(&self, root: &Path) -> Result<ProjectDocument> {
        if !root.is_dir() {
            return Err(OfpError::SourceNotFound(root.to_path_buf()));
        }
        let root = normalize(&std::path::absolute(root)?);
        let root_name = root
            .file_name()
            .unwrap_or(root.as_os_str())
            .to_string_lossy()
            .to_string();

        let (tree, entries) = self.scanner.walk(&root);

        self.progress.set_length(entries.len() as u64);
        let mut files = Vec::with_capacity(entries.len());
        for entry in &entries {
            self.progress
                .set_message(format!("Current file: {}", entry.relative_path));
            files.push(renderer::render(entry));
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        Ok(ProjectDocument {
            root_name,
            tree,
            files,
        })
    }
}

/// Resolve `.` and `..` lexically, leaving symlinks in place
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_lexical() {
        assert_eq!(normalize(Path::new("/a/b/./c/..")), PathBuf::from("/a/b"));
        assert_eq!(normalize(Path::new("/a/b/")), PathBuf::from("/a/b"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }
}
