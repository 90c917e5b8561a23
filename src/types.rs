/*!
 * Core types and data structures for onefile
 */

use std::collections::HashMap;
use std::path::PathBuf;

/// A file that survived filtering during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Root-relative path, `/`-separated, no leading `/`
    pub relative_path: String,
    /// Lowercased extension including the leading dot, possibly empty
    pub extension: String,
    /// Fence tag derived from the extension
    pub language: &'static str,
}

/// A file rendered into its document section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Root-relative path written as the section header
    pub relative_path: String,
    /// Fence tag
    pub language: &'static str,
    /// Embedded text, or a placeholder when the file could not be read
    pub content: String,
}

impl RenderedFile {
    /// Number of lines in the embedded content
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Number of characters in the embedded content
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// The packed artifact before serialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDocument {
    /// Display name of the scanned directory
    pub root_name: String,
    /// Rendered tree, one line per included entry
    pub tree: String,
    /// Rendered files in canonical order
    pub files: Vec<RenderedFile>,
}

/// A file recovered from a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub relative_path: String,
    pub content: String,
}

/// Result of parsing a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Root folder name taken from the structure section
    pub root_name: String,
    /// Files in document order
    pub files: Vec<ParsedFile>,
    /// Position of each path in `files`
    index: HashMap<String, usize>,
}

impl ParsedDocument {
    /// Insert a file, keeping the first position of a repeated path
    pub fn insert(&mut self, relative_path: String, content: String) {
        match self.index.get(&relative_path) {
            Some(&pos) => self.files[pos].content = content,
            None => {
                self.index.insert(relative_path.clone(), self.files.len());
                self.files.push(ParsedFile {
                    relative_path,
                    content,
                });
            }
        }
    }

    /// Look up the content recovered for a path
    pub fn get(&self, relative_path: &str) -> Option<&str> {
        self.index
            .get(relative_path)
            .map(|&pos| self.files[pos].content.as_str())
    }
}

/// A file that could not be materialized during unpacking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackWarning {
    pub path: String,
    pub reason: String,
}

/// Outcome of a successful unpack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackResult {
    /// Root folder name recorded in the document
    pub root_name: String,
    /// Relative paths written, in document order
    pub written: Vec<String>,
    /// Files that failed to materialize
    pub warnings: Vec<UnpackWarning>,
}

impl UnpackResult {
    /// True when every file in the document was written
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
