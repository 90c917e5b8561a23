/*!
 * Markdown writer for project documents
 */

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::locale::Locale;
use crate::types::{ProjectDocument, RenderedFile};

/// Writer serializing a [`ProjectDocument`] into its Markdown text form
pub struct MarkdownWriter {
    /// Language of the section titles
    locale: Locale,
}

impl MarkdownWriter {
    /// Create a new writer
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Render the whole document as text
    pub fn assemble(&self, document: &ProjectDocument) -> String {
        let mut out = String::new();

        // Structure section
        out.push_str(&format!(
            "# {}: {}\n\n",
            self.locale.structure_title(),
            document.root_name
        ));
        out.push_str(&format!(
            "```\n{}/\n{}\n```\n\n",
            document.root_name, document.tree
        ));

        // Content section
        out.push_str(&format!("# {}\n\n", self.locale.contents_title()));
        let blocks: Vec<String> = document.files.iter().map(Self::file_block).collect();
        out.push_str(&blocks.join("\n"));

        out
    }

    /// Write the document to `path`, creating parent directories
    pub fn write(&self, document: &ProjectDocument, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.assemble(document).as_bytes())?;
        writer.flush()?;

        log::info!(
            "Wrote {} files to {}",
            document.files.len(),
            path.display()
        );
        Ok(())
    }

    fn file_block(file: &RenderedFile) -> String {
        format!(
            "## {}\n\n```{}\n{}\n```\n\n---\n\n",
            file.relative_path, file.language, file.content
        )
    }
}
