/*!
 * Reading files into document sections
 */

use std::collections::HashMap;
use std::fs;

use once_cell::sync::Lazy;

use crate::types::{FileEntry, RenderedFile};

/// Content embedded for files that are not text
pub const BINARY_PLACEHOLDER: &str = "Binary file or unsupported encoding";

/// Tag used for extensions missing from the language table
pub const DEFAULT_LANGUAGE: &str = "text";

const MARKDOWN: &str = "markdown";
const FENCE: &str = "```";

/// Bytes inspected when deciding whether a file is binary
const SNIFF_LEN: usize = 8192;

/// Extension to fence tag mapping
pub static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (".py", "python"),
        (".js", "javascript"),
        (".ts", "typescript"),
        (".java", "java"),
        (".kt", "kotlin"),
        (".cpp", "cpp"),
        (".h", "c"),
        (".c", "c"),
        (".cs", "csharp"),
        (".go", "go"),
        (".rs", "rust"),
        (".rb", "ruby"),
        (".php", "php"),
        (".swift", "swift"),
        (".html", "html"),
        (".css", "css"),
        (".scss", "scss"),
        (".less", "less"),
        (".json", "json"),
        (".xml", "xml"),
        (".yml", "yaml"),
        (".yaml", "yaml"),
        (".toml", "toml"),
        (".ini", "ini"),
        (".conf", "ini"),
        (".env", "ini"),
        (".sh", "bash"),
        (".bash", "bash"),
        (".zsh", "bash"),
        (".fish", "bash"),
        (".ps1", "powershell"),
        (".csv", "csv"),
        (".tsv", "csv"),
        (".sql", "sql"),
        (".md", MARKDOWN),
        (".txt", "text"),
    ])
});

/// Fence tag for an extension such as `.rs`
pub fn language_for(extension: &str) -> &'static str {
    LANGUAGES
        .get(extension.to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Read a file and render it as a document section
///
/// Never fails: read errors and binary data are replaced by placeholder text.
pub fn render(entry: &FileEntry) -> RenderedFile {
    let content = match fs::read(&entry.absolute_path).map(decode) {
        Ok(Some(text)) if entry.language == MARKDOWN => extract_code_blocks(&text),
        Ok(Some(text)) => text,
        Ok(None) => {
            log::debug!("{} looks binary, embedding placeholder", entry.relative_path);
            BINARY_PLACEHOLDER.to_string()
        }
        Err(e) => {
            log::warn!("Failed to read {}: {}", entry.relative_path, e);
            format!("Error reading file: {}", e)
        }
    };

    RenderedFile {
        relative_path: entry.relative_path.clone(),
        language: entry.language,
        content,
    }
}

/// Decode as UTF-8, falling back to Latin-1; `None` for binary data
///
/// Valid UTF-8 is always text. Other data is sniffed before the Latin-1
/// fallback, which accepts any byte sequence.
pub fn decode(bytes: Vec<u8>) -> Option<String> {
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(e) => {
            let bytes = e.into_bytes();
            if looks_binary(&bytes) {
                return None;
            }
            Some(bytes.iter().map(|&b| b as char).collect())
        }
    }
}

/// NUL bytes or a high share of control characters in the leading sample
fn looks_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(SNIFF_LEN)];
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    let control = sample
        .iter()
        .filter(|&&b| b < 32 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c))
        .count();
    control as f32 / sample.len() as f32 >= 0.1
}

/// Keep only the tagged fenced regions of a Markdown text
///
/// Each region is re-emitted as its own fence followed by a blank line. Prose
/// and untagged fences are dropped.
pub fn extract_code_blocks(content: &str) -> String {
    let mut result = String::new();
    let mut language: Option<&str> = None;
    let mut block: Vec<&str> = Vec::new();

    for line in content.lines() {
        match (line.strip_prefix(FENCE), language) {
            (Some(tag), None) => {
                language = Some(tag.trim());
                block.clear();
            }
            (Some(_), Some(tag)) => {
                if !tag.is_empty() {
                    result.push_str(FENCE);
                    result.push_str(tag);
                    result.push('\n');
                    for body in block.drain(..) {
                        result.push_str(body);
                        result.push('\n');
                    }
                    result.push_str(FENCE);
                    result.push_str("\n\n");
                }
                block.clear();
                language = None;
            }
            (None, Some(_)) => block.push(line),
            (None, None) => {}
        }
    }

    result.truncate(result.trim_end_matches('\n').len());
    result
}
