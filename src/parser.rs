/*!
 * Parsing project documents back into files
 *
 * The parser is a line-oriented state machine:
 *
 * ```text
 * SeekStructure -> InStructureFence -> SeekContentHeader -> InContentFence
 *                                              ^                  |
 *                                              |                  v
 *                                              +------ SeekNextHeaderOrEnd
 * ```
 *
 * A content fence is closed by the first bare fence line that is followed by
 * the `---` separator and then either the next `## ` header or the end of the
 * document. Fence lines inside embedded content therefore do not end the
 * block early. Documents edited by hand that lack the separator fall back to
 * the first bare fence line.
 */

use crate::error::{OfpError, Result};
use crate::locale::Locale;
use crate::types::ParsedDocument;

const FENCE: &str = "```";
const SEPARATOR: &str = "---";
const FILE_HEADER: &str = "## ";
const SECTION_HEADER: &str = "# ";

/// Characters of the tree rendering that may leak into a header
const TREE_CHARS: &[char] = &['│', '├', '└', '─'];

#[derive(Debug)]
enum State {
    /// Looking for `# <structure title>: <root>`, then its opening fence
    SeekStructure { titled: bool },
    /// Inside the tree fence; the first line names the root
    InStructureFence { first: bool },
    /// Looking for `## <path>` followed by an opening fence
    SeekContentHeader { pending: Option<String> },
    /// Skipping body lines until the precomputed closing line
    InContentFence {
        path: String,
        body_start: usize,
        close: usize,
    },
    /// After a closed block, looking for the next header
    SeekNextHeaderOrEnd,
}

/// Parse a document into its root name and files
pub fn parse(text: &str) -> Result<ParsedDocument> {
    DocumentParser::new(text).run()
}

struct DocumentParser<'a> {
    lines: Vec<&'a str>,
    header_root: String,
    document: ParsedDocument,
}

impl<'a> DocumentParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
            header_root: String::new(),
            document: ParsedDocument::default(),
        }
    }

    fn run(mut self) -> Result<ParsedDocument> {
        let mut state = State::SeekStructure { titled: false };

        for pos in 0..self.lines.len() {
            state = self.step(state, pos);
        }

        match state {
            State::SeekStructure { .. } => Err(OfpError::MalformedDocument(
                "project structure section not found".to_string(),
            )),
            State::InStructureFence { .. } => Err(OfpError::MalformedDocument(
                "project structure section is not closed".to_string(),
            )),
            State::InContentFence { path, .. } => {
                log::warn!("Unterminated content block for {}", path);
                Ok(self.document)
            }
            _ => Ok(self.document),
        }
    }

    fn step(&mut self, state: State, pos: usize) -> State {
        let line = token(self.lines[pos]);

        match state {
            State::SeekStructure { titled: false } => {
                match line
                    .strip_prefix(SECTION_HEADER)
                    .and_then(Locale::match_structure_header)
                {
                    Some((locale, root)) => {
                        log::debug!("Structure section ({}) at line {}", locale, pos + 1);
                        self.header_root = root.to_string();
                        State::SeekStructure { titled: true }
                    }
                    None => State::SeekStructure { titled: false },
                }
            }
            State::SeekStructure { titled: true } => {
                if line.starts_with(FENCE) {
                    State::InStructureFence { first: true }
                } else {
                    State::SeekStructure { titled: true }
                }
            }
            State::InStructureFence { first } => {
                if line == FENCE {
                    if self.document.root_name.is_empty() {
                        self.document.root_name = self.header_root.clone();
                    }
                    return State::SeekContentHeader { pending: None };
                }
                if first {
                    self.document.root_name = root_name(line);
                }
                State::InStructureFence { first: false }
            }
            State::SeekContentHeader { pending } => self.seek_header(pending, line, pos),
            State::SeekNextHeaderOrEnd => self.seek_header(None, line, pos),
            State::InContentFence {
                path,
                body_start,
                close,
            } => {
                if pos < close {
                    return State::InContentFence {
                        path,
                        body_start,
                        close,
                    };
                }
                let mut content = self.lines[body_start..close].join("\n");
                // CRLF documents: the last body line carries the writer's line ending
                if self.lines[close].ends_with('\r') && content.ends_with('\r') {
                    content.pop();
                }
                let path = normalize_path(&path, &self.document.root_name);
                log::debug!("Recovered {} ({} bytes)", path, content.len());
                self.document.insert(path, content);
                State::SeekNextHeaderOrEnd
            }
        }
    }

    fn seek_header(&self, pending: Option<String>, line: &str, pos: usize) -> State {
        if let Some(path) = line.strip_prefix(FILE_HEADER) {
            return State::SeekContentHeader {
                pending: Some(path.to_string()),
            };
        }

        match pending {
            Some(path) if line.starts_with(FENCE) => match self.find_close(pos + 1) {
                Some(close) => State::InContentFence {
                    path,
                    body_start: pos + 1,
                    close,
                },
                None => {
                    log::warn!("No closing fence for {}, skipping", path.trim());
                    State::SeekNextHeaderOrEnd
                }
            },
            Some(path) if line.trim().is_empty() => State::SeekContentHeader {
                pending: Some(path),
            },
            Some(path) => {
                log::debug!("Header {} is not followed by a fence", path.trim());
                State::SeekContentHeader { pending: None }
            }
            None => State::SeekContentHeader { pending: None },
        }
    }

    /// Index of the line closing a content fence whose body starts at `start`
    fn find_close(&self, start: usize) -> Option<usize> {
        let mut first_bare = None;
        for i in start..self.lines.len() {
            if token(self.lines[i]) != FENCE {
                continue;
            }
            if self.closes_block(i) {
                return Some(i);
            }
            first_bare.get_or_insert(i);
        }
        first_bare
    }

    /// `` ``` ``, blank, `---`, then blanks up to the next header or the end
    fn closes_block(&self, fence: usize) -> bool {
        let rest = &self.lines[fence + 1..];
        let mut rest = rest.iter().map(|l| token(*l));

        if rest.next() != Some("") || rest.next() != Some(SEPARATOR) {
            // A block at the very end without separator
            return self.lines[fence + 1..].iter().all(|l| token(*l).is_empty());
        }
        match rest.find(|l| !l.is_empty()) {
            None => true,
            Some(next) => next.starts_with(FILE_HEADER),
        }
    }
}

/// Line with any trailing carriage return removed
fn token(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// Root folder name from the first line of the tree fence
fn root_name(line: &str) -> String {
    let line = line.trim().trim_end_matches(['/', '\\']);
    line.split('/').next().unwrap_or_default().to_string()
}

/// Relative path from a `## ` header
fn normalize_path(raw: &str, root_name: &str) -> String {
    let raw = raw.trim();
    let raw = if root_name.is_empty() {
        raw
    } else {
        raw.strip_prefix(root_name)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(raw)
    };
    raw.replace(TREE_CHARS, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Project Structure: proj\n\n```\nproj/\n├── a.py\n└── sub/\n    └── b.txt\n```\n\n# Files Content\n\n## a.py\n\n```python\nprint(1)\n```\n\n---\n\n\n## sub/b.txt\n\n```text\nhello\n```\n\n---\n\n";

    #[test]
    fn test_parse_basic() {
        let doc = parse(DOC).unwrap();
        assert_eq!(doc.root_name, "proj");
        let paths: Vec<&str> = doc.files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["a.py", "sub/b.txt"]);
        assert_eq!(doc.get("a.py"), Some("print(1)"));
        assert_eq!(doc.get("sub/b.txt"), Some("hello"));
    }

    #[test]
    fn test_missing_structure_is_malformed() {
        let err = parse("# Files Content\n\n## a.py\n\n```python\nx\n```\n").unwrap_err();
        assert!(matches!(err, OfpError::MalformedDocument(_)));

        let err = parse("# Project Structure: p\n\n```\np/\n├── a.py\n").unwrap_err();
        assert!(matches!(err, OfpError::MalformedDocument(_)));
    }

    #[test]
    fn test_russian_titles() {
        let text = "# Структура проекта: демо\n\n```\nдемо/\n└── a.txt\n```\n\n# Содержимое файлов\n\n## a.txt\n\n```text\nпривет\n```\n\n---\n\n";
        let doc = parse(text).unwrap();
        assert_eq!(doc.root_name, "демо");
        assert_eq!(doc.get("a.txt"), Some("привет"));
    }

    #[test]
    fn test_nested_fences_stay_inside_block() {
        let text = "# Project Structure: p\n\n```\np/\n├── notes.txt\n└── z.txt\n```\n\n# Files Content\n\n## notes.txt\n\n```text\nbefore\n```\n\n## not a header\n```rust\nfn main() {}\n```\nafter\n```\n\n---\n\n\n## z.txt\n\n```text\nz\n```\n\n---\n\n";
        let doc = parse(text).unwrap();
        assert_eq!(doc.files.len(), 2);
        assert_eq!(
            doc.get("notes.txt"),
            Some("before\n```\n\n## not a header\n```rust\nfn main() {}\n```\nafter")
        );
        assert_eq!(doc.get("z.txt"), Some("z"));
    }

    #[test]
    fn test_path_normalization() {
        let text = "# Project Structure: proj\n\n```\nproj/\n```\n\n## proj/src/lib.rs\n\n```rust\n\n```\n\n---\n\n\n## │   └── x.txt  \n\n```text\nx\n```\n";
        let doc = parse(text).unwrap();
        let paths: Vec<&str> = doc.files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["src/lib.rs", "x.txt"]);
        assert_eq!(doc.get("src/lib.rs"), Some(""));
    }

    #[test]
    fn test_missing_separator_uses_first_fence() {
        let text = "# Project Structure: p\n\n```\np/\n```\n\n## a.txt\n```text\none\n```\n## b.txt\n```text\ntwo\n```\ntrailing prose\n";
        let doc = parse(text).unwrap();
        assert_eq!(doc.get("a.txt"), Some("one"));
        assert_eq!(doc.get("b.txt"), Some("two"));
    }

    #[test]
    fn test_repeated_path_keeps_position() {
        let text = "# Project Structure: p\n\n```\np/\n```\n\n## a.txt\n\n```text\nold\n```\n\n---\n\n\n## b.txt\n\n```text\nb\n```\n\n---\n\n\n## a.txt\n\n```text\nnew\n```\n\n---\n\n";
        let doc = parse(text).unwrap();
        assert_eq!(doc.files.len(), 2);
        assert_eq!(doc.files[0].relative_path, "a.txt");
        assert_eq!(doc.get("a.txt"), Some("new"));
    }

    #[test]
    fn test_crlf_document() {
        let text = DOC.replace('\n', "\r\n");
        let doc = parse(&text).unwrap();
        assert_eq!(doc.root_name, "proj");
        assert_eq!(doc.get("a.py"), Some("print(1)"));
    }
}
