/*!
 * onefile - Pack a project directory into a single Markdown document
 *
 * The document holds a rendered directory tree followed by the content of
 * every included file, and can be unpacked back into a directory.
 */

pub mod config;
pub mod error;
pub mod filter;
pub mod locale;
pub mod packer;
pub mod parser;
pub mod renderer;
pub mod report;
pub mod scanner;
pub mod types;
pub mod unpacker;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{FilterConfig, PackConfig, UnpackConfig};
pub use error::{OfpError, Result};
pub use locale::Locale;
pub use packer::{pack, Packer};
pub use parser::parse;
pub use report::{PackReport, Reporter, ReportFormat};
pub use scanner::Scanner;
pub use types::{FileEntry, ParsedDocument, ProjectDocument, RenderedFile, UnpackResult, UnpackWarning};
pub use unpacker::unpack;
pub use utils::format_file_size;
pub use writer::MarkdownWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
