/*!
 * Configuration handling for onefile
 */

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use serde::Deserialize;

use crate::error::{OfpError, Result, ResultExt};
use crate::locale::Locale;
use crate::{bail, ensure};

/// File name of the per-project configuration file
pub const CONFIG_FILE: &str = "project_documenter_config.json";

/// File name of the generated document when no output path is given
pub const DEFAULT_OUTPUT_FILE: &str = "project_documentation.md";

const DEFAULT_IGNORE_FOLDERS: &[&str] = &[".git", "__pycache__", ".venv"];

const DEFAULT_IGNORE_FILES: &[&str] = &[
    ".gitignore",
    ".env",
    CONFIG_FILE,
    "latest_paths.json",
    "*.md",
    // Images and media
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.bmp",
    "*.tiff",
    "*.svg",
    "*.mp3",
    "*.mp4",
    "*.avi",
    "*.mov",
    "*.wav",
    // Archives
    "*.zip",
    "*.tar",
    "*.gz",
    "*.rar",
    "*.7z",
    // Office documents
    "*.pdf",
    "*.doc",
    "*.docx",
    "*.xls",
    "*.xlsx",
    "*.ppt",
    "*.pptx",
    // Binaries
    "*.exe",
    "*.dll",
    "*.so",
    "*.bin",
    // Editors
    "*.iml",
    "*.swp",
    "*.swo",
    "*.ico",
    "*.icns",
    "*.jar",
    "*.war",
];

/// Rules deciding which paths take part in a pack run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Folder names excluded wherever they appear as a path segment
    pub ignore_folders: BTreeSet<String>,
    /// Globs matched against file base names
    pub ignore_files: Vec<String>,
    /// Globs matched against root-relative paths
    pub ignore_paths: Vec<String>,
    /// When non-empty, only these paths (and their ancestors) are included
    pub whitelist_paths: Vec<String>,
    /// Include entries whose name starts with `.`
    pub show_hidden: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore_folders: DEFAULT_IGNORE_FOLDERS.iter().map(|s| s.to_string()).collect(),
            ignore_files: DEFAULT_IGNORE_FILES.iter().map(|s| s.to_string()).collect(),
            ignore_paths: Vec::new(),
            whitelist_paths: Vec::new(),
            show_hidden: false,
        }
    }
}

impl FilterConfig {
    /// A configuration with no rules at all, hidden entries shown
    pub fn permissive() -> Self {
        Self {
            ignore_folders: BTreeSet::new(),
            ignore_files: Vec::new(),
            ignore_paths: Vec::new(),
            whitelist_paths: Vec::new(),
            show_hidden: true,
        }
    }

    /// Append an ignore-file pattern unless already present
    pub fn ignore_file(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !self.ignore_files.contains(&pattern) {
            self.ignore_files.push(pattern);
        }
    }
}

/// On-disk shape of `project_documenter_config.json`
///
/// The file also carries bookkeeping keys (`project_path`, ...) which are
/// ignored here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl ConfigFile {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!(Config, "Config file not found: {}", path.display());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let parsed: ConfigFile = serde_json::from_str(&content)?;
        Ok(parsed)
    }
}

/// Command-line arguments for onefile
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "ofp",
    version = env!("CARGO_PKG_VERSION"),
    about = "Pack a project directory into a single Markdown document",
    long_about = "Renders a directory tree and the content of every included file into one Markdown document, and unpacks such documents back into files."
)]
pub struct Args {
    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Pack a directory into a document
    Pack(PackArgs),
    /// Recreate files from a document
    Unpack(UnpackArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct PackArgs {
    /// Project directory to pack
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Output document path (default: <project>/project_documentation.md)
    pub output_file: Option<String>,

    /// Configuration file (default: <project>/project_documenter_config.json if present)
    #[clap(long)]
    pub config: Option<String>,

    /// Comma-separated folder names to ignore
    #[clap(long, value_delimiter = ',')]
    pub ignore_folders: Vec<String>,

    /// Comma-separated file name globs to ignore
    #[clap(long, value_delimiter = ',')]
    pub ignore_files: Vec<String>,

    /// Comma-separated relative path globs to ignore
    #[clap(long, value_delimiter = ',')]
    pub ignore_paths: Vec<String>,

    /// Comma-separated paths to include exclusively
    #[clap(long, value_delimiter = ',')]
    pub whitelist: Vec<String>,

    /// Include hidden files and folders
    #[clap(long)]
    pub show_hidden: bool,

    /// Language of the section titles
    #[clap(long, value_enum, default_value_t = Locale::default())]
    pub lang: Locale,

    /// Print the document to stdout instead of writing a file
    #[clap(long)]
    pub stdout: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct UnpackArgs {
    /// Document to unpack
    pub document: String,

    /// Directory to create the files in (must be empty or absent)
    pub target_dir: String,
}

/// Configuration of a pack run
#[derive(Clone, Debug)]
pub struct PackConfig {
    /// Project directory to pack
    pub target_dir: PathBuf,
    /// Output document path
    pub output_file: PathBuf,
    /// Filtering rules
    pub filter: FilterConfig,
    /// Section title language
    pub locale: Locale,
    /// Print instead of writing
    pub stdout: bool,
}

impl PackConfig {
    /// Create configuration from command-line arguments
    ///
    /// Loads the configuration file first, then extends its lists with the
    /// command-line values.
    pub fn from_args(args: PackArgs) -> Result<Self> {
        let target_dir = PathBuf::from(&args.directory_path);

        let file = match &args.config {
            Some(path) => ConfigFile::load(Path::new(path))?,
            None => {
                let local = target_dir.join(CONFIG_FILE);
                if local.is_file() {
                    log::info!("Using configuration {}", local.display());
                    ConfigFile::load(&local)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let mut filter = file.filter;
        filter.ignore_folders.extend(args.ignore_folders);
        filter.ignore_files = merge_vecs(filter.ignore_files, args.ignore_files);
        filter.ignore_paths = merge_vecs(filter.ignore_paths, args.ignore_paths);
        filter.whitelist_paths = merge_vecs(filter.whitelist_paths, args.whitelist);
        filter.show_hidden |= args.show_hidden;

        let output_file = args
            .output_file
            .map(PathBuf::from)
            .or(file.output_path)
            .unwrap_or_else(|| target_dir.join(DEFAULT_OUTPUT_FILE));

        // Never pack the document into itself
        if let Some(name) = output_file.file_name() {
            filter.ignore_file(name.to_string_lossy());
        }

        Ok(Self {
            target_dir,
            output_file,
            filter,
            locale: args.lang,
            stdout: args.stdout,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_dir.exists() {
            return Err(OfpError::SourceNotFound(self.target_dir.clone()));
        }
        ensure!(
            self.target_dir.is_dir(),
            InvalidArgument,
            "'{}' is not a directory",
            self.target_dir.display()
        );
        for pattern in &self.filter.ignore_paths {
            globset::Glob::new(pattern).map_err(|e| {
                OfpError::InvalidArgument(format!("invalid path pattern '{}': {}", pattern, e))
            })?;
        }
        Ok(())
    }
}

/// Configuration of an unpack run
#[derive(Clone, Debug)]
pub struct UnpackConfig {
    pub document: PathBuf,
    pub target_dir: PathBuf,
}

impl UnpackConfig {
    /// Create configuration from command-line arguments
    pub fn from_args(args: UnpackArgs) -> Self {
        Self {
            document: PathBuf::from(strip_quotes(&args.document)),
            target_dir: PathBuf::from(strip_quotes(&args.target_dir)),
        }
    }
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'')
}

/// Concatenate two lists, dropping repeats while keeping order
fn merge_vecs(base: Vec<String>, extra: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    base.into_iter()
        .chain(extra)
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack_args(dir: &str) -> PackArgs {
        PackArgs {
            directory_path: dir.to_string(),
            output_file: None,
            config: None,
            ignore_folders: vec![],
            ignore_files: vec![],
            ignore_paths: vec![],
            whitelist: vec![],
            show_hidden: false,
            lang: Locale::En,
            stdout: false,
        }
    }

    #[test]
    fn test_merge_vecs_keeps_order() {
        let merged = merge_vecs(
            vec!["a".into(), "b".into()],
            vec!["b".into(), "c".into(), "a".into()],
        );
        assert_eq!(merged, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_config_file_partial_keys() {
        let parsed: ConfigFile = serde_json::from_str(
            r#"{"project_path": "/tmp/x", "show_hidden": true, "ignore_paths": ["docs/*"]}"#,
        )
        .unwrap();
        assert!(parsed.filter.show_hidden);
        assert_eq!(parsed.filter.ignore_paths, vec!["docs/*"]);
        // Missing keys fall back to the defaults
        assert!(parsed.filter.ignore_folders.contains(".git"));
        assert!(parsed.output_path.is_none());
    }

    #[test]
    fn test_output_file_is_ignored() {
        let mut args = pack_args("/nonexistent/project");
        args.output_file = Some("/tmp/out/context.md".to_string());
        let config = PackConfig::from_args(args).unwrap();
        assert!(config.filter.ignore_files.contains(&"context.md".to_string()));

        let config = PackConfig::from_args(pack_args("/nonexistent/project")).unwrap();
        assert_eq!(
            config.output_file,
            PathBuf::from("/nonexistent/project").join(DEFAULT_OUTPUT_FILE)
        );
    }

    #[test]
    fn test_cli_lists_extend_defaults() {
        let mut args = pack_args("/nonexistent/project");
        args.ignore_folders = vec!["node_modules".into()];
        args.whitelist = vec!["src/".into()];
        let config = PackConfig::from_args(args).unwrap();
        assert!(config.filter.ignore_folders.contains("node_modules"));
        assert!(config.filter.ignore_folders.contains(".git"));
        assert_eq!(config.filter.whitelist_paths, vec!["src/"]);
    }

    #[test]
    fn test_validate_missing_dir() {
        let config = PackConfig::from_args(pack_args("/nonexistent/project")).unwrap();
        assert!(matches!(
            config.validate(),
            Err(OfpError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_path_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = pack_args(&dir.path().display().to_string());
        args.ignore_paths = vec!["src/[".into()];
        let config = PackConfig::from_args(args).unwrap();
        assert!(matches!(
            config.validate(),
            Err(OfpError::InvalidArgument(_))
        ));
    }
}
