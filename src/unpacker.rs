/*!
 * Recreating files from a project document
 */

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{OfpError, Result};
use crate::parser;
use crate::types::{UnpackResult, UnpackWarning};

/// Unpack the document at `document` into `target_dir`
///
/// Fails before touching the filesystem when the document is missing, the
/// target already has entries, or the document has no structure section.
/// Individual files that cannot be written are reported as warnings.
pub fn unpack(document: &Path, target_dir: &Path) -> Result<UnpackResult> {
    if !document.is_file() {
        return Err(OfpError::SourceNotFound(document.to_path_buf()));
    }
    if target_dir.exists() && fs::read_dir(target_dir)?.next().is_some() {
        return Err(OfpError::TargetNotEmpty(target_dir.to_path_buf()));
    }

    let bytes = fs::read(document)?;
    let text = String::from_utf8_lossy(&bytes);
    let parsed = parser::parse(&text)?;

    fs::create_dir_all(target_dir)?;

    let mut result = UnpackResult {
        root_name: parsed.root_name,
        ..UnpackResult::default()
    };

    for file in parsed.files {
        match write_file(target_dir, &file.relative_path, &file.content) {
            Ok(()) => {
                log::debug!("Created {}", file.relative_path);
                result.written.push(file.relative_path);
            }
            Err(reason) => {
                log::warn!("Failed to create {}: {}", file.relative_path, reason);
                result.warnings.push(UnpackWarning {
                    path: file.relative_path,
                    reason,
                });
            }
        }
    }

    log::info!(
        "Unpacked {} files into {} ({} warnings)",
        result.written.len(),
        target_dir.display(),
        result.warnings.len()
    );
    Ok(result)
}

fn write_file(target_dir: &Path, relative_path: &str, content: &str) -> std::result::Result<(), String> {
    let path = resolve(target_dir, relative_path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::write(&path, content).map_err(|e| e.to_string())
}

/// Join a document path onto the target, refusing paths that leave it
fn resolve(target_dir: &Path, relative_path: &str) -> std::result::Result<PathBuf, String> {
    if relative_path.is_empty() {
        return Err("empty path".to_string());
    }

    let mut path = target_dir.to_path_buf();
    for component in Path::new(relative_path).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            _ => return Err(format!("unsafe path '{}'", relative_path)),
        }
    }
    Ok(path)
}
