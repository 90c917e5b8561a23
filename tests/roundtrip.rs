/*!
 * Integration test for packing and unpacking through the public API
 */

use std::fs;
use std::path::Path;

use onefile::{pack, parse, unpack, FilterConfig, OfpError};
use tempfile::tempdir;

fn collect_files(root: &Path, base: &Path, out: &mut Vec<(String, String)>) {
    let mut entries: Vec<_> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_files(&path, base, out);
        } else {
            let rel = path.strip_prefix(base).unwrap().to_string_lossy().replace('\\', "/");
            out.push((rel, fs::read_to_string(&path).unwrap()));
        }
    }
}

#[test]
fn test_pack_unpack_pack_is_stable() {
    let temp_dir = tempdir().unwrap();
    let project = temp_dir.path().join("project");
    fs::create_dir_all(project.join("src").join("nested")).unwrap();
    fs::create_dir_all(project.join("node_modules").join("dep")).unwrap();

    fs::write(project.join("Cargo.toml"), "[package]\nname = \"demo\"\n").unwrap();
    fs::write(project.join("src").join("lib.rs"), "pub fn demo() {}\n").unwrap();
    fs::write(
        project.join("src").join("nested").join("query.sql"),
        "SELECT 1;",
    )
    .unwrap();
    fs::write(
        project.join("node_modules").join("dep").join("index.js"),
        "module.exports = 1;\n",
    )
    .unwrap();

    let filter = FilterConfig {
        ignore_folders: ["node_modules".to_string()].into_iter().collect(),
        ..FilterConfig::default()
    };

    let document = pack(&project, &filter).unwrap();
    assert!(!document.contains("node_modules"));

    let doc_path = temp_dir.path().join("project_documentation.md");
    fs::write(&doc_path, &document).unwrap();

    // Unpack into a directory with the same name so the repack matches byte for byte
    let restored = temp_dir.path().join("restored").join("project");
    let result = unpack(&doc_path, &restored).unwrap();
    assert_eq!(
        result.written,
        vec!["Cargo.toml", "src/lib.rs", "src/nested/query.sql"]
    );

    let mut source_files = Vec::new();
    collect_files(&project.join("src"), &project, &mut source_files);
    let mut restored_files = Vec::new();
    collect_files(&restored.join("src"), &restored, &mut restored_files);
    assert_eq!(source_files, restored_files);

    assert_eq!(pack(&restored, &filter).unwrap(), document);
}

#[test]
fn test_parse_reports_malformed_document() {
    let err = parse("no structure at all").unwrap_err();
    assert!(matches!(err, OfpError::MalformedDocument(_)));
}
