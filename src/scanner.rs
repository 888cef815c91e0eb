// SPDX-License-Identifier: PMPL-1.0-or-later
//! Directory scanner for auditing every HTML document under a path.
//!
//! Walks directory trees, skipping hidden and excluded directories, and
//! audits `.html`/`.htm` files. A file that fails to read or parse is logged
//! and skipped; its siblings are still audited.

use crate::audit::{audit_file, AuditResult};
use crate::config::Config;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// File extensions to audit
const SCANNABLE_EXTENSIONS: &[&str] = &["html", "htm"];

fn is_scannable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SCANNABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// HTML files under `dir` in sorted walk order
pub fn html_files(dir: &Path, exclude: &[String]) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or("");
            !name.starts_with('.') && !exclude.iter().any(|x| x == name)
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_scannable(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Audit every HTML file under a directory
pub fn scan_directory(dir: &Path, config: &Config) -> Result<Vec<AuditResult>> {
    info!("Scanning directory: {}", dir.display());

    let mut results = Vec::new();
    for path in html_files(dir, &config.scan.exclude) {
        match audit_file(&path, config) {
            Ok(result) => results.push(result),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    let issues: usize = results.iter().map(|r| r.findings.len()).sum();
    info!("Scanned {} files, found {} issues", results.len(), issues);

    Ok(results)
}

/// Audit a single file, or every HTML file when given a directory
pub fn scan_path(path: &Path, config: &Config) -> Result<Vec<AuditResult>> {
    if path.is_dir() {
        scan_directory(path, config)
    } else {
        Ok(vec![audit_file(path, config)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_nonexistent_dir() {
        let results = scan_directory(Path::new("/nonexistent/path"), &Config::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_skips_hidden_and_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("site/sub")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join("site/index.html"), "<title>A</title>").unwrap();
        fs::write(root.join("site/sub/about.HTM"), "<title>B</title>").unwrap();
        fs::write(root.join("site/style.css"), "body {}").unwrap();
        fs::write(root.join("node_modules/pkg/readme.html"), "<p>x</p>").unwrap();
        fs::write(root.join(".cache/page.html"), "<p>x</p>").unwrap();

        let files = html_files(root, &Config::default().scan.exclude);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["site/index.html", "site/sub/about.HTM"]);
    }

    #[test]
    fn test_scan_path_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.html");
        fs::write(&file, r#"<html lang="en"><title>Page</title><img src="a.png"></html>"#).unwrap();

        let results = scan_path(&file, &Config::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].page_title, "Page");
        assert!(!results[0].findings.by_rule("NON_TEXT_001").is_empty());
    }
}
