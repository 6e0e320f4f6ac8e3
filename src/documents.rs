// src/documents.rs
// =============================================================================
// Turns the paths given on the command line into a list of documents.
//
// - A file is taken as-is if it is a Markdown or HTML file, and rejected
//   otherwise (we could not find any links in it)
// - A directory is only accepted with --recursive; it is walked with the
//   `walkdir` crate and every markup file below it is collected
//
// The result is sorted and free of duplicates so runs are reproducible.
//
// Documents are read as bytes and decoded lossily, the same way the anchor
// cache reads them, so a stray invalid byte does not hide a document's links.
// =============================================================================

use crate::anchors::is_markup_file;
use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects the documents to check from `paths`.
pub fn collect_documents(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>> {
    let mut documents = BTreeSet::new();

    for path in paths {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Cannot access '{}'", path.display()))?;

        if metadata.is_dir() {
            if !recursive {
                bail!(
                    "'{}' is a directory (use --recursive to check the documents inside it)",
                    path.display()
                );
            }

            for entry in WalkDir::new(path).follow_links(true) {
                let entry = entry
                    .with_context(|| format!("Failed to walk '{}'", path.display()))?;
                if entry.file_type().is_file() && is_markup_file(entry.path()) {
                    documents.insert(entry.into_path());
                }
            }
        } else if is_markup_file(path) {
            documents.insert(path.clone());
        } else {
            bail!("'{}' is not a Markdown or HTML file", path.display());
        }
    }

    Ok(documents.into_iter().collect())
}

/// Reads a document's text. Invalid UTF-8 becomes U+FFFD.
pub async fn read_document(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs/nested")).unwrap();
        fs::write(dir.path().join("README.md"), "# Readme").unwrap();
        fs::write(dir.path().join("docs/guide.md"), "# Guide").unwrap();
        fs::write(dir.path().join("docs/nested/page.html"), "<h1>Page</h1>").unwrap();
        fs::write(dir.path().join("docs/nested/data.json"), "{}").unwrap();
        dir
    }

    #[test]
    fn test_recursive_collects_markup_files() {
        let dir = tree();
        let documents = collect_documents(&[dir.path().to_path_buf()], true).unwrap();
        let names: Vec<_> = documents
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("README.md"),
                PathBuf::from("docs/guide.md"),
                PathBuf::from("docs/nested/page.html"),
            ]
        );
    }

    #[test]
    fn test_directory_requires_recursive() {
        let dir = tree();
        let err = collect_documents(&[dir.path().to_path_buf()], false).unwrap_err();
        assert!(err.to_string().contains("--recursive"));
    }

    #[test]
    fn test_files_are_deduplicated() {
        let dir = tree();
        let readme = dir.path().join("README.md");
        let documents = collect_documents(&[readme.clone(), readme.clone()], false).unwrap();
        assert_eq!(documents, vec![readme]);
    }

    #[test]
    fn test_rejects_non_markup_and_missing_files() {
        let dir = tree();
        assert!(collect_documents(&[dir.path().join("docs/nested/data.json")], false).is_err());
        assert!(collect_documents(&[dir.path().join("nope.md")], false).is_err());
    }

    #[tokio::test]
    async fn test_read_document_tolerates_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.md");
        fs::write(&path, b"[caf\xe9](other.md)\n\xff\n").unwrap();

        let text = read_document(&path).await.unwrap();
        assert!(text.contains("](other.md)"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn test_read_document_missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let err = read_document(&dir.path().join("gone.md")).await.unwrap_err();
        assert!(err.to_string().contains("gone.md"), "{}", err);
    }
}
