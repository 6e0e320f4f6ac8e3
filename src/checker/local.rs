// src/checker/local.rs
// =============================================================================
// Checks references that point at files on disk.
//
// Two cases:
// - Same document: the resolved path is the document root or the directory
//   of the referring document ("#intro", "./#intro"). Only the anchor is
//   checked, against the referring document itself.
// - Another document: the file must exist. If the reference has a fragment,
//   the anchor must exist in that other document too. A missing file is
//   reported as such; we never try to look up anchors in it.
// =============================================================================

use super::LinkChecker;
use crate::error::CheckError;
use crate::resolve::document_dir;
use std::path::Path;
use tracing::trace;

impl LinkChecker {
    pub(super) async fn check_local(
        &self,
        path: &Path,
        fragment: Option<&str>,
        document: &Path,
    ) -> Result<(), CheckError> {
        if self.is_same_document(path, document) {
            trace!(document = %document.display(), ?fragment, "same-document reference");
            return match fragment {
                Some(anchor) => self.anchors.check_anchor(document, anchor).await,
                None => Ok(()),
            };
        }

        tokio::fs::metadata(path)
            .await
            .map_err(|e| CheckError::io(path, &e))?;

        if let Some(anchor) = fragment {
            self.anchors.check_anchor(path, anchor).await?;
        }

        Ok(())
    }

    fn is_same_document(&self, path: &Path, document: &Path) -> bool {
        self.config.document_root() == Some(path) || path == document_dir(document)
    }
}

#[cfg(test)]
mod tests {
    use crate::checker::testing::{checker, checker_with};
    use crate::config::CheckerConfig;
    use crate::error::CheckError;
    use crate::gate::ConcurrencyGate;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    // docs/
    //   guide.md      "# Guide" / "## Setup"
    //   notes.txt
    //   img/logo.png
    fn site() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(docs.join("img")).unwrap();
        fs::write(docs.join("guide.md"), "# Guide\n\n## Setup\n\nSee [top](#guide).\n").unwrap();
        fs::write(docs.join("notes.txt"), "plain text").unwrap();
        fs::write(docs.join("img").join("logo.png"), [0u8; 4]).unwrap();
        (dir, docs.join("guide.md"))
    }

    #[tokio::test]
    async fn test_same_document_anchor() {
        let (_dir, guide) = site();
        let checker = checker();

        assert_eq!(checker.check("#setup", &guide).await, Ok(()));
        assert_eq!(
            checker.check("#teardown", &guide).await,
            Err(CheckError::AnchorNotFound("teardown".to_string()))
        );
    }

    #[tokio::test]
    async fn test_same_document_without_fragment_succeeds() {
        let (_dir, guide) = site();
        let checker = checker();

        assert_eq!(checker.check("", &guide).await, Ok(()));
        assert_eq!(checker.check("./", &guide).await, Ok(()));
        // No anchor lookup happened, so nothing was parsed.
        assert_eq!(checker.anchors().parse_count(), 0);
    }

    #[tokio::test]
    async fn test_document_root_is_same_document() {
        let (dir, guide) = site();
        let config = CheckerConfig::new(Arc::new(ConcurrencyGate::new(1)))
            .with_document_root(dir.path());
        let checker = checker_with(config);

        assert_eq!(checker.check("/#guide", &guide).await, Ok(()));
        assert!(checker.check("/#nowhere", &guide).await.is_err());
    }

    #[tokio::test]
    async fn test_other_document_exists() {
        let (_dir, guide) = site();
        let checker = checker();

        assert_eq!(checker.check("img/logo.png", &guide).await, Ok(()));
        assert_eq!(checker.check("./notes.txt", &guide).await, Ok(()));
        assert_eq!(checker.check("guide.md#setup", &guide).await, Ok(()));
    }

    #[tokio::test]
    async fn test_other_document_missing_is_io_error() {
        let (_dir, guide) = site();
        let checker = checker();

        let err = checker.check("missing.md", &guide).await.unwrap_err();
        assert!(matches!(err, CheckError::Io(_)), "{:?}", err);

        // A fragment does not change that, and no parse is attempted.
        let err = checker.check("missing.md#intro", &guide).await.unwrap_err();
        assert!(matches!(err, CheckError::Io(_)), "{:?}", err);
        assert_eq!(checker.anchors().parse_count(), 0);
    }

    #[tokio::test]
    async fn test_other_document_anchor() {
        let (dir, guide) = site();
        let readme = dir.path().join("README.md");
        fs::write(&readme, "# Project\n").unwrap();
        let checker = checker();

        assert_eq!(checker.check("docs/guide.md#setup", &readme).await, Ok(()));
        assert_eq!(
            checker.check("docs/guide.md#install", &readme).await,
            Err(CheckError::AnchorNotFound("install".to_string()))
        );
        assert_eq!(checker.check("../README.md#project", &guide).await, Ok(()));
    }

    #[tokio::test]
    async fn test_anchor_in_non_markup_document_is_format_error() {
        let (_dir, guide) = site();
        let checker = checker();

        let err = checker.check("notes.txt#line-1", &guide).await.unwrap_err();
        assert!(matches!(err, CheckError::Format(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_root_relative_reference() {
        let (dir, guide) = site();
        let config = CheckerConfig::new(Arc::new(ConcurrencyGate::new(1)))
            .with_document_root(dir.path());
        let checker = checker_with(config);

        assert_eq!(checker.check("/docs/guide.md#setup", &guide).await, Ok(()));
        assert!(checker.check("/docs/absent.md", &guide).await.is_err());
    }
}
