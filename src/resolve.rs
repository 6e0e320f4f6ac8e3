// src/resolve.rs
// =============================================================================
// Resolves a raw link reference into the thing it points at.
//
// A reference found in a document is one of:
// - an absolute URL with a scheme ("https://example.com/x")   -> remote
// - a relative path ("../guide.md#setup", "#intro", "img.png") -> local,
//   relative to the directory of the referring document
// - a root-absolute path ("/docs/guide.md")                     -> local,
//   relative to the configured document root
// - a network-path reference ("//cdn.example.com/lib.js")       -> its
//   host is dropped and the path ("/lib.js") is taken as root-absolute
//
// For local targets the fragment (the part after '#') is split off so the
// checker can look it up as an anchor. Remote fragments are never checked,
// anchors only exist in documents we have on disk.
//
// Paths are cleaned lexically ("a/./b/../c" -> "a/c") without touching the
// filesystem, so the same file always ends up with the same path.
// =============================================================================

use crate::error::CheckError;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Where a reference points after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// A file on disk, with an optional anchor inside it.
    Local {
        path: PathBuf,
        fragment: Option<String>,
    },
    /// An external URL, kept exactly as written.
    Remote { url: String },
}

impl ResolvedTarget {
    pub fn is_local(&self) -> bool {
        matches!(self, ResolvedTarget::Local { .. })
    }

    /// The anchor to verify, if any. Always None for remote targets.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            ResolvedTarget::Local { fragment, .. } => fragment.as_deref(),
            ResolvedTarget::Remote { .. } => None,
        }
    }

    /// The resolved target as text; this is what exclusion patterns see.
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            ResolvedTarget::Local { path, .. } => path.to_string_lossy(),
            ResolvedTarget::Remote { url } => Cow::Borrowed(url),
        }
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fragment() {
            Some(fragment) => write!(f, "{}#{}", self.as_str(), fragment),
            None => f.write_str(&self.as_str()),
        }
    }
}

/// Resolves `reference`, found in `document`, into a target.
///
/// `document_root` is only needed for root-absolute references; without it
/// they fail with a configuration error.
pub fn resolve_target(
    reference: &str,
    document: &Path,
    document_root: Option<&Path>,
) -> Result<ResolvedTarget, CheckError> {
    // Url::parse only accepts absolute URLs. "Relative URL without a base"
    // is the one error that tells us the reference is local.
    match Url::parse(reference) {
        Ok(_) => {
            return Ok(ResolvedTarget::Remote {
                url: reference.to_string(),
            })
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {}
        Err(e) => return Err(CheckError::Parse(format!("{}: {}", reference, e))),
    }

    validate_relative(reference)?;

    let (before_fragment, fragment) = match reference.split_once('#') {
        Some((before, fragment)) => (before, Some(fragment)),
        None => (reference, None),
    };
    let raw_path = before_fragment
        .split_once('?')
        .map_or(before_fragment, |(path, _query)| path);
    let raw_path = strip_authority(raw_path);

    let path = decode(raw_path, reference)?;
    let fragment = match fragment {
        Some(fragment) if !fragment.is_empty() => Some(decode(fragment, reference)?),
        _ => None,
    };

    let path = if path.starts_with('/') {
        let root = document_root.ok_or_else(|| {
            CheckError::Configuration("document root directory is not specified".to_string())
        })?;
        // Joining an absolute path would replace the root.
        clean_path(&root.join(path.trim_start_matches('/')))
    } else {
        clean_path(&document_dir(document).join(&path))
    };

    Ok(ResolvedTarget::Local { path, fragment })
}

// "//host/path" names a host first; only "/path" is ours to look up. A bare
// "//host" has an empty path.
fn strip_authority(raw_path: &str) -> &str {
    match raw_path.strip_prefix("//") {
        Some(rest) => rest.find('/').map_or("", |slash| &rest[slash..]),
        None => raw_path,
    }
}

/// The directory a document's relative references are resolved against.
pub fn document_dir(document: &Path) -> PathBuf {
    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => clean_path(parent),
        _ => PathBuf::from("."),
    }
}

/// Lexically normalizes a path: drops "." components and folds ".." into
/// the preceding component where there is one. An empty result is ".".
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // ".." at the root is the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.into_iter().collect()
    }
}

// Rejects what a URL parser would reject in a relative reference: control
// characters and '%' not followed by two hex digits.
fn validate_relative(reference: &str) -> Result<(), CheckError> {
    if let Some(c) = reference.chars().find(|c| c.is_control()) {
        return Err(CheckError::Parse(format!(
            "{}: invalid control character {:?}",
            reference, c
        )));
    }

    let bytes = reference.as_bytes();
    for (i, _) in reference.match_indices('%') {
        let escape = bytes.get(i + 1..i + 3);
        let valid = matches!(escape, Some(hex) if hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(CheckError::Parse(format!(
                "{}: invalid percent-encoding",
                reference
            )));
        }
    }

    Ok(())
}

fn decode(text: &str, reference: &str) -> Result<String, CheckError> {
    percent_decode_str(text)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| CheckError::Parse(format!("{}: {}", reference, e)))
}
