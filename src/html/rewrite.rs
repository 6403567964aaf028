//! In-place link rewriting for saved HTML documents
//!
//! Rewrites `href`/`src` attribute values to paths relative to the file's
//! own directory so a saved page can be browsed offline.

use std::path::Path;

use scraper::{Html, Node};
use url::Url;

use crate::core::error::{Error, Result};

/// Rewrite every `href` and `src` attribute in the HTML file at `path` to a
/// path relative to the file's containing directory, then overwrite the file
/// with the re-serialized document.
///
/// `mailto:` values, unparseable references and references whose relative
/// path cannot be computed are left untouched; only failing to read, parse a
/// base for, or write the file aborts the operation. Already-relative values
/// resolve straight back to themselves, so running the rewrite again is a
/// no-op.
pub fn rewrite_links(path: &Path) -> Result<()> {
    let markup = std::fs::read_to_string(path).map_err(Error::IoError)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = dir.canonicalize().map_err(Error::IoError)?;
    let base = Url::from_directory_path(&dir).map_err(|_| {
        Error::ParseError(format!("cannot form a base URL from {}", dir.display()))
    })?;

    let mut document = Html::parse_document(&markup);
    for node in document.tree.values_mut() {
        let Node::Element(element) = node else { continue };
        for (name, value) in element.attrs.iter_mut() {
            let attr: &str = &name.local;
            if attr != "href" && attr != "src" {
                continue;
            }
            if let Some(rewritten) = relativize(&base, value) {
                *value = rewritten.as_str().into();
            }
        }
    }

    std::fs::write(path, document.html()).map_err(Error::IoError)?;
    Ok(())
}

/// Resolve `value` against `base` and express the result relative to the
/// base directory. `None` leaves the attribute untouched.
fn relativize(base: &Url, value: &str) -> Option<String> {
    let resolved = match Url::parse(value) {
        Ok(url) if url.scheme() == "mailto" => return None,
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(value).ok()?,
        Err(_) => return None,
    };
    relative_path(base.path(), resolved.path())
}

/// Compute `target` relative to the directory `base`, both given as
/// absolute URL paths.
fn relative_path(base: &str, target: &str) -> Option<String> {
    if !base.starts_with('/') || !target.starts_with('/') {
        return None;
    }

    let base_segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    let target_segments: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let common = base_segments
        .iter()
        .zip(&target_segments)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..base_segments.len() {
        parts.push("..");
    }
    parts.extend(&target_segments[common..]);

    if parts.is_empty() {
        return Some(".".to_string());
    }
    Some(parts.join("/"))
}
