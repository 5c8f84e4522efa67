//! Asset resolution module
//!
//! Implements the SPA lookup chain: the requested file under the primary
//! root (build output), then under the secondary root, then the entry
//! document from either root so a client-side router can handle the path.
//! Only when all three tiers miss does resolution report `NotFound`.

use crate::config::AssetsConfig;
use crate::http::mime;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Why a lookup ended without a file.
#[derive(Debug)]
pub enum ResolveError {
    /// Nothing matched in either root, including the entry document.
    NotFound,
    /// A filesystem fault other than absence (e.g. permission denied).
    /// Never folded into the fallback chain; the handler maps it to a 500.
    Io(io::Error),
}

/// A file picked by the lookup chain, ready to serve.
#[derive(Debug)]
pub struct ResolvedAsset {
    pub content: Vec<u8>,
    pub content_type: &'static str,
    /// True when the entry document was substituted for the requested path.
    pub is_entry_fallback: bool,
}

/// Resolve a request path against the asset roots.
///
/// An unsafe or empty path skips straight to the entry-document tier; for
/// SPA routing an unresolvable path is a client-side route, not an error.
pub async fn resolve(assets: &AssetsConfig, path: &str) -> Result<ResolvedAsset, ResolveError> {
    if let Some(relative) = sanitize_request_path(path) {
        if !relative.as_os_str().is_empty() {
            for root in [&assets.primary_root, &assets.secondary_root] {
                let candidate = Path::new(root).join(&relative);
                if let Some(content) = try_read(&candidate).await? {
                    let content_type = mime::get_content_type(
                        relative.extension().and_then(|e| e.to_str()),
                    );
                    return Ok(ResolvedAsset {
                        content,
                        content_type,
                        is_entry_fallback: false,
                    });
                }
            }
        }
    }

    resolve_entry_document(assets).await
}

/// Resolve the entry document, primary root first.
pub async fn resolve_entry_document(
    assets: &AssetsConfig,
) -> Result<ResolvedAsset, ResolveError> {
    let entry = Path::new(&assets.entry_document);
    for root in [&assets.primary_root, &assets.secondary_root] {
        let candidate = Path::new(root).join(entry);
        if let Some(content) = try_read(&candidate).await? {
            let content_type =
                mime::get_content_type(entry.extension().and_then(|e| e.to_str()));
            return Ok(ResolvedAsset {
                content,
                content_type,
                is_entry_fallback: true,
            });
        }
    }
    Err(ResolveError::NotFound)
}

/// Read a candidate file. `Ok(None)` is a miss (absent path or a
/// directory); any other failure is a fault that aborts resolution.
async fn try_read(candidate: &Path) -> Result<Option<Vec<u8>>, ResolveError> {
    let metadata = match fs::metadata(candidate).await {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ResolveError::Io(e)),
    };
    if !metadata.is_file() {
        return Ok(None);
    }
    match fs::read(candidate).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ResolveError::Io(e)),
    }
}

/// Reduce a request path to a relative path safe to join onto an asset
/// root. Parent-directory and rooted/prefix components reject the whole
/// path (a miss, which lands on the entry document).
fn sanitize_request_path(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim_start_matches('/');
    let mut clean = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(clean)
}
