//! Path guard (spec.md §4.1): the document-root containment check.
//!
//! Two independent layers, per the spec's rationale: a substring blocklist
//! for obvious attacks (cheap, logged as a security event), and a
//! canonical-prefix check against the resolved absolute path as the
//! authoritative guarantee. Either layer failing is sufficient to reject.

use crate::errors::ErrorKind;
use std::path::{Path, PathBuf};

/// Resolves a request target to an absolute path under `root`, or a
/// classified rejection. Existence of the resolved path as a regular file
/// is checked by the caller (this function is pure and does no I/O beyond
/// `canonicalize`, which the filesystem already requires to exist).
pub(crate) fn resolve(target: &str, root: &Path) -> Result<PathBuf, ErrorKind> {
    if target.contains("..") || target.starts_with("//") {
        return Err(ErrorKind::Forbidden(target.to_string()));
    }

    let stripped = target.strip_prefix('/').unwrap_or(target);
    let relative = if stripped.is_empty() {
        "index.html"
    } else {
        stripped
    };

    let root = root
        .canonicalize()
        .map_err(|_| ErrorKind::Forbidden(target.to_string()))?;
    let joined = root.join(relative);
    let normalized = normalize(&joined);

    if !normalized.starts_with(&root) {
        return Err(ErrorKind::Forbidden(target.to_string()));
    }

    Ok(normalized)
}

/// Lexically normalizes `.`/`..` components without touching the
/// filesystem; `path` need not exist yet (the caller still must verify
/// existence before serving it).
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}
