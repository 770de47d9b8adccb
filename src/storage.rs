//! Filesystem primitives (spec.md §1: "the core calls `open(path)`,
//! `read(path)`, `write(path, bytes)` on an abstract storage interface").
//!
//! The spec treats storage as an external collaborator the core merely
//! calls into; there is exactly one backing implementation in this crate
//! (the real filesystem via `tokio::fs`), so a trait boundary would be an
//! abstraction with a single impl and no second caller. These are thin
//! async wrappers, grounded on the teacher's use of `tokio::{fs, io}` for
//! its own example handlers.

use std::path::Path;
use tokio::fs;
use tokio::io;

/// Reads a file's full contents. Used by the GET handler, which needs the
/// byte-identical file content regardless of size (spec.md §8 "Binary
/// identity").
pub(crate) async fn read(path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path).await
}

/// Creates `dir` (and parents) if it does not already exist.
pub(crate) async fn ensure_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir).await
}

/// Writes `bytes` to `path`, creating or truncating the file.
pub(crate) async fn write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::write(path, bytes).await
}

/// True if `path` refers to an existing regular file (spec.md §4.1 step 6).
pub(crate) async fn is_regular_file(path: &Path) -> bool {
    matches!(fs::metadata(path).await, Ok(meta) if meta.is_file())
}
