//! Filesystem helpers shared by the repositories.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::common::error::{SentimentError, SentimentResult};

/// Replace `path` with `bytes`, creating parent directories as needed.
///
/// The content goes to a temp file in the target directory first and is renamed
/// over the destination, so a failed write leaves the previous file intact.
pub fn replace_file(path: &Path, bytes: &[u8]) -> SentimentResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|err| SentimentError::data_access(dir, err))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".sentiment")
        .tempfile_in(dir)
        .map_err(|err| SentimentError::data_access(path, err))?;
    temp.write_all(bytes)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|err| SentimentError::data_access(path, err))?;
    temp.persist(path)
        .map_err(|err| SentimentError::data_access(path, err.error))?;
    Ok(())
}
