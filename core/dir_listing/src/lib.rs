//! Directory listing as an iterator over entry names.
//!
//! Wraps the OS directory stream: open once, read entries one at a time,
//! release the handle when the iterator is dropped.

use std::fs::{self, ReadDir};
use std::path::Path;

#[derive(Debug)]
pub struct DirList {
    entries: ReadDir,
}

impl DirList {
    /// Open `path` for listing. The error string carries the path and the
    /// OS error description; no iterator exists on failure.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let entries =
            fs::read_dir(path).map_err(|e| format!("can't open {}: {e}", path.display()))?;
        Ok(Self { entries })
    }
}

impl Iterator for DirList {
    type Item = String;

    /// Yields names in OS enumeration order, ending when the OS reports no
    /// more entries. A read error also ends the listing.
    fn next(&mut self) -> Option<String> {
        let entry = self.entries.next()?.ok()?;
        Some(entry.file_name().to_string_lossy().into_owned())
    }
}
