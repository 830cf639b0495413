//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::FolioError;

/// Read a text file, returning `None` if it doesn't exist
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<Option<String>, FolioError> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| FolioError::Storage(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write text to a file atomically (write to temp, then rename)
///
/// The target is either completely written or not modified at all.
pub fn write_text_atomic<P: AsRef<Path>>(path: P, contents: &str) -> Result<(), FolioError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            write_error(
                e,
                format!("Failed to create directory {}", parent.display()),
            )
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension("tmp");

    let result = (|| -> io::Result<()> {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        fs::rename(&temp_path, path)
    })();

    result.map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        write_error(e, format!("Failed to write {}", path.display()))
    })
}

fn write_error(err: io::Error, context: String) -> FolioError {
    if is_out_of_space(&err) {
        FolioError::StorageFull(format!("{}: {}", context, err))
    } else {
        FolioError::Storage(format!("{}: {}", context, err))
    }
}

fn is_out_of_space(err: &io::Error) -> bool {
    // ENOSPC / EDQUOT on unix, ERROR_DISK_FULL / ERROR_HANDLE_DISK_FULL on windows
    match err.raw_os_error() {
        Some(code) if cfg!(unix) => code == 28 || code == 122,
        Some(code) if cfg!(windows) => code == 112 || code == 39,
        _ => false,
    }
}
