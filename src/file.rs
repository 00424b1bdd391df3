// src/file.rs

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::config::ExportOptions;
use crate::report::Report;

/// Write `data` to `path` via a temp file in the same directory + rename.
/// Readers see either the old file or the new one, never a partial write.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    // fsync the directory so the rename itself is durable
    #[cfg(unix)]
    {
        if let Ok(d) = fs::File::open(dir) {
            let _ = d.sync_all();
        }
    }
    Ok(())
}

/// Write the status table as CSV/TSV. Returns the final path written to.
pub fn write_table_export(export: &ExportOptions, report: &Report) -> io::Result<PathBuf> {
    let path = resolve_export_path(&export.path, export.format.ext());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let contents = report.table_export(export.format.delim(), export.include_headers);
    write_atomic(&path, contents.as_bytes())?;
    Ok(path)
}

/// A trailing separator or an existing directory means "put `status.<ext>` in there".
pub fn resolve_export_path(user_path: &Path, ext: &str) -> PathBuf {
    if looks_like_dir_hint(user_path) || user_path.is_dir() {
        user_path.join(join!("status.", ext))
    } else {
        user_path.to_path_buf()
    }
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
