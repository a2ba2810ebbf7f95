use crate::error::{ReportError, Result};
use crate::types::ListedFile;
use log::debug;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// Directory containing the running executable. Used as both scan root and export directory.
pub fn resolve_working_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(ReportError::WorkingDirectory)?;
    let dir = exe.parent().ok_or_else(|| {
        ReportError::WorkingDirectory(io::Error::other(format!(
            "executable path {} has no parent directory",
            exe.display()
        )))
    })?;
    debug!("resolved working directory: {}", dir.display());
    Ok(dir.to_path_buf())
}

/// Regular files directly inside `dir`, in the order the OS enumerates them.
pub fn list_files(dir: &Path) -> Result<Vec<ListedFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| ReportError::ListDirectory {
            path: dir.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let metadata = entry.metadata().map_err(|e| ReportError::ReadMetadata {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        files.push(ListedFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            created: creation_time(&metadata, path)?,
        });
    }

    debug!("listed {} regular files in {}", files.len(), dir.display());
    Ok(files)
}

/// Birth time when the platform records one, otherwise the last-modified time.
fn creation_time(metadata: &Metadata, path: &Path) -> Result<SystemTime> {
    match metadata.created() {
        Ok(created) => Ok(created),
        Err(err) => {
            debug!(
                "no creation time for {} ({err}), using last-modified time",
                path.display()
            );
            metadata.modified().map_err(|source| ReportError::ReadMetadata {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
