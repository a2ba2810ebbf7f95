use crate::error::{ReportError, Result};
use crate::types::{FileReportEntry, REPORT_HEADER};
use csv::{QuoteStyle, Writer, WriterBuilder};
use log::info;
use std::fs;
use std::io;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// Writes the report as UTF-8 CSV, replacing `dest` only once every row is on disk.
pub fn export_report(entries: &[FileReportEntry], dest: &Path) -> Result<()> {
    write_csv_atomic(dest, |writer| {
        writer.write_record(REPORT_HEADER)?;
        for entry in entries {
            writer.serialize(entry)?;
        }
        Ok(())
    })?;

    info!("wrote {} rows to {}", entries.len(), dest.display());
    Ok(())
}

/// Runs `write_rows` against a headerless CSV writer backed by a temporary file next to
/// `dest`, then renames the temporary file over `dest`. On any error `dest` is untouched.
pub fn write_csv_atomic<F>(dest: &Path, write_rows: F) -> Result<()>
where
    F: FnOnce(&mut Writer<NamedTempFile>) -> csv::Result<()>,
{
    let export_err = |source: io::Error| ReportError::Export {
        path: dest.to_path_buf(),
        source,
    };

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = new_report_file(dir, dest).map_err(export_err)?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(tmp);

    write_rows(&mut writer).map_err(|source| ReportError::Csv {
        path: dest.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(export_err)?;

    let tmp = writer
        .into_inner()
        .map_err(|e| export_err(io::Error::other(e.to_string())))?;
    tmp.as_file().sync_all().map_err(export_err)?;
    tmp.persist(dest).map_err(|e| export_err(e.error))?;

    Ok(())
}

/// Temp file that ends up with the mode a plain `File::create` of `dest` would give:
/// the existing report's mode, or 0666 less the umask for a new one.
fn new_report_file(dir: &Path, dest: &Path) -> io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;

    if let Ok(existing) = fs::metadata(dest) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    Ok(tmp)
}
