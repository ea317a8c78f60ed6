use std::fs::{self, File, Permissions};
use std::io::BufReader;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tempfile::NamedTempFile;

use crate::config::SaveMode;
use crate::error::{Result, ScrapeError};
use crate::record::{BookRecord, BookTable, COLUMNS};

/// Writes `table` to `path` as CSV, replacing the file only once it is complete.
///
/// In append mode the rows already in `path` are kept ahead of `table`.
pub fn save(table: &BookTable, path: &Path, mode: SaveMode) -> Result<()> {
    let existing = match mode {
        SaveMode::Append if path.exists() => load(path)?,
        _ => BookTable::new(),
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp.as_file_mut());

        writer.write_record(COLUMNS)?;
        for record in existing.iter().chain(table.iter()) {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.as_file().set_permissions(output_permissions(path, temp.as_file())?)?;

    temp.persist(path).map_err(|e| ScrapeError::Io(e.error))?;

    tracing::info!(
        path = %path.display(),
        rows = existing.len() + table.len(),
        ?mode,
        "saved table"
    );
    Ok(())
}

/// Permissions for the finished file: those of the file being replaced, or
/// world-readable for a new one. Temp files are created owner-only.
fn output_permissions(path: &Path, temp: &File) -> Result<Permissions> {
    if let Ok(metadata) = fs::metadata(path) {
        return Ok(metadata.permissions());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = temp;
        Ok(Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        Ok(temp.metadata()?.permissions())
    }
}

/// Reads a table written by [`save`]. Extra columns are ignored.
pub fn load(path: &Path) -> Result<BookTable> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(ScrapeError::FileFormat {
            path: path.to_path_buf(),
            message: format!("missing required column(s): {}", missing.join(", ")),
        });
    }

    reader
        .deserialize::<BookRecord>()
        .enumerate()
        .map(|(index, row)| {
            row.map_err(|e| ScrapeError::FileFormat {
                path: path.to_path_buf(),
                message: format!("row {}: {e}", index + 1),
            })
        })
        .collect()
}
