//! JSON persistence of stream records.

use crate::error::StorageError;
use crate::record::StreamRecord;
use chrono::{Local, NaiveDate};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// `YYYY-MM-DD.json`
pub fn default_filename(date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("{}.json", date.format("%Y-%m-%d")))
}

/// Write `records` as a JSON array, returning the path written.
///
/// Without a filename the records go to `<today>.json` in the working directory.
pub fn to_json(records: &[StreamRecord], filename: Option<&Path>) -> Result<PathBuf, StorageError> {
    let path = match filename {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => {
            warn!("No filename was provided, using datestamp as filename");
            default_filename(Local::now().date_naive())
        }
    };

    let write_error = |source| StorageError::Write {
        path: path.clone(),
        source,
    };

    let file = File::create(&path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, records).map_err(|source| StorageError::Serialize {
        path: path.clone(),
        source,
    })?;
    writer.flush().map_err(write_error)?;

    info!("Successfully wrote {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Read records written by [`to_json`].
///
/// A file that cannot be opened or read yields an empty list; content that is
/// not a list of records is an error.
pub fn read_json(filename: &Path) -> Result<Vec<StreamRecord>, StorageError> {
    let mut content = Vec::new();
    if let Err(e) = File::open(filename).and_then(|mut file| file.read_to_end(&mut content)) {
        error!("Failed to read {}: {}", filename.display(), e);
        return Ok(Vec::new());
    }

    let records: Vec<StreamRecord> =
        serde_json::from_slice(&content).map_err(|source| StorageError::Parse {
            path: filename.to_path_buf(),
            source,
        })?;

    info!("Successfully read {} records from {}", records.len(), filename.display());
    Ok(records)
}
