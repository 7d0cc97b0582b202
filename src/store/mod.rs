//! Flat-file record store: one record per line, five `;`-separated fields in
//! the order title, artist, album, genre, year. No escaping, so field values
//! must not contain the delimiter.

pub mod query;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::models::{FieldSelector, TrackRecord};

pub const DELIMITER: char = ';';
const FIELD_COUNT: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),

    #[error("{field} of '{title}' contains a ';' or line break")]
    Delimiter { title: String, field: &'static str },
}

/// Parse one line. Lines without exactly five fields are rejected; blank
/// fields get the usual placeholders.
pub fn parse_line(line: &str) -> Option<TrackRecord> {
    let line = line.trim();
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return None;
    }

    let record = TrackRecord {
        title: fields[0].to_string(),
        artist: fields[1].to_string(),
        album: fields[2].to_string(),
        genre: fields[3].to_string(),
        year: fields[4].to_string(),
    };
    Some(record.with_placeholders())
}

pub fn format_line(record: &TrackRecord) -> Result<String, StoreError> {
    for selector in FieldSelector::ALL {
        let value = record.field(selector);
        if value.contains(DELIMITER) || value.contains(['\n', '\r']) {
            return Err(StoreError::Delimiter {
                title: record.title.clone(),
                field: selector.as_str(),
            });
        }
    }

    Ok(FieldSelector::ALL
        .iter()
        .map(|selector| record.field(*selector))
        .collect::<Vec<_>>()
        .join(";"))
}

/// Load all records from `path`. A missing file is an empty catalog.
pub fn load(path: &Path) -> Result<Vec<TrackRecord>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!("{} not found, starting with an empty playlist", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut records = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        match parse_line(line) {
            Some(record) => records.push(record),
            None => tracing::debug!("Skipping malformed line {} in {}", number + 1, path.display()),
        }
    }

    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write all records to `path`, creating parent directories as needed.
///
/// Every record is validated before the file is touched.
pub fn save(path: &Path, records: &[TrackRecord]) -> Result<(), StoreError> {
    let lines = records
        .iter()
        .map(format_line)
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(fs::File::create(path)?);
    for line in &lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    tracing::info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}
