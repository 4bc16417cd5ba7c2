use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{CellValue, Dataset, Record, MAKE, MODEL, NUMERIC_COLUMNS};

/// Text tokens read as the missing marker, in any column.
const NA_TOKENS: [&str; 11] = [
    "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>", "-nan",
];

/// Delimiters considered when sniffing the header line.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Whole-file failures. Row-level numeric problems never surface here.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid delimited text: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} has no header row", .path.display())]
    Empty { path: PathBuf },
    #[error("{} line {line}: expected {expected} fields, found {found}", .path.display())]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read a delimited text file and return the cleaned vehicle table.
///
/// Cleaning steps, in order:
/// 1. parse rows keyed by header names
/// 2. normalise column names (trim, lowercase, spaces → `_`)
/// 3. if both `make` and `model` exist, drop rows missing either
/// 4. coerce [`NUMERIC_COLUMNS`] to numbers; unparsable cells become missing
pub fn load_and_clean(path: &Path) -> Result<Dataset, FileError> {
    let delimiter = detect_delimiter(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let raw_headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    if raw_headers.is_empty() {
        return Err(FileError::Empty {
            path: path.to_path_buf(),
        });
    }

    let columns = normalize_headers(raw_headers.iter());
    log::debug!("{}: columns {:?}", path.display(), columns);

    let numeric: Vec<bool> = columns
        .iter()
        .map(|c| NUMERIC_COLUMNS.contains(&c.as_str()))
        .collect();
    let require_identity = columns.iter().any(|c| c == MAKE) && columns.iter().any(|c| c == MODEL);

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for result in reader.records() {
        let row = result.map_err(|e| csv_error(path, e))?;
        if row.len() > columns.len() {
            return Err(FileError::RaggedRow {
                path: path.to_path_buf(),
                line: row.position().map(|p| p.line()).unwrap_or(0),
                expected: columns.len(),
                found: row.len(),
            });
        }

        let cells: BTreeMap<String, CellValue> = columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let raw = row.get(i).unwrap_or("");
                let value = if numeric[i] {
                    parse_number(raw)
                } else {
                    parse_text(raw)
                };
                (col.clone(), value)
            })
            .collect();
        let record = Record { cells };

        if require_identity && (record.get(MAKE).is_missing() || record.get(MODEL).is_missing()) {
            dropped += 1;
            continue;
        }
        records.push(record);
    }

    log::info!(
        "Loaded {} vehicles from {} ({} dropped without make/model)",
        records.len(),
        path.display(),
        dropped
    );

    Ok(Dataset::new(columns, records))
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// `" Top Speed "` → `"top_speed"`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Normalise every header; blank names become `unnamed_<index>` and later
/// duplicates get `_2`, `_3`, ... suffixes.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for (i, header) in raw.enumerate() {
        let mut base = normalize_column_name(header);
        if base.is_empty() {
            base = format!("unnamed_{i}");
        }
        let mut name = base.clone();
        let mut n = 2;
        while seen.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        if name != base {
            log::warn!("Duplicate column '{base}' renamed to '{name}'");
        }
        seen.insert(name.clone());
        columns.push(name);
    }
    columns
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

fn is_na(s: &str) -> bool {
    s.is_empty() || NA_TOKENS.contains(&s)
}

fn parse_text(s: &str) -> CellValue {
    if is_na(s) {
        CellValue::Missing
    } else {
        CellValue::Text(s.to_string())
    }
}

/// Lenient numeric coercion: anything that does not parse to a finite
/// number is missing.
fn parse_number(s: &str) -> CellValue {
    let s = s.trim();
    if is_na(s) {
        return CellValue::Missing;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => CellValue::Number(v),
        _ => CellValue::Missing,
    }
}

// ---------------------------------------------------------------------------
// Delimiter detection
// ---------------------------------------------------------------------------

/// Tab for `.tsv`/`.tab`, otherwise the most frequent candidate in the
/// header line (comma on ties or when none is present). Blank lines before
/// the header are skipped, as the csv reader skips them.
fn detect_delimiter(path: &Path) -> Result<u8, FileError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext == "tsv" || ext == "tab" {
        return Ok(b'\t');
    }

    let io_error = |source| FileError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_error)?;
    let mut reader = BufReader::new(file);
    let mut first_line = Vec::new();
    loop {
        first_line.clear();
        let read = reader.read_until(b'\n', &mut first_line).map_err(io_error)?;
        if read == 0 || first_line.iter().any(|&b| b != b'\n' && b != b'\r') {
            break;
        }
    }

    let mut best = (b',', 0usize);
    for &d in &CANDIDATE_DELIMITERS {
        let count = first_line.iter().filter(|&&b| b == d).count();
        if count > best.1 {
            best = (d, count);
        }
    }
    Ok(best.0)
}

fn csv_error(path: &Path, source: csv::Error) -> FileError {
    let path = path.to_path_buf();
    if !source.is_io_error() {
        return FileError::Csv { path, source };
    }
    match source.into_kind() {
        csv::ErrorKind::Io(source) => FileError::Io { path, source },
        other => FileError::Io {
            path,
            source: std::io::Error::other(format!("{other:?}")),
        },
    }
}
