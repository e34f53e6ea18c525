use crate::error::{AnalysisError, Result};
use crate::normalize::normalize_rows;
use crate::schema::{CanonicalField, FieldValue, Record};
use log::{debug, info, warn};
use regex::Regex;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    /// Plain text already extracted from a PDF statement.
    PdfText,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "txt" => Ok(SourceFormat::PdfText),
            _ => Err(AnalysisError::UnsupportedFileType(
                path.display().to_string(),
            )),
        }
    }
}

/// Rows decoded from one file, normalized and attributed to a company.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedFile {
    pub name: String,
    pub rows: Vec<Record>,
}

#[derive(Debug)]
pub struct FileFailure {
    pub name: String,
    pub error: AnalysisError,
}

/// Decodes CSV with a header row. Cells that parse fully as a number become
/// numbers, empty cells are left out, everything else stays text.
pub fn rows_from_csv<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let row: Record = headers
            .iter()
            .zip(record.iter())
            .filter_map(|(header, cell)| dynamic_value(cell).map(|v| (header, v)))
            .collect();

        if !row.is_empty() {
            rows.push(row);
        }
    }

    debug!("Decoded {} CSV row(s) with {} column(s)", rows.len(), headers.len());
    Ok(rows)
}

fn dynamic_value(cell: &str) -> Option<FieldValue> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }

    let numeric_chars = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    match trimmed.parse::<f64>() {
        Ok(n) if numeric_chars && n.is_finite() => Some(FieldValue::Number(n)),
        _ => Some(FieldValue::Text(cell.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

/// Recovers a table from loosely laid out statement text.
///
/// The header is the first line mentioning a known statement label (or the
/// first line when none does). Columns are separated by runs of two or more
/// spaces, tabs, commas or ` | `.
pub struct TableExtractor {
    header_pattern: Regex,
    separator: Regex,
}

impl TableExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            header_pattern: Regex::new(r"(?i)year|revenue|sales|net\s*income|cogs")?,
            separator: Regex::new(r"\s{2,}|\t|,|\s\|\s")?,
        })
    }

    pub fn extract(&self, text: &str) -> Result<ExtractedTable> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let start = lines
            .iter()
            .position(|l| self.header_pattern.is_match(l))
            .unwrap_or(0);
        let header_line = lines.get(start).ok_or_else(|| {
            AnalysisError::EmptyDocument("no non-blank lines in extracted text".to_string())
        })?;

        let headers = self.split(header_line);
        let min_parts = headers.len().min(3);

        let rows = lines[start + 1..]
            .iter()
            .map(|line| self.split(line))
            .filter(|parts| parts.len() >= min_parts)
            .map(|parts| {
                headers
                    .iter()
                    .zip(parts)
                    .map(|(h, p)| (h.clone(), FieldValue::Text(p)))
                    .collect::<Record>()
            })
            .collect();

        Ok(ExtractedTable { headers, rows })
    }

    fn split(&self, line: &str) -> Vec<String> {
        self.separator
            .split(line)
            .map(|part| part.trim().to_string())
            .collect()
    }
}

/// Shorthand for a one-off [`TableExtractor::extract`].
pub fn extract_table_like(text: &str) -> Result<ExtractedTable> {
    TableExtractor::new()?.extract(text)
}

/// Normalizes decoded rows for one file: `name` is the company hint, empty
/// records are dropped and every record is guaranteed a company.
pub fn ingest_rows(name: &str, raw_rows: &[Record]) -> IngestedFile {
    // Filter before normalizing, which would attribute even an empty record.
    let populated: Vec<Record> = raw_rows
        .iter()
        .filter(|r| r.iter().any(|(_, v)| !v.is_blank()))
        .cloned()
        .collect();
    if populated.len() < raw_rows.len() {
        debug!(
            "Dropped {} empty record(s) from '{}'",
            raw_rows.len() - populated.len(),
            name
        );
    }

    let rows: Vec<Record> = normalize_rows(&populated, Some(name))
        .into_iter()
        .map(|mut r| {
            if r.company().is_none() {
                r.set(CanonicalField::Company, name);
            }
            r
        })
        .collect();

    info!("Ingested {} row(s) for '{}'", rows.len(), name);
    IngestedFile {
        name: name.to_string(),
        rows,
    }
}

/// Decodes `content` in the given format and ingests it under `name`.
pub fn ingest_str(name: &str, format: SourceFormat, content: &str) -> Result<IngestedFile> {
    let raw_rows = match format {
        SourceFormat::Csv => rows_from_csv(content.as_bytes())?,
        SourceFormat::PdfText => extract_table_like(content)?.rows,
    };
    Ok(ingest_rows(name, &raw_rows))
}

/// Reads a file, picks its decoder by extension and uses the file stem as the company hint.
pub fn ingest_file(path: impl AsRef<Path>) -> Result<IngestedFile> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let content = std::fs::read_to_string(path)?;
    ingest_str(&name, format, &content)
}

/// Ingests every path independently; one bad file does not stop the others.
pub fn ingest_files<P: AsRef<Path>>(paths: &[P]) -> (Vec<IngestedFile>, Vec<FileFailure>) {
    let mut ingested = Vec::new();
    let mut failures = Vec::new();

    for path in paths {
        let path = path.as_ref();
        match ingest_file(path) {
            Ok(file) => ingested.push(file),
            Err(error) => {
                warn!("Failed to parse {}: {}", path.display(), error);
                failures.push(FileFailure {
                    name: path.display().to_string(),
                    error,
                });
            }
        }
    }

    (ingested, failures)
}
