use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use crate::validation::ProviderFields;

pub const REQUIRED_COLUMNS: [&str; 5] = ["provider_name", "specialty", "npi", "phone", "address"];

const BYTE_ORDER_MARK: &str = "\u{feff}";

/// Ingestion failures, raised before any row is scored.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Please upload a CSV file.")]
    InvalidFileType,
    #[error("No file was uploaded.")]
    MissingFile,
    #[error("Uploaded file is empty.")]
    EmptyFile,
    #[error("failed to read upload: {0}")]
    Upload(String),
    #[error("CSV must be UTF-8 encoded.")]
    InvalidEncoding,
    #[error("CSV has no headers.")]
    NoHeaders,
    #[error("CSV is missing required columns: {}.", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read provider file: {0}")]
    Io(#[from] std::io::Error),
}

/// Accepts only file names ending in `.csv`, ignoring case.
pub fn ensure_csv_file_name(file_name: &str) -> Result<(), ImportError> {
    if file_name.to_ascii_lowercase().ends_with(".csv") {
        Ok(())
    } else {
        Err(ImportError::InvalidFileType)
    }
}

pub fn read_provider_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ProviderFields>, ImportError> {
    let mut contents = Vec::new();
    std::fs::File::open(path)?.read_to_end(&mut contents)?;
    parse_provider_rows(&contents)
}

/// Parse an uploaded directory file into raw provider fields, one per data row.
pub fn parse_provider_rows(contents: &[u8]) -> Result<Vec<ProviderFields>, ImportError> {
    if contents.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let text = std::str::from_utf8(contents).map_err(|_| ImportError::InvalidEncoding)?;
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns = column_index(reader.headers()?)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |column: &str| {
            columns
                .get(column)
                .and_then(|index| record.get(*index))
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        rows.push(ProviderFields {
            provider_name: cell("provider_name"),
            specialty: non_empty(cell("specialty")),
            npi: non_empty(cell("npi")),
            phone: non_empty(cell("phone")),
            address: non_empty(cell("address")),
        });
    }

    Ok(rows)
}

fn column_index(headers: &csv::StringRecord) -> Result<HashMap<String, usize>, ImportError> {
    if headers.iter().all(|header| header.trim().is_empty()) {
        return Err(ImportError::NoHeaders);
    }

    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| (header.trim().to_lowercase(), index))
        .collect();

    let missing: BTreeSet<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !columns.contains_key(*column))
        .collect();

    if missing.is_empty() {
        Ok(columns)
    } else {
        Err(ImportError::MissingColumns(
            missing.into_iter().map(str::to_string).collect(),
        ))
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
