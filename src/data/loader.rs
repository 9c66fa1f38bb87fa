//! Load the registry CSV into a [`Table`]. Zip code and equity flag stay text so
//! leading zeros survive; longitude/latitude parse as floats; everything else is text.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::data::table::{Cell, Table};

pub const DEFAULT_REGISTRY_PATH: &str = "Cannabis_Registry.csv";

pub const ZIP_CODE_SOURCE: &str = "facility_zip_code";
pub const EQUITY_FLAG_SOURCE: &str = "equity_program_designation";
pub const LONGITUDE_SOURCE: &str = "longitude";
pub const LATITUDE_SOURCE: &str = "latitude";

/// Columns with an enforced type; a registry file without any of them is rejected.
pub const TYPED_SOURCE_COLUMNS: [&str; 4] = [
    ZIP_CODE_SOURCE,
    EQUITY_FLAG_SOURCE,
    LONGITUDE_SOURCE,
    LATITUDE_SOURCE,
];

/// Full source schema the column normalizer is written against.
pub const REGISTRY_SOURCE_COLUMNS: [&str; 11] = [
    "id_name_first",
    "id_name_last",
    "id_full_name",
    "app_license_category",
    "app_business_name",
    "app_license_status",
    EQUITY_FLAG_SOURCE,
    "facility_address",
    ZIP_CODE_SOURCE,
    LONGITUDE_SOURCE,
    LATITUDE_SOURCE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Float,
}

pub fn column_kind(source_column: &str) -> ColumnKind {
    match source_column {
        LONGITUDE_SOURCE | LATITUDE_SOURCE => ColumnKind::Float,
        _ => ColumnKind::Text,
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open registry file '{origin}': {source}")]
    Open {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read registry CSV '{origin}': {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },
    #[error("registry '{origin}' is missing required column '{column}'")]
    MissingColumn { origin: String, column: &'static str },
    #[error("registry '{origin}' line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidFloat {
        origin: String,
        line: u64,
        column: String,
        value: String,
    },
}

pub fn load_registry(path: impl AsRef<Path>) -> Result<Table, LoadError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::Open {
        origin: origin.clone(),
        source,
    })?;
    load_registry_from_reader(file, &origin)
}

/// Parse every row eagerly. `origin` only labels errors.
pub fn load_registry_from_reader<R: Read>(reader: R, origin: &str) -> Result<Table, LoadError> {
    let csv_error = |source| LoadError::Csv {
        origin: origin.to_string(),
        source,
    };

    let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    for column in TYPED_SOURCE_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(LoadError::MissingColumn {
                origin: origin.to_string(),
                column,
            });
        }
    }

    let kinds: Vec<ColumnKind> = headers.iter().map(|header| column_kind(header)).collect();
    let mut table = Table::new(headers.clone());

    for record in csv_reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map_or(0, |position| position.line());
        let mut row = Vec::with_capacity(kinds.len());
        for (index, kind) in kinds.iter().enumerate() {
            let raw = record.get(index).unwrap_or("");
            let cell = coerce_cell(raw, *kind).ok_or_else(|| LoadError::InvalidFloat {
                origin: origin.to_string(),
                line,
                column: headers[index].clone(),
                value: raw.to_string(),
            })?;
            row.push(cell);
        }
        table.push_row(row);
    }

    tracing::debug!(origin, rows = table.len(), "registry loaded");
    Ok(table)
}

/// `None` when a float column holds something that is not a number.
fn coerce_cell(raw: &str, kind: ColumnKind) -> Option<Cell> {
    if raw.is_empty() {
        return Some(Cell::Null);
    }
    match kind {
        ColumnKind::Text => Some(Cell::Text(raw.to_string())),
        ColumnKind::Float => raw.trim().parse::<f64>().ok().map(Cell::Float),
    }
}
