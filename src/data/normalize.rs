//! Column normalizer: source keys -> display labels, and the complete-rows view used by the map
//! and equity pages.

use crate::config::ConfigError;
use crate::data::table::Table;

pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";
pub const FULL_NAME: &str = "Full Name";
pub const LICENSE_TYPE: &str = "License Type";
pub const BUSINESS_NAME: &str = "Business Name";
pub const LICENSE_STATUS: &str = "License Status";
pub const EQUITY_PROGRAM: &str = "Equity Program?";
pub const FACILITY_ADDRESS: &str = "Facility Address";
pub const ZIP_CODE: &str = "Zip Code";
pub const LONGITUDE: &str = "longitude";
pub const LATITUDE: &str = "latitude";

/// Source key -> label for every registry column the dashboard shows.
pub const COLUMN_LABELS: [(&str, &str); 11] = [
    ("id_name_first", FIRST_NAME),
    ("id_name_last", LAST_NAME),
    ("id_full_name", FULL_NAME),
    ("app_license_category", LICENSE_TYPE),
    ("app_business_name", BUSINESS_NAME),
    ("app_license_status", LICENSE_STATUS),
    ("equity_program_designation", EQUITY_PROGRAM),
    ("facility_address", FACILITY_ADDRESS),
    ("facility_zip_code", ZIP_CODE),
    ("longitude", LONGITUDE),
    ("latitude", LATITUDE),
];

/// Check a mapping against a schema without touching any data.
pub fn validate_mapping(mapping: &[(&str, &str)], schema: &[&str]) -> Result<(), ConfigError> {
    for (source, _) in mapping {
        if !schema.contains(source) {
            return Err(ConfigError::UnknownColumn {
                column: (*source).to_string(),
            });
        }
    }
    Ok(())
}

/// Replace each mapped source key by its label; unmapped columns pass through unchanged.
pub fn rename_columns(table: Table, mapping: &[(&str, &str)]) -> Result<Table, ConfigError> {
    let schema: Vec<&str> = table.columns().iter().map(String::as_str).collect();
    validate_mapping(mapping, &schema)?;

    let renamed = table
        .columns()
        .iter()
        .map(|column| {
            mapping
                .iter()
                .find(|(source, _)| *source == column.as_str())
                .map_or_else(|| column.clone(), |(_, label)| (*label).to_string())
        })
        .collect();
    Ok(table.with_columns(renamed))
}

/// Drop every row with at least one null or empty field.
pub fn drop_incomplete(table: &Table) -> Table {
    table.retain_rows(|row| row.iter().all(|cell| !cell.is_missing()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::REGISTRY_SOURCE_COLUMNS;
    use crate::data::table::Cell;

    #[test]
    fn fixed_mapping_matches_loader_schema() {
        validate_mapping(&COLUMN_LABELS, &REGISTRY_SOURCE_COLUMNS)
            .expect("column labels should only name registry source columns");
    }

    #[test]
    fn rename_keeps_unmapped_columns() {
        let table = Table::from_rows(
            ["facility_zip_code", "objectid"],
            vec![vec![Cell::text("02118"), Cell::text("7")]],
        );
        let renamed =
            rename_columns(table, &[("facility_zip_code", ZIP_CODE)]).expect("should rename");
        assert_eq!(renamed.columns(), &[ZIP_CODE.to_string(), "objectid".to_string()]);
        assert_eq!(renamed.cell(0, ZIP_CODE), Some(&Cell::text("02118")));
    }

    #[test]
    fn rename_rejects_unknown_source_column() {
        let table = Table::from_rows(["facility_zip_code"], Vec::<Vec<Cell>>::new());
        let err = rename_columns(table, &[("zip", ZIP_CODE)]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownColumn { column } if column == "zip"));
    }

    #[test]
    fn drop_incomplete_removes_rows_with_any_gap() {
        let table = Table::from_rows(
            [BUSINESS_NAME, LONGITUDE],
            vec![
                vec![Cell::text("Green Harbor"), Cell::Float(-71.0)],
                vec![Cell::text("No Coords"), Cell::Null],
                vec![Cell::text(""), Cell::Float(-71.1)],
            ],
        );
        let cleaned = drop_incomplete(&table);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.cell(0, BUSINESS_NAME), Some(&Cell::text("Green Harbor")));
    }
}
