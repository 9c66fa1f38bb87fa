use std::cmp::Ordering;

use serde::Serialize;

use crate::data::normalize::{LICENSE_TYPE, ZIP_CODE};
use crate::data::{Cell, Table};
use crate::query::{column_index, QueryError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResult {
    pub subset: Table,
    pub found: bool,
}

/// Rows whose cells equal every `(column, value)` pair, compared as text. Null never matches.
pub fn filter_eq(table: &Table, predicates: &[(&str, &str)]) -> Result<Table, QueryError> {
    let resolved = predicates
        .iter()
        .map(|(column, value)| column_index(table, column).map(|index| (index, *value)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(table.retain_rows(|row| {
        resolved.iter().all(|(index, expected)| {
            row[*index]
                .as_text()
                .is_some_and(|actual| actual == *expected)
        })
    }))
}

/// Exact, case-sensitive match on license type and zip code.
pub fn exact_filter(
    table: &Table,
    license_type: &str,
    zip_code: &str,
) -> Result<FilterResult, QueryError> {
    let subset = filter_eq(table, &[(LICENSE_TYPE, license_type), (ZIP_CODE, zip_code)])?;
    let found = !subset.is_empty();
    Ok(FilterResult { subset, found })
}

/// Project onto `columns`, in the given order.
pub fn select(table: &Table, columns: &[&str]) -> Result<Table, QueryError> {
    let indices = columns
        .iter()
        .map(|column| column_index(table, column))
        .collect::<Result<Vec<_>, _>>()?;

    let mut projected = Table::new(columns.iter().map(|column| (*column).to_string()).collect());
    for row in table.rows() {
        projected.push_row(indices.iter().map(|index| row[*index].clone()).collect());
    }
    Ok(projected)
}

/// Stable ascending sort on one column; nulls sort last.
pub fn sort_by(table: &Table, column: &str) -> Result<Table, QueryError> {
    let index = column_index(table, column)?;
    let mut rows = table.rows().to_vec();
    rows.sort_by(|a, b| compare_cells(&a[index], &b[index]));
    Ok(table.with_rows(rows))
}

fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    match (a, b) {
        (Cell::Float(x), Cell::Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        _ => match (a.as_text(), b.as_text()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_table() -> Table {
        Table::from_rows(
            [LICENSE_TYPE, ZIP_CODE],
            vec![
                vec![Cell::text("Retail"), Cell::text("02118")],
                vec![Cell::text("Retail"), Cell::text("02119")],
                vec![Cell::text("Medical"), Cell::text("02118")],
            ],
        )
    }

    #[test]
    fn exact_filter_matches_both_predicates() {
        let table = scenario_table();
        let result = exact_filter(&table, "Retail", "02118").expect("filter");
        assert!(result.found);
        assert_eq!(result.subset.rows(), &table.rows()[..1]);

        let none = exact_filter(&table, "Retail", "02120").expect("filter");
        assert!(!none.found);
        assert!(none.subset.is_empty());
    }

    #[test]
    fn exact_filter_is_case_sensitive_and_never_fuzzy() {
        let table = scenario_table();
        assert!(!exact_filter(&table, "retail", "02118").expect("filter").found);
        assert!(!exact_filter(&table, "Retail", "2118").expect("filter").found);
        assert!(!exact_filter(&table, "Ret", "02118").expect("filter").found);
    }

    #[test]
    fn empty_zip_matches_only_empty_zip() {
        let table = Table::from_rows(
            [LICENSE_TYPE, ZIP_CODE],
            vec![
                vec![Cell::text("Retail"), Cell::text("")],
                vec![Cell::text("Retail"), Cell::Null],
                vec![Cell::text("Retail"), Cell::text("02118")],
            ],
        );
        let result = exact_filter(&table, "Retail", "").expect("filter");
        assert_eq!(result.subset.len(), 1);
        assert_eq!(result.subset.cell(0, ZIP_CODE), Some(&Cell::text("")));
    }

    #[test]
    fn exact_filter_requires_schema_columns() {
        let table = Table::from_rows([LICENSE_TYPE], vec![vec![Cell::text("Retail")]]);
        let err = exact_filter(&table, "Retail", "02118").unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownColumn {
                column: ZIP_CODE.to_string()
            }
        );
    }

    #[test]
    fn sort_by_is_stable_with_nulls_last() {
        let table = Table::from_rows(
            ["name", "n"],
            vec![
                vec![Cell::text("b"), Cell::text("1")],
                vec![Cell::Null, Cell::text("2")],
                vec![Cell::text("a"), Cell::text("3")],
                vec![Cell::text("b"), Cell::text("4")],
            ],
        );
        let sorted = sort_by(&table, "name").expect("sort");
        let order: Vec<String> = sorted.rows().iter().map(|row| row[1].to_string()).collect();
        assert_eq!(order, ["3", "1", "4", "2"]);
    }

    #[test]
    fn select_projects_in_requested_order() {
        let table = scenario_table();
        let projected = select(&table, &[ZIP_CODE]).expect("select");
        assert_eq!(projected.columns(), &[ZIP_CODE.to_string()]);
        assert_eq!(projected.len(), 3);
        assert!(select(&table, &["Business Name"]).is_err());
    }
}
