//! Query engine over loaded registry tables. Every operation is pure; "no matches" is a
//! normal result, an unknown column is a [`QueryError`].

pub mod aggregate;
pub mod filter;

use thiserror::Error;

use crate::data::Table;

pub use aggregate::{column_mean, equity_split, value_counts, EquitySplit, ValueCount, ValueCounts};
pub use filter::{exact_filter, filter_eq, select, sort_by, FilterResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },
}

pub(crate) fn column_index(table: &Table, column: &str) -> Result<usize, QueryError> {
    table
        .column_index(column)
        .ok_or_else(|| QueryError::UnknownColumn {
            column: column.to_string(),
        })
}
