use std::collections::HashMap;

use serde::Serialize;

use crate::data::normalize::EQUITY_PROGRAM;
use crate::data::Table;
use crate::query::{column_index, QueryError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    /// `None` groups null cells.
    pub value: Option<String>,
    pub count: usize,
}

/// Frequencies of one column, most frequent first; ties keep first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCounts {
    pub column: String,
    pub counts: Vec<ValueCount>,
}

impl ValueCounts {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|entry| entry.count).sum()
    }

    pub fn get(&self, value: Option<&str>) -> usize {
        self.counts
            .iter()
            .find(|entry| entry.value.as_deref() == value)
            .map_or(0, |entry| entry.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValueCount> {
        self.counts.iter()
    }
}

pub fn value_counts(table: &Table, column: &str) -> Result<ValueCounts, QueryError> {
    let index = column_index(table, column)?;

    let mut slots: HashMap<Option<String>, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();
    for row in table.rows() {
        let key = row[index].as_text().map(|value| value.into_owned());
        match slots.get(&key) {
            Some(slot) => counts[*slot].count += 1,
            None => {
                slots.insert(key.clone(), counts.len());
                counts.push(ValueCount {
                    value: key,
                    count: 1,
                });
            }
        }
    }

    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(ValueCounts {
        column: column.to_string(),
        counts,
    })
}

/// Social Equity Program membership counts. Only exact `Y`/`N` land in `yes`/`no`;
/// every other flag (null included) is counted in `unclassified`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EquitySplit {
    pub yes: usize,
    pub no: usize,
    pub unclassified: usize,
}

pub fn equity_split(table: &Table) -> Result<EquitySplit, QueryError> {
    let index = column_index(table, EQUITY_PROGRAM)?;
    let mut split = EquitySplit::default();
    for row in table.rows() {
        match row[index].as_text().as_deref() {
            Some("Y") => split.yes += 1,
            Some("N") => split.no += 1,
            _ => split.unclassified += 1,
        }
    }
    Ok(split)
}

/// Mean of the numeric cells of `column`; `None` if there are none.
pub fn column_mean(table: &Table, column: &str) -> Result<Option<f64>, QueryError> {
    let index = column_index(table, column)?;
    let (sum, count) = table
        .rows()
        .iter()
        .filter_map(|row| row[index].as_f64())
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    Ok((count > 0).then(|| sum / count as f64))
}
