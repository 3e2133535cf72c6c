//! Data table payload.
//!
//! # Responsibility
//! - Define the named, ordered collection of columns sent to a consumer.
//! - Offer opt-in, consumer-side shape validation.
//!
//! # Invariants
//! - Zero columns is a valid table.
//! - Column order is preserved exactly as supplied.
//! - Unique column names and equal column lengths are caller responsibility;
//!   `validate` reports violations but construction never rejects them.

use crate::model::column::DataTableColumn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The data structure a provider uses to expose data to a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    /// The name of the data table.
    pub name: String,
    /// Columns in display order, comparable to spreadsheet columns.
    pub columns: Vec<DataTableColumn>,
}

impl DataTable {
    /// Creates a table without columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_columns(name, Vec::new())
    }

    pub fn with_columns(name: impl Into<String>, columns: Vec<DataTableColumn>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Appends one column, keeping insertion order.
    pub fn with_column(mut self, column: impl Into<DataTableColumn>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Returns the first column named `name`.
    pub fn column(&self, name: &str) -> Option<&DataTableColumn> {
        self.columns.iter().find(|column| column.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(DataTableColumn::name).collect()
    }

    /// Longest column length; `0` for a table without columns.
    pub fn row_count(&self) -> usize {
        self.columns
            .iter()
            .map(DataTableColumn::len)
            .max()
            .unwrap_or(0)
    }

    /// Checks consumer-side shape expectations.
    ///
    /// The first violation found is returned, scanning columns in order.
    pub fn validate(&self) -> Result<(), DataTableValidationError> {
        if self.name.trim().is_empty() {
            return Err(DataTableValidationError::EmptyTableName);
        }

        let expected = self.columns.first().map(DataTableColumn::len);
        let mut seen = BTreeSet::<&str>::new();
        for (index, column) in self.columns.iter().enumerate() {
            let name = column.name();
            if name.trim().is_empty() {
                return Err(DataTableValidationError::EmptyColumnName { index });
            }
            if !seen.insert(name) {
                return Err(DataTableValidationError::DuplicateColumnName(
                    name.to_string(),
                ));
            }
            if let Some(expected) = expected {
                if column.len() != expected {
                    return Err(DataTableValidationError::RaggedColumns {
                        column: name.to_string(),
                        expected,
                        actual: column.len(),
                    });
                }
            }
            if let Some(numbers) = column.as_number() {
                let non_finite = numbers
                    .values
                    .iter()
                    .position(|value| value.is_some_and(|number| !number.is_finite()));
                if let Some(index) = non_finite {
                    return Err(DataTableValidationError::NonFiniteNumber {
                        column: name.to_string(),
                        index,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Shape violations reported by `DataTable::validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataTableValidationError {
    EmptyTableName,
    EmptyColumnName {
        index: usize,
    },
    DuplicateColumnName(String),
    /// `expected` is the length of the first column.
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },
    /// NaN or an infinity in a number column; `index` is the row.
    NonFiniteNumber {
        column: String,
        index: usize,
    },
}

impl Display for DataTableValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTableName => write!(f, "data table name must not be empty"),
            Self::EmptyColumnName { index } => {
                write!(f, "column name must not be empty (column index {index})")
            }
            Self::DuplicateColumnName(name) => {
                write!(f, "column name is duplicated: {name}")
            }
            Self::RaggedColumns {
                column,
                expected,
                actual,
            } => write!(
                f,
                "column `{column}` has {actual} values, expected {expected}"
            ),
            Self::NonFiniteNumber { column, index } => write!(
                f,
                "column `{column}` holds a non-finite number at row {index}"
            ),
        }
    }
}

impl Error for DataTableValidationError {}

#[cfg(test)]
mod tests {
    use super::{DataTable, DataTableValidationError};
    use crate::model::column::DataTableColumn;

    fn sales_table() -> DataTable {
        DataTable::new("Sales")
            .with_column(DataTableColumn::string(
                "Region",
                vec![Some("East".to_string()), Some("West".to_string()), None],
            ))
            .with_column(DataTableColumn::number(
                "Total",
                vec![Some(100.0), Some(200.0), Some(300.0)],
            ))
    }

    #[test]
    fn validates_well_formed_table() {
        let table = sales_table();
        assert!(table.validate().is_ok());
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names(), vec!["Region", "Total"]);
    }

    #[test]
    fn table_without_columns_is_valid() {
        let table = DataTable::new("Empty");
        assert!(table.columns.is_empty());
        assert_eq!(table.row_count(), 0);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn rejects_blank_table_name() {
        let mut table = sales_table();
        table.name = "  ".to_string();
        assert_eq!(
            table.validate().unwrap_err(),
            DataTableValidationError::EmptyTableName
        );
    }

    #[test]
    fn rejects_blank_column_name() {
        let table = sales_table().with_column(DataTableColumn::boolean("", vec![None, None, None]));
        assert_eq!(
            table.validate().unwrap_err(),
            DataTableValidationError::EmptyColumnName { index: 2 }
        );
    }

    #[test]
    fn rejects_duplicate_column_name() {
        let table =
            sales_table().with_column(DataTableColumn::number("Total", vec![None, None, None]));
        assert_eq!(
            table.validate().unwrap_err(),
            DataTableValidationError::DuplicateColumnName("Total".to_string())
        );
    }

    #[test]
    fn rejects_ragged_columns() {
        let table = sales_table().with_column(DataTableColumn::boolean("Closed", vec![Some(true)]));
        assert_eq!(
            table.validate().unwrap_err(),
            DataTableValidationError::RaggedColumns {
                column: "Closed".to_string(),
                expected: 3,
                actual: 1,
            }
        );
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let table = DataTable::new("Ratios").with_column(DataTableColumn::number(
            "Ratio",
            vec![None, Some(0.5), Some(f64::NEG_INFINITY)],
        ));
        assert_eq!(
            table.validate().unwrap_err(),
            DataTableValidationError::NonFiniteNumber {
                column: "Ratio".to_string(),
                index: 2,
            }
        );
    }

    #[test]
    fn column_lookup_returns_first_match() {
        let table = sales_table();
        let region = table.column("Region").expect("region column");
        assert_eq!(region.absent_count(), 1);
        assert!(table.column("Missing").is_none());
    }
}
