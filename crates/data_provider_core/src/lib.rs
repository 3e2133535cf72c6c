//! Tabular data exchange between provider extensions and data consumers.
//!
//! An extension obtains a `DataProvider`, registers one selection callback,
//! and answers each consumer request with a `DataTable`.

pub mod config;
pub mod logging;
pub mod model;
pub mod provider;

pub use config::{DataProviderConfig, RegistrationPolicy};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::column::{
    parse_column_type, supported_column_type_strings, BooleanDataTableColumn, CellValue,
    ColumnTypeError, DataProviderColumnType, DataTableColumn, DateDataTableColumn,
    NumberDataTableColumn, StringDataTableColumn, TypedColumn,
};
pub use model::table::{DataTable, DataTableValidationError};
pub use provider::registry::{
    get_data_provider, DataProvider, DataProviderError, OnSelectDataTableCallback,
};
pub use provider::request::{
    PendingDataTable, RequestId, SelectDataTableError, SelectDataTableRequest, SelectionOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
