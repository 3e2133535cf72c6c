//! Typed data table columns.
//!
//! # Responsibility
//! - Define the closed set of column kinds a provider may expose.
//! - Keep every kind on the same `{type, name, values}` shape.
//!
//! # Invariants
//! - `None` in `values` is the absent marker for a missing cell; it is never
//!   replaced by an empty string, zero, epoch or `false`.
//! - A `TypedColumn<T>` of one kind cannot be passed where another kind is
//!   expected; the kind is carried by `T`.
//! - Serialization fails on a non-finite number instead of writing `null`,
//!   which would read back as an absent cell.

use chrono::{DateTime, Utc};
use serde::ser::{Error as _, SerializeSeq, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable id for string columns.
pub const COLUMN_TYPE_STRING: &str = "string";
/// Stable id for number columns.
pub const COLUMN_TYPE_NUMBER: &str = "number";
/// Stable id for date columns.
pub const COLUMN_TYPE_DATE: &str = "date";
/// Stable id for boolean columns.
pub const COLUMN_TYPE_BOOLEAN: &str = "boolean";

const SUPPORTED_COLUMN_TYPE_STRINGS: &[&str] = &[
    COLUMN_TYPE_STRING,
    COLUMN_TYPE_NUMBER,
    COLUMN_TYPE_DATE,
    COLUMN_TYPE_BOOLEAN,
];

/// The kinds of data a data table column can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataProviderColumnType {
    String,
    Number,
    Date,
    Boolean,
}

impl DataProviderColumnType {
    /// Stable string id, identical to the `type` discriminant of a column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => COLUMN_TYPE_STRING,
            Self::Number => COLUMN_TYPE_NUMBER,
            Self::Date => COLUMN_TYPE_DATE,
            Self::Boolean => COLUMN_TYPE_BOOLEAN,
        }
    }
}

impl Display for DataProviderColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns supported column type ids.
pub fn supported_column_type_strings() -> &'static [&'static str] {
    SUPPORTED_COLUMN_TYPE_STRINGS
}

/// Parses one column type id.
///
/// Only exact lowercase ids are accepted; padded input is unsupported, the
/// same as for the serialized `type` tag.
pub fn parse_column_type(value: &str) -> Result<DataProviderColumnType, ColumnTypeError> {
    if value.trim().is_empty() {
        return Err(ColumnTypeError::EmptyColumnType);
    }

    match value {
        COLUMN_TYPE_STRING => Ok(DataProviderColumnType::String),
        COLUMN_TYPE_NUMBER => Ok(DataProviderColumnType::Number),
        COLUMN_TYPE_DATE => Ok(DataProviderColumnType::Date),
        COLUMN_TYPE_BOOLEAN => Ok(DataProviderColumnType::Boolean),
        other => Err(ColumnTypeError::UnsupportedColumnType(other.to_string())),
    }
}

/// Column type parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTypeError {
    EmptyColumnType,
    UnsupportedColumnType(String),
}

impl Display for ColumnTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyColumnType => write!(f, "column type must not be empty"),
            Self::UnsupportedColumnType(value) => {
                write!(f, "column type is unsupported: {value}")
            }
        }
    }
}

impl Error for ColumnTypeError {}

mod sealed {
    pub trait Sealed {}

    impl Sealed for String {}
    impl Sealed for f64 {}
    impl Sealed for chrono::DateTime<chrono::Utc> {}
    impl Sealed for bool {}
}

/// Cell value type of one column kind.
///
/// Sealed: the set of kinds is closed and matched exhaustively by consumers.
pub trait CellValue: Clone + PartialEq + sealed::Sealed {
    /// Column kind carrying values of this type.
    const COLUMN_TYPE: DataProviderColumnType;

    #[doc(hidden)]
    fn into_column(column: TypedColumn<Self>) -> DataTableColumn;

    /// Rejects a present value that has no faithful serialized form.
    #[doc(hidden)]
    fn check_serializable(&self) -> Result<(), String> {
        Ok(())
    }
}

impl CellValue for String {
    const COLUMN_TYPE: DataProviderColumnType = DataProviderColumnType::String;

    fn into_column(column: TypedColumn<Self>) -> DataTableColumn {
        DataTableColumn::String(column)
    }
}

impl CellValue for f64 {
    const COLUMN_TYPE: DataProviderColumnType = DataProviderColumnType::Number;

    fn into_column(column: TypedColumn<Self>) -> DataTableColumn {
        DataTableColumn::Number(column)
    }

    fn check_serializable(&self) -> Result<(), String> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(format!("non-finite number `{self}` cannot be serialized"))
        }
    }
}

impl CellValue for DateTime<Utc> {
    const COLUMN_TYPE: DataProviderColumnType = DataProviderColumnType::Date;

    fn into_column(column: TypedColumn<Self>) -> DataTableColumn {
        DataTableColumn::Date(column)
    }
}

impl CellValue for bool {
    const COLUMN_TYPE: DataProviderColumnType = DataProviderColumnType::Boolean;

    fn into_column(column: TypedColumn<Self>) -> DataTableColumn {
        DataTableColumn::Boolean(column)
    }
}

/// One named column whose cells all have type `T`.
///
/// A value is comparable to an individual cell in a spreadsheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypedColumn<T> {
    /// The name of the column.
    pub name: String,
    /// Cell values in row order; `None` marks a missing cell.
    pub values: Vec<Option<T>>,
}

impl<T: CellValue> TypedColumn<T> {
    pub fn new(name: impl Into<String>, values: Vec<Option<T>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn column_type(&self) -> DataProviderColumnType {
        T::COLUMN_TYPE
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of cells holding the absent marker.
    pub fn absent_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_none()).count()
    }
}

impl<T: CellValue + Serialize> Serialize for TypedColumn<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TypedColumn", 2)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("values", &CheckedCells(&self.values))?;
        state.end()
    }
}

struct CheckedCells<'a, T>(&'a [Option<T>]);

impl<T: CellValue + Serialize> Serialize for CheckedCells<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for cell in self.0 {
            if let Some(value) = cell {
                value.check_serializable().map_err(S::Error::custom)?;
            }
            seq.serialize_element(cell)?;
        }
        seq.end()
    }
}

pub type StringDataTableColumn = TypedColumn<String>;
pub type NumberDataTableColumn = TypedColumn<f64>;
pub type DateDataTableColumn = TypedColumn<DateTime<Utc>>;
pub type BooleanDataTableColumn = TypedColumn<bool>;

/// An individual column within a data table.
///
/// Serialized with a `type` discriminant next to `name` and `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataTableColumn {
    String(StringDataTableColumn),
    Number(NumberDataTableColumn),
    Date(DateDataTableColumn),
    Boolean(BooleanDataTableColumn),
}

impl DataTableColumn {
    pub fn string(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::String(TypedColumn::new(name, values))
    }

    pub fn number(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::Number(TypedColumn::new(name, values))
    }

    pub fn date(name: impl Into<String>, values: Vec<Option<DateTime<Utc>>>) -> Self {
        Self::Date(TypedColumn::new(name, values))
    }

    pub fn boolean(name: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self::Boolean(TypedColumn::new(name, values))
    }

    pub fn column_type(&self) -> DataProviderColumnType {
        match self {
            Self::String(_) => DataProviderColumnType::String,
            Self::Number(_) => DataProviderColumnType::Number,
            Self::Date(_) => DataProviderColumnType::Date,
            Self::Boolean(_) => DataProviderColumnType::Boolean,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::String(column) => &column.name,
            Self::Number(column) => &column.name,
            Self::Date(column) => &column.name,
            Self::Boolean(column) => &column.name,
        }
    }

    /// Number of cells, absent cells included.
    pub fn len(&self) -> usize {
        match self {
            Self::String(column) => column.len(),
            Self::Number(column) => column.len(),
            Self::Date(column) => column.len(),
            Self::Boolean(column) => column.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn absent_count(&self) -> usize {
        match self {
            Self::String(column) => column.absent_count(),
            Self::Number(column) => column.absent_count(),
            Self::Date(column) => column.absent_count(),
            Self::Boolean(column) => column.absent_count(),
        }
    }

    pub fn as_string(&self) -> Option<&StringDataTableColumn> {
        match self {
            Self::String(column) => Some(column),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&NumberDataTableColumn> {
        match self {
            Self::Number(column) => Some(column),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateDataTableColumn> {
        match self {
            Self::Date(column) => Some(column),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<&BooleanDataTableColumn> {
        match self {
            Self::Boolean(column) => Some(column),
            _ => None,
        }
    }
}

impl<T: CellValue> From<TypedColumn<T>> for DataTableColumn {
    fn from(column: TypedColumn<T>) -> Self {
        T::into_column(column)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_column_type, supported_column_type_strings, ColumnTypeError, DataProviderColumnType,
        DataTableColumn, NumberDataTableColumn, TypedColumn,
    };

    #[test]
    fn parses_all_supported_column_types() {
        for (raw, expected) in [
            ("string", DataProviderColumnType::String),
            ("number", DataProviderColumnType::Number),
            ("date", DataProviderColumnType::Date),
            ("boolean", DataProviderColumnType::Boolean),
        ] {
            let parsed = parse_column_type(raw).expect("supported column type should parse");
            assert_eq!(parsed, expected);
            assert_eq!(parsed.as_str(), raw);
        }
    }

    #[test]
    fn rejects_empty_and_unknown_column_types() {
        assert_eq!(
            parse_column_type("  ").expect_err("blank type must fail"),
            ColumnTypeError::EmptyColumnType
        );
        assert_eq!(
            parse_column_type("Number").expect_err("capitalized type must fail"),
            ColumnTypeError::UnsupportedColumnType("Number".to_string())
        );
        assert_eq!(
            parse_column_type(" string ").expect_err("padded type must fail"),
            ColumnTypeError::UnsupportedColumnType(" string ".to_string())
        );
        assert_eq!(
            parse_column_type("currency").expect_err("unknown type must fail"),
            ColumnTypeError::UnsupportedColumnType("currency".to_string())
        );
    }

    #[test]
    fn supported_strings_cover_every_kind() {
        let values = supported_column_type_strings();
        assert_eq!(values.len(), 4);
        for kind in [
            DataProviderColumnType::String,
            DataProviderColumnType::Number,
            DataProviderColumnType::Date,
            DataProviderColumnType::Boolean,
        ] {
            assert!(values.contains(&kind.as_str()));
        }
    }

    #[test]
    fn typed_column_converts_into_matching_variant() {
        let typed: NumberDataTableColumn = TypedColumn::new("Total", vec![Some(1.5), None]);
        assert_eq!(typed.column_type(), DataProviderColumnType::Number);
        assert_eq!(typed.absent_count(), 1);

        let column = DataTableColumn::from(typed.clone());
        assert_eq!(column.column_type(), DataProviderColumnType::Number);
        assert_eq!(column.as_number(), Some(&typed));
        assert!(column.as_string().is_none());
    }

    #[test]
    fn absent_cells_stay_absent() {
        let column = DataTableColumn::string("Region", vec![Some(String::new()), None]);
        let values = &column.as_string().expect("string column").values;
        assert_eq!(values[0].as_deref(), Some(""));
        assert_eq!(values[1], None);
        assert_eq!(column.absent_count(), 1);
        assert_eq!(column.len(), 2);
    }
}
