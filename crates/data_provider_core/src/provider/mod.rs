//! Data exchange between a provider extension and data consumers.
//!
//! A consumer asks for a table through `DataProvider::request_data_table`; the
//! registered callback receives a single-use `SelectDataTableRequest` and
//! answers it now or later. No transport is defined here.

pub mod registry;
pub mod request;
