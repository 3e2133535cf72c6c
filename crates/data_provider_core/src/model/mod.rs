//! Tabular data model shared by providers and consumers.
//!
//! # Responsibility
//! - Define column kinds, typed columns and the table payload.
//!
//! # See also
//! - `crate::provider` for how tables travel from provider to consumer.

pub mod column;
pub mod table;
