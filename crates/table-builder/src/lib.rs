//! Turns raw records plus column configuration into a [`TableData`] grid.
//!
//! - [`format`]: normalizes single values into display text
//! - [`builder`]: prunes empty columns, builds (multi-level) headers and rows
//!
//! [`TableData`]: table_common::TableData

pub mod builder;
pub mod format;

pub use builder::{build_table, valid_columns, BuildOptions};
pub use format::{format_value, format_value_in, is_blank_value};
