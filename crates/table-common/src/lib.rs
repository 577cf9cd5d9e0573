//! Common types and utilities shared across the report-table crates.

pub mod error;
pub mod style;
pub mod table;
pub mod time;

pub use error::{TableError, TableResult};
pub use style::{Color, TableStyle};
pub use table::{
    Cell, ColumnDisplay, FormatKind, HeaderGroup, HeaderLayer, HeaderSlot, Record, TableData,
    PLACEHOLDER,
};
pub use time::{format_timestamp, format_timestamp_in};
