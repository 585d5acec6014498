//! Read a comma-delimited file into typed records, one per data line.
//!
//! Line 1 names the fields. Every later line is split on unquoted commas and
//! each field is coerced to an integer, a float, or a string. A line that
//! cannot be turned into a record is dropped on its own; the rest of the file
//! is still read.

pub mod process;
pub mod read;

pub use process::{
    convert::{parse_value, Value},
    split::split_line,
    strategy::{ExecutionStrategy, Parallel, Sequential},
    Header, RawLine, Record, RowError, RowResult,
};
pub use read::{read_file, read_lines, ReadOptions, ReadReport};
