//! Record sink implementations.

mod csv;

pub use self::csv::CsvSink;

pub use crate::traits::sink::RecordSink;
