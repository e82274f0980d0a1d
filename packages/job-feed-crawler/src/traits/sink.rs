//! Record sink trait.

use crate::error::SinkResult;
use crate::types::record::CanonicalJobRecord;

/// Persists the final record collection.
pub trait RecordSink: Send + Sync {
    /// Write `records` in order. Returns the number of rows written; an empty
    /// collection writes nothing and returns 0.
    fn write(&self, records: &[CanonicalJobRecord]) -> SinkResult<usize>;
}
