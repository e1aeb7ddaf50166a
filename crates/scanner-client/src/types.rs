use arrow::array::RecordBatch;
use scanbridge_types::ScanParameters;
use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;


/// Opaque value range of a single column.
///
/// Produced by the planner and interpreted only by the remote scanner.
pub type ColumnValueRange = Arc<dyn Any + Send + Sync>;


pub type ValueRangePredicates = HashMap<String, ColumnValueRange>;


#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ScanHandle(pub u64);


impl Display for ScanHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}


pub struct OpenRequest<'a> {
    /// Entry point of the scanner implementation on the remote side
    pub scanner_class: &'a str,
    pub params: &'a ScanParameters,
    /// Names of the columns batches are expected to carry, in order
    pub columns: &'a [String],
    pub predicates: Option<&'a ValueRangePredicates>,
    pub batch_size: usize
}


#[derive(Debug)]
pub struct BatchResponse {
    pub batch: RecordBatch,
    pub num_rows: usize,
    pub end: bool
}


/// Contract of the component that actually decodes files.
///
/// All calls block the calling thread. `close()` must tolerate unknown
/// or already closed handles.
pub trait RemoteScanner {
    fn open(&self, req: &OpenRequest<'_>) -> anyhow::Result<ScanHandle>;

    fn next_batch(&self, handle: ScanHandle) -> anyhow::Result<BatchResponse>;

    /// Serialized table schema of a schema discovery session
    fn get_schema(&self, handle: ScanHandle) -> anyhow::Result<String>;

    fn close(&self, handle: ScanHandle) -> anyhow::Result<()>;
}
