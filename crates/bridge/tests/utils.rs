use arrow::array::{Int32Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use parking_lot::Mutex;
use scanbridge_scanner_client::{BatchResponse, OpenRequest, RemoteScanner, ScanHandle};
use scanbridge_types::ScanParameters;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;


#[derive(Debug, Clone)]
pub struct OpenCall {
    pub scanner_class: String,
    pub params: ScanParameters,
    pub columns: Vec<String>,
    pub predicate_columns: Option<Vec<String>>,
    pub batch_size: usize
}


#[derive(Default)]
pub struct Script {
    pub schema_doc: String,
    pub batches: VecDeque<usize>,
    pub fail_open: bool,
    pub fail_next: bool,
    pub fail_schema: bool,
    pub fail_close: bool,
    pub opened: Vec<OpenCall>,
    pub closes: Vec<ScanHandle>,
    pub live: HashSet<ScanHandle>,
    next_handle: u64
}


/// Scanner serving canned batches and recording every call made to it.
#[derive(Default)]
pub struct ScriptedScanner {
    pub script: Mutex<Script>
}


impl ScriptedScanner {
    pub fn with_batches(rows: impl IntoIterator<Item = usize>) -> Arc<Self> {
        let scanner = Self::default();
        scanner.script.lock().batches = rows.into_iter().collect();
        Arc::new(scanner)
    }

    pub fn with_schema(doc: &str) -> Arc<Self> {
        let scanner = Self::default();
        scanner.script.lock().schema_doc = doc.to_string();
        Arc::new(scanner)
    }

    pub fn close_calls(&self) -> usize {
        self.script.lock().closes.len()
    }

    pub fn live_handles(&self) -> usize {
        self.script.lock().live.len()
    }

    pub fn last_open(&self) -> OpenCall {
        self.script.lock().opened.last().cloned().expect("scanner was never opened")
    }
}


fn batch_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![Field::new("v", DataType::Int32, false)]))
}


impl RemoteScanner for ScriptedScanner {
    fn open(&self, req: &OpenRequest<'_>) -> anyhow::Result<ScanHandle> {
        let mut script = self.script.lock();
        script.opened.push(OpenCall {
            scanner_class: req.scanner_class.to_string(),
            params: req.params.clone(),
            columns: req.columns.to_vec(),
            predicate_columns: req.predicates.map(|p| {
                let mut keys: Vec<_> = p.keys().cloned().collect();
                keys.sort();
                keys
            }),
            batch_size: req.batch_size
        });
        anyhow::ensure!(!script.fail_open, "scanner refused to open");
        script.next_handle += 1;
        let handle = ScanHandle(script.next_handle);
        script.live.insert(handle);
        Ok(handle)
    }

    fn next_batch(&self, handle: ScanHandle) -> anyhow::Result<BatchResponse> {
        let mut script = self.script.lock();
        anyhow::ensure!(script.live.contains(&handle), "unknown handle {}", handle);
        anyhow::ensure!(!script.fail_next, "decoding failed");
        let Some(rows) = script.batches.pop_front() else {
            return Ok(BatchResponse {
                batch: RecordBatch::new_empty(batch_schema()),
                num_rows: 0,
                end: true
            })
        };
        let values: Vec<i32> = (0..rows as i32).collect();
        let batch = RecordBatch::try_new(batch_schema(), vec![Arc::new(Int32Array::from(values))])?;
        Ok(BatchResponse {
            batch,
            num_rows: rows,
            end: false
        })
    }

    fn get_schema(&self, handle: ScanHandle) -> anyhow::Result<String> {
        let script = self.script.lock();
        anyhow::ensure!(script.live.contains(&handle), "unknown handle {}", handle);
        anyhow::ensure!(!script.fail_schema, "schema is not available");
        Ok(script.schema_doc.clone())
    }

    fn close(&self, handle: ScanHandle) -> anyhow::Result<()> {
        let mut script = self.script.lock();
        script.closes.push(handle);
        script.live.remove(&handle);
        anyhow::ensure!(!script.fail_close, "close failed");
        Ok(())
    }
}
