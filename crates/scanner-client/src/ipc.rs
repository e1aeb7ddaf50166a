use crate::types::{BatchResponse, OpenRequest, RemoteScanner, ScanHandle};
use anyhow::{anyhow, ensure, Context};
use arrow::array::RecordBatch;
use arrow::datatypes::{DataType, Field, SchemaRef, TimeUnit};
use arrow::ipc::reader::FileReader;
use parking_lot::Mutex;
use scanbridge_types::{params, schema_document, FileType, PrimitiveTag, ScanParameters, SchemaColumn};
use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument};


/// Scanner serving local Arrow IPC files.
///
/// IPC files can't be split by byte ranges, so the split starting at offset 0
/// reads the whole file and any other split is empty.
#[derive(Default)]
pub struct IpcFileScanner {
    next_handle: AtomicU64,
    scans: Mutex<HashMap<ScanHandle, OpenScan>>
}


struct OpenScan {
    file_schema: SchemaRef,
    rows: Option<RowSource>
}


struct RowSource {
    reader: Option<FileReader<File>>,
    projection: Vec<usize>,
    projected_schema: SchemaRef,
    batch_size: usize,
    pending: VecDeque<RecordBatch>
}


impl IpcFileScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_sessions(&self) -> usize {
        self.scans.lock().len()
    }
}


impl RemoteScanner for IpcFileScanner {
    #[instrument(level = "debug", skip_all, err(Debug), fields(
        scanner = req.scanner_class,
        uri = get_param(req.params, params::URI).unwrap_or("None")
    ))]
    fn open(&self, req: &OpenRequest<'_>) -> anyhow::Result<ScanHandle> {
        let uri = get_param(req.params, params::URI)?;

        let file_type: i32 = get_param(req.params, params::FILE_TYPE)?
            .parse()
            .context("invalid file_type")?;
        ensure!(
            file_type == FileType::Local.as_i32(),
            "file type {} is not supported by the IPC scanner",
            file_type
        );

        let is_schema_scan = get_param(req.params, params::IS_GET_TABLE_SCHEMA)? == "true";

        let file = File::open(uri).with_context(|| format!("failed to open {}", uri))?;
        let reader = FileReader::try_new(file, None)
            .with_context(|| format!("{} is not an arrow IPC file", uri))?;
        let file_schema = reader.schema();

        let rows = if is_schema_scan {
            None
        } else {
            let split_start: u64 = get_param(req.params, params::SPLIT_START_OFFSET)?
                .parse()
                .context("invalid split_start_offset")?;

            let projection = project(&file_schema, req.params)?;
            let projected_schema = std::sync::Arc::new(file_schema.project(&projection)?);

            Some(RowSource {
                reader: (split_start == 0).then_some(reader),
                projection,
                projected_schema,
                batch_size: std::cmp::max(req.batch_size, 1),
                pending: VecDeque::new()
            })
        };

        let handle = ScanHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.scans.lock().insert(handle, OpenScan {
            file_schema,
            rows
        });
        debug!(handle = %handle, "opened IPC scan");
        Ok(handle)
    }

    fn next_batch(&self, handle: ScanHandle) -> anyhow::Result<BatchResponse> {
        let mut scans = self.scans.lock();
        let scan = scans.get_mut(&handle).ok_or_else(|| anyhow!("unknown scan handle {}", handle))?;
        let source = scan.rows.as_mut().ok_or_else(|| {
            anyhow!("scan {} was opened for schema discovery", handle)
        })?;

        loop {
            if let Some(batch) = source.pending.pop_front() {
                return Ok(BatchResponse {
                    num_rows: batch.num_rows(),
                    batch,
                    end: false
                })
            }

            let Some(reader) = source.reader.as_mut() else {
                return Ok(BatchResponse {
                    batch: RecordBatch::new_empty(source.projected_schema.clone()),
                    num_rows: 0,
                    end: true
                })
            };

            match reader.next() {
                Some(batch) => {
                    let batch = batch?.project(&source.projection)?;
                    let mut offset = 0;
                    while offset < batch.num_rows() {
                        let len = std::cmp::min(source.batch_size, batch.num_rows() - offset);
                        source.pending.push_back(batch.slice(offset, len));
                        offset += len;
                    }
                },
                None => {
                    source.reader = None;
                }
            }
        }
    }

    fn get_schema(&self, handle: ScanHandle) -> anyhow::Result<String> {
        let scans = self.scans.lock();
        let scan = scans.get(&handle).ok_or_else(|| anyhow!("unknown scan handle {}", handle))?;
        let columns: Vec<SchemaColumn> = scan.file_schema
            .fields()
            .iter()
            .map(|f| schema_column(f, true))
            .collect();
        schema_document(&columns).context("failed to serialize the table schema")
    }

    fn close(&self, handle: ScanHandle) -> anyhow::Result<()> {
        if self.scans.lock().remove(&handle).is_some() {
            debug!(handle = %handle, "closed IPC scan");
        }
        Ok(())
    }
}


fn get_param<'a>(params: &'a ScanParameters, key: &str) -> anyhow::Result<&'a str> {
    params.get(key)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow!("required parameter '{}' is missing", key))
}


fn project(schema: &SchemaRef, scan_params: &ScanParameters) -> anyhow::Result<Vec<usize>> {
    let required = get_param(scan_params, params::REQUIRED_FIELDS)?;
    if required.is_empty() {
        return Ok(Vec::new())
    }
    required.split(params::FIELDS_DELIMITER).map(|name| {
        schema.index_of(name).with_context(|| format!("column '{}' is not present in the file", name))
    }).collect()
}


fn schema_column(field: &Field, named: bool) -> SchemaColumn {
    let column = |tag: PrimitiveTag| {
        if named {
            SchemaColumn::new(field.name(), tag)
        } else {
            SchemaColumn::unnamed(tag)
        }
    };
    match field.data_type() {
        DataType::Boolean => column(PrimitiveTag::Boolean),
        DataType::Int8 => column(PrimitiveTag::TinyInt),
        DataType::Int16 => column(PrimitiveTag::SmallInt),
        DataType::Int32 => column(PrimitiveTag::Int),
        DataType::Int64 => column(PrimitiveTag::BigInt),
        DataType::Float32 => column(PrimitiveTag::Float),
        DataType::Float64 => column(PrimitiveTag::Double),
        DataType::Utf8 | DataType::LargeUtf8 => column(PrimitiveTag::String),
        DataType::Binary | DataType::LargeBinary => column(PrimitiveTag::Binary),
        DataType::Date32 => column(PrimitiveTag::DateV2),
        DataType::Timestamp(unit, _) => {
            let scale = match unit {
                TimeUnit::Second => 0,
                TimeUnit::Millisecond => 3,
                TimeUnit::Microsecond => 6,
                TimeUnit::Nanosecond => 9
            };
            column(PrimitiveTag::DateTimeV2).with_precision(0, scale)
        },
        DataType::Decimal128(precision, scale) => {
            column(PrimitiveTag::Decimal128I).with_precision(*precision as i32, *scale as i32)
        },
        DataType::List(item) | DataType::LargeList(item) => {
            column(PrimitiveTag::Array).with_children(vec![schema_column(item, false)])
        },
        DataType::Map(entries, _) => match entries.data_type() {
            DataType::Struct(kv) if kv.len() == 2 => {
                column(PrimitiveTag::Map).with_children(vec![
                    schema_column(&kv[0], false),
                    schema_column(&kv[1], false)
                ])
            },
            _ => column(PrimitiveTag::Invalid)
        },
        DataType::Struct(fields) => {
            column(PrimitiveTag::Struct).with_children(
                fields.iter().map(|f| schema_column(f, true)).collect()
            )
        },
        _ => column(PrimitiveTag::Invalid)
    }
}
