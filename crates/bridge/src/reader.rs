use crate::dialect::Dialect;
use crate::error::{Result, ScanError};
use crate::request::{RequestBuilder, Split};
use crate::session::{ScanSession, SessionState};
use scanbridge_scanner_client::{BatchResponse, RemoteScannerRef, ValueRangePredicates};
use scanbridge_types::{ColumnDescriptor, FileFormatType, FileType, NativeType};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info_span, instrument, Span};


pub const DEFAULT_BATCH_SIZE: usize = 4096;


/// Settings shared by all splits of a scan.
#[derive(Debug, Clone)]
pub struct ScanRangeParams {
    pub file_type: FileType,
    pub format_type: FileFormatType,
    /// Connection properties of the source (credentials, endpoint, ...)
    pub properties: BTreeMap<String, String>
}


/// A single split of a file.
#[derive(Debug, Clone)]
pub struct ScanRange {
    pub path: String,
    /// Overrides the scan wide file type
    pub file_type: Option<FileType>,
    pub start_offset: u64,
    pub size: u64
}


/// Reads one split through a remote scanner.
///
/// The format specifics live in the [Dialect], the reader itself is the
/// same for every format.
pub struct FormatReader {
    dialect: Dialect,
    scanner: RemoteScannerRef,
    params: Arc<ScanRangeParams>,
    range: ScanRange,
    columns: Vec<ColumnDescriptor>,
    batch_size: usize,
    session: Option<ScanSession>,
    span: Span
}


impl FormatReader {
    pub fn new(
        dialect: Dialect,
        scanner: RemoteScannerRef,
        params: Arc<ScanRangeParams>,
        range: ScanRange,
        columns: Vec<ColumnDescriptor>
    ) -> Self
    {
        let span = info_span!("format_reader", dialect = %dialect.name, path = %range.path);
        Self {
            dialect,
            scanner,
            params,
            range,
            columns,
            batch_size: DEFAULT_BATCH_SIZE,
            session: None,
            span
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Parent span for everything the reader reports
    pub fn with_span(mut self, parent: &Span) -> Self {
        self.span = info_span!(
            parent: parent,
            "format_reader",
            dialect = %self.dialect.name,
            path = %self.range.path
        );
        self
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// The split's own file type takes precedence over the scan wide one
    pub fn file_type(&self) -> FileType {
        self.range.file_type.unwrap_or(self.params.file_type)
    }

    pub fn session_state(&self) -> Option<SessionState> {
        self.session.as_ref().map(|s| s.state())
    }

    fn request(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.range.path, self.file_type(), self.params.format_type)
            .columns(&self.columns)
            .properties(&self.params.properties)
    }

    fn new_session(&mut self, operation: &'static str) -> Result<&mut ScanSession> {
        if let Some(session) = self.session.as_ref() {
            return Err(ScanError::InvalidState {
                operation,
                state: session.state()
            })
        }
        let session = ScanSession::new(self.scanner.clone(), self.dialect.scanner_class.clone())
            .with_span(self.span.clone());
        Ok(self.session.insert(session))
    }

    #[instrument(parent = &self.span, skip_all, err(Display))]
    pub fn init_scan(&mut self, predicates: ValueRangePredicates) -> Result<()> {
        let split = Split {
            start_offset: self.range.start_offset,
            size: self.range.size
        };
        let params = self.request()
            .overrides(&self.dialect.scan_overrides)
            .scan(split)?;
        let names: Vec<String> = self.columns.iter().map(|c| c.name.clone()).collect();
        let batch_size = self.batch_size;
        self.new_session("init_scan")?.open_scan(&params, &names, predicates, batch_size)
    }

    #[instrument(parent = &self.span, skip_all, err(Display))]
    pub fn init_schema_discovery(&mut self) -> Result<()> {
        let params = self.request()
            .overrides(&self.dialect.schema_overrides)
            .schema_discovery()?;
        self.new_session("init_schema_discovery")?.open_schema(&params)
    }

    /// Next batch of the split, `end` is set once the split is exhausted.
    pub fn next(&mut self) -> Result<BatchResponse> {
        let span = &self.span;
        let trace = self.dialect.trace_batches;
        let session = self.session.as_mut().ok_or(ScanError::InvalidState {
            operation: "next",
            state: SessionState::Created
        })?;
        if trace {
            debug!(parent: span, "pulling next batch");
        }
        let res = session.next_batch()?;
        if trace {
            debug!(parent: span, rows = res.num_rows, end = res.end, "pulled batch");
        }
        Ok(res)
    }

    /// Columns this reader produces
    pub fn columns(&self) -> HashMap<String, NativeType> {
        self.columns.iter().map(|c| {
            if self.dialect.trace_batches {
                debug!(parent: &self.span, column = %c.name, ty = %c.ty, "slot");
            }
            (c.name.clone(), c.ty.clone())
        }).collect()
    }

    /// Table schema reported by the scanner, in the scanner's column order.
    #[instrument(parent = &self.span, skip_all, err(Display))]
    pub fn resolve_schema(&mut self) -> Result<(Vec<String>, Vec<NativeType>)> {
        let session = self.session.as_mut().ok_or(ScanError::InvalidState {
            operation: "resolve_schema",
            state: SessionState::Created
        })?;
        let columns = session.resolve_schema()?;
        Ok(columns.into_iter().map(|c| (c.name, c.ty)).unzip())
    }

    pub fn close(&mut self) -> Result<()> {
        match self.session.as_mut() {
            Some(session) => session.close(),
            None => Ok(())
        }
    }
}
