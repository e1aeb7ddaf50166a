use crate::error::{Result, ScanError};
use crate::type_bridge::parse_table_schema;
use scanbridge_scanner_client::{
    BatchResponse, OpenRequest, RemoteScanner, RemoteScannerRef, ScanHandle, ValueRangePredicates
};
use scanbridge_types::{ColumnDescriptor, ScanParameters};
use tracing::{debug, warn, Span};


#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionState {
    Created,
    OpenedScan,
    OpenedSchema,
    Closed,
    Failed
}


/// One remote scan handle and its lifecycle.
///
/// The handle is released exactly once: on `close()`, at the end of the stream,
/// when the session fails or when it is dropped, whichever comes first.
pub struct ScanSession {
    scanner: RemoteScannerRef,
    scanner_class: String,
    state: SessionState,
    handle: Option<ScanHandle>,
    predicates: Option<ValueRangePredicates>,
    span: Span
}


impl ScanSession {
    pub fn new(scanner: RemoteScannerRef, scanner_class: impl Into<String>) -> Self {
        Self {
            scanner,
            scanner_class: scanner_class.into(),
            state: SessionState::Created,
            handle: None,
            predicates: None,
            span: Span::current()
        }
    }

    /// Span all session events are reported under
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn holds_handle(&self) -> bool {
        self.handle.is_some()
    }

    pub fn predicates(&self) -> Option<&ValueRangePredicates> {
        self.predicates.as_ref()
    }

    pub fn open_scan(
        &mut self,
        params: &ScanParameters,
        columns: &[String],
        predicates: ValueRangePredicates,
        batch_size: usize
    ) -> Result<()>
    {
        self.expect_state("open_scan", SessionState::Created)?;
        self.predicates = Some(predicates);
        self.open(params, columns, batch_size)?;
        self.state = SessionState::OpenedScan;
        Ok(())
    }

    pub fn open_schema(&mut self, params: &ScanParameters) -> Result<()> {
        self.expect_state("open_schema", SessionState::Created)?;
        self.open(params, &[], 0)?;
        self.state = SessionState::OpenedSchema;
        Ok(())
    }

    fn open(&mut self, params: &ScanParameters, columns: &[String], batch_size: usize) -> Result<()> {
        let req = OpenRequest {
            scanner_class: &self.scanner_class,
            params,
            columns,
            predicates: self.predicates.as_ref(),
            batch_size
        };
        match self.scanner.open(&req) {
            Ok(handle) => {
                debug!(
                    parent: &self.span,
                    handle = %handle,
                    scanner = %self.scanner_class,
                    "opened remote scan"
                );
                self.handle = Some(handle);
                Ok(())
            },
            Err(err) => {
                self.state = SessionState::Failed;
                Err(ScanError::RemoteOpen {
                    scanner: self.scanner_class.clone(),
                    source: err.into()
                })
            }
        }
    }

    /// Pulls the next batch.
    ///
    /// When `end` is set the handle is already released and the session is closed.
    pub fn next_batch(&mut self) -> Result<BatchResponse> {
        self.expect_state("next_batch", SessionState::OpenedScan)?;
        let handle = self.current_handle("next_batch")?;

        let res = match self.scanner.next_batch(handle) {
            Ok(res) => res,
            Err(err) => return Err(self.fail(ScanError::remote_call("next_batch", err)))
        };

        if res.end {
            debug!(parent: &self.span, handle = %handle, "end of remote stream");
            self.release().map_err(|err| {
                self.state = SessionState::Failed;
                ScanError::remote_call("close", err)
            })?;
            self.state = SessionState::Closed;
        } else {
            debug!(parent: &self.span, handle = %handle, rows = res.num_rows, "received batch");
        }

        Ok(res)
    }

    /// Fetches and converts the table schema of a discovery session.
    ///
    /// The handle is released whether the schema could be parsed or not.
    pub fn resolve_schema(&mut self) -> Result<Vec<ColumnDescriptor>> {
        self.expect_state("resolve_schema", SessionState::OpenedSchema)?;
        let handle = self.current_handle("resolve_schema")?;

        let document = match self.scanner.get_schema(handle) {
            Ok(doc) => doc,
            Err(err) => return Err(self.fail(ScanError::remote_call("get_schema", err)))
        };

        if let Err(err) = self.release() {
            self.state = SessionState::Failed;
            return Err(ScanError::remote_call("close", err))
        }

        match parse_table_schema(&document) {
            Ok(columns) => {
                debug!(parent: &self.span, columns = columns.len(), "resolved table schema");
                self.state = SessionState::Closed;
                Ok(columns)
            },
            Err(err) => {
                self.state = SessionState::Failed;
                Err(err)
            }
        }
    }

    pub fn close(&mut self) -> Result<()> {
        let released = self.release();
        match self.state {
            SessionState::Created | SessionState::OpenedScan | SessionState::OpenedSchema => {
                self.state = SessionState::Closed
            },
            SessionState::Closed | SessionState::Failed => {}
        }
        released.map_err(|err| {
            self.state = SessionState::Failed;
            ScanError::remote_call("close", err)
        })
    }

    fn release(&mut self) -> anyhow::Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(())
        };
        debug!(parent: &self.span, handle = %handle, "releasing remote scan");
        self.scanner.close(handle)
    }

    /// Moves into `Failed`, releasing the handle before the error is reported
    fn fail(&mut self, err: ScanError) -> ScanError {
        self.state = SessionState::Failed;
        if let Err(close_err) = self.release() {
            warn!(
                parent: &self.span,
                error = ?close_err,
                "failed to release remote scan after an error"
            );
        }
        err
    }

    fn expect_state(&self, operation: &'static str, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ScanError::InvalidState {
                operation,
                state: self.state
            })
        }
    }

    fn current_handle(&self, operation: &'static str) -> Result<ScanHandle> {
        self.handle.ok_or(ScanError::InvalidState {
            operation,
            state: self.state
        })
    }
}


impl Drop for ScanSession {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(parent: &self.span, error = ?err, "failed to release remote scan on drop");
        }
    }
}
