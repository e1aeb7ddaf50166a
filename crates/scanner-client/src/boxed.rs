use crate::types::{BatchResponse, OpenRequest, RemoteScanner, ScanHandle};
use std::sync::Arc;


pub type RemoteScannerRef = Arc<dyn RemoteScanner + Send + Sync>;


impl<S: RemoteScanner + ?Sized> RemoteScanner for Arc<S> {
    fn open(&self, req: &OpenRequest<'_>) -> anyhow::Result<ScanHandle> {
        self.as_ref().open(req)
    }

    fn next_batch(&self, handle: ScanHandle) -> anyhow::Result<BatchResponse> {
        self.as_ref().next_batch(handle)
    }

    fn get_schema(&self, handle: ScanHandle) -> anyhow::Result<String> {
        self.as_ref().get_schema(handle)
    }

    fn close(&self, handle: ScanHandle) -> anyhow::Result<()> {
        self.as_ref().close(handle)
    }
}


pub fn make_scanner_ref<S>(scanner: S) -> RemoteScannerRef
where
    S: RemoteScanner + Send + Sync + 'static
{
    Arc::new(scanner)
}
