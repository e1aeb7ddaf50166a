mod dialect;
mod error;
mod reader;
mod request;
mod session;
mod type_bridge;


pub use dialect::*;
pub use error::*;
pub use reader::*;
pub use request::*;
pub use session::*;
pub use type_bridge::*;

pub use scanbridge_scanner_client::{BatchResponse, ColumnValueRange, RemoteScannerRef, ValueRangePredicates};
