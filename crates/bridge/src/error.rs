use crate::session::SessionState;
use thiserror::Error;


pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;


#[derive(Debug, Error)]
pub enum ScanError {
    /// The remote scanner refused to open a session
    #[error("failed to open remote scanner {scanner}")]
    RemoteOpen {
        scanner: String,
        #[source]
        source: BoxError
    },
    /// A call into an already opened session failed
    #[error("remote scanner call '{call}' failed")]
    RemoteCall {
        call: &'static str,
        #[source]
        source: BoxError
    },
    #[error("malformed table schema: {0}")]
    SchemaParse(String),
    #[error("column '{column}' has unsupported type {ty}")]
    UnsupportedType {
        column: String,
        ty: String
    },
    /// A name would break the positional column lists sent to the scanner
    #[error("column '{column}' contains name {name:?} that clashes with a list delimiter")]
    InvalidName {
        column: String,
        name: String
    },
    #[error("{operation} is not allowed in session state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState
    }
}


impl ScanError {
    pub(crate) fn remote_call(call: &'static str, err: anyhow::Error) -> Self {
        ScanError::RemoteCall {
            call,
            source: err.into()
        }
    }
}


pub type Result<T> = std::result::Result<T, ScanError>;
