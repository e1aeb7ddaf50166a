mod boxed;
mod ipc;
mod types;


pub use boxed::*;
pub use ipc::IpcFileScanner;
pub use types::*;
