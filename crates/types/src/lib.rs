mod file;
mod grammar;
mod native;
pub mod params;
mod schema;
mod tag;
mod types;


pub use file::*;
pub use grammar::*;
pub use native::*;
pub use schema::*;
pub use tag::*;
pub use types::*;
