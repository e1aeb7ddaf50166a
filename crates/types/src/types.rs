use crate::native::NativeType;
use std::collections::BTreeMap;


/// Parameters handed to the remote scanner when opening a session.
///
/// Ordered, so that the same request always produces the same parameter list.
pub type ScanParameters = BTreeMap<String, String>;


#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ColumnDescriptor {
    pub name: String,
    pub ty: NativeType
}


impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, ty: NativeType) -> Self {
        Self {
            name: name.into(),
            ty
        }
    }
}
