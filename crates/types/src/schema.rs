use crate::tag::PrimitiveTag;
use serde::{Deserialize, Serialize};


/// One entry of the scanner's table schema document.
///
/// The document itself is a JSON array of these entries.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SchemaColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_tag: i32,
    pub precision: i32,
    pub scale: i32,
    #[serde(rename = "childColumns", default, skip_serializing_if = "Option::is_none")]
    pub child_columns: Option<Vec<SchemaColumn>>
}


impl SchemaColumn {
    pub fn new(name: impl Into<String>, tag: PrimitiveTag) -> Self {
        Self {
            name: Some(name.into()),
            type_tag: tag.as_i32(),
            precision: 0,
            scale: 0,
            child_columns: None
        }
    }

    /// Entry without a name, as used for array elements and map key/value
    pub fn unnamed(tag: PrimitiveTag) -> Self {
        Self {
            name: None,
            type_tag: tag.as_i32(),
            precision: 0,
            scale: 0,
            child_columns: None
        }
    }

    pub fn with_precision(mut self, precision: i32, scale: i32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    pub fn with_children(mut self, children: Vec<SchemaColumn>) -> Self {
        self.child_columns = Some(children);
        self
    }

    #[inline]
    pub fn tag(&self) -> Option<PrimitiveTag> {
        PrimitiveTag::from_i32(self.type_tag)
    }
}


/// Serializes a table schema in the scanner's wire form
pub fn schema_document(columns: &[SchemaColumn]) -> serde_json::Result<String> {
    serde_json::to_string(columns)
}
