use scanbridge_types::params;
use std::collections::BTreeMap;


pub const HIVE_SCANNER_CLASS: &str = "org/apache/doris/hive/HiveJNIScanner";

const RC_FILE_INPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.RCFileInputFormat";
const LAZY_BINARY_COLUMNAR_SERDE: &str = "org.apache.hadoop.hive.serde2.columnar.LazyBinaryColumnarSerDe";


/// Format-specific conventions of a remote scanner.
///
/// Overrides are applied after the generic parameter derivation and win
/// over it, so a scanner lacking some capability (e.g. column pruning)
/// can be served by forcing `required_fields`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Dialect {
    pub name: String,
    pub scanner_class: String,
    pub scan_overrides: BTreeMap<String, String>,
    pub schema_overrides: BTreeMap<String, String>,
    /// Report every pulled batch as a debug event
    pub trace_batches: bool
}


impl Dialect {
    pub fn new(name: impl Into<String>, scanner_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scanner_class: scanner_class.into(),
            scan_overrides: BTreeMap::new(),
            schema_overrides: BTreeMap::new(),
            trace_batches: false
        }
    }

    /// Hive tables. Input format and serde come with the table properties.
    pub fn hive() -> Self {
        Self::new("hive", HIVE_SCANNER_CLASS)
    }

    /// Legacy RC files written with the binary columnar serde
    pub fn rc_binary() -> Self {
        Self::new("rc_binary", HIVE_SCANNER_CLASS)
            .with_override(params::INPUT_FORMAT, RC_FILE_INPUT_FORMAT)
            .with_override(params::SERDE, LAZY_BINARY_COLUMNAR_SERDE)
            .with_batch_tracing(true)
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "hive" => Some(Self::hive()),
            "rc_binary" | "rcbinary" => Some(Self::rc_binary()),
            _ => None
        }
    }

    pub fn with_scan_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.scan_overrides.insert(key.into(), value.into());
        self
    }

    pub fn with_schema_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.schema_overrides.insert(key.into(), value.into());
        self
    }

    /// Forces the entry for both scans and schema discovery
    pub fn with_override(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        self.with_scan_override(key.clone(), value.clone())
            .with_schema_override(key, value)
    }

    pub fn with_batch_tracing(mut self, yes: bool) -> Self {
        self.trace_batches = yes;
        self
    }
}
