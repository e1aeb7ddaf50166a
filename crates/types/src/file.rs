use std::fmt::{Display, Formatter};


/// Storage kind a file is read from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum FileType {
    Local = 0,
    Broker = 1,
    Stream = 2,
    S3 = 3,
    Hdfs = 4,
    Net = 5
}


impl FileType {
    pub fn from_i32(value: i32) -> Option<Self> {
        Some(match value {
            0 => FileType::Local,
            1 => FileType::Broker,
            2 => FileType::Stream,
            3 => FileType::S3,
            4 => FileType::Hdfs,
            5 => FileType::Net,
            _ => return None
        })
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "local" => FileType::Local,
            "broker" => FileType::Broker,
            "stream" => FileType::Stream,
            "s3" => FileType::S3,
            "hdfs" => FileType::Hdfs,
            "net" => FileType::Net,
            _ => return None
        })
    }

    #[inline]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Remote object stores need the source's connection properties
    #[inline]
    pub fn is_object_store(self) -> bool {
        self == FileType::S3
    }
}


impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}


/// File format identifier as assigned by the query planner.
///
/// The bridge never interprets it, the value is forwarded to the scanner.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FileFormatType(pub i32);


impl FileFormatType {
    pub const UNKNOWN: FileFormatType = FileFormatType(-1);
    pub const JNI: FileFormatType = FileFormatType(11);
}


impl Display for FileFormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
