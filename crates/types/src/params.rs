//! Keys of the parameter map understood by remote scanners.

pub const URI: &str = "uri";
pub const FILE_TYPE: &str = "file_type";
pub const FILE_FORMAT: &str = "file_format";
pub const IS_GET_TABLE_SCHEMA: &str = "is_get_table_schema";
pub const REQUIRED_FIELDS: &str = "required_fields";
pub const COLUMNS_NAMES: &str = "columns_names";
pub const COLUMNS_TYPES: &str = "columns_types";
pub const SPLIT_START_OFFSET: &str = "split_start_offset";
pub const SPLIT_SIZE: &str = "split_size";
pub const INPUT_FORMAT: &str = "input_format";
pub const SERDE: &str = "serde";

pub const FIELDS_DELIMITER: &str = ",";
pub const TYPES_DELIMITER: &str = "#";
