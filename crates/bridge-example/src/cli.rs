use anyhow::{anyhow, Context};
use clap::Parser;
use scanbridge_types::{ColumnDescriptor, FileType, NativeType};


#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path of the file to read
    #[arg(long, value_name = "PATH")]
    pub uri: String,

    /// Storage the file lives on (local, s3, hdfs, broker, stream, net)
    #[arg(long, value_name = "KIND", default_value = "local", value_parser = parse_file_type)]
    pub file_type: FileType,

    /// File format id forwarded to the scanner
    #[arg(long, value_name = "N", default_value_t = 11)]
    pub format_type: i32,

    /// Format dialect
    #[arg(long, value_name = "NAME", default_value = "hive")]
    pub dialect: String,

    /// Column to read, can be repeated
    #[arg(long = "column", value_name = "NAME:TYPE", value_parser = parse_column)]
    pub columns: Vec<ColumnDescriptor>,

    /// Byte offset of the split
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub split_offset: u64,

    /// Byte size of the split
    #[arg(long, value_name = "N", default_value_t = u64::MAX)]
    pub split_size: u64,

    /// Connection property of the source, can be repeated
    #[arg(long = "property", value_name = "KEY=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Max number of rows per batch
    #[arg(long, value_name = "N", default_value_t = scanbridge::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Only print the table schema
    #[arg(long)]
    pub schema_only: bool,

    /// Whether the logs should be structured in JSON format
    #[arg(long)]
    pub json_log: bool
}


fn parse_file_type(s: &str) -> anyhow::Result<FileType> {
    FileType::from_name(s)
        .or_else(|| s.parse().ok().and_then(FileType::from_i32))
        .ok_or_else(|| anyhow!("unknown file type '{}'", s))
}


fn parse_column(s: &str) -> anyhow::Result<ColumnDescriptor> {
    let (name, ty) = s.split_once(':').ok_or_else(|| anyhow!("expected NAME:TYPE"))?;
    let ty = ty.parse::<NativeType>().with_context(|| format!("invalid type of column '{}'", name))?;
    Ok(ColumnDescriptor::new(name, ty))
}


fn parse_property(s: &str) -> anyhow::Result<(String, String)> {
    let (key, value) = s.split_once('=').ok_or_else(|| anyhow!("expected KEY=VALUE"))?;
    Ok((key.to_string(), value.to_string()))
}
