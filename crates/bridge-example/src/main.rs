mod cli;


use anyhow::{anyhow, Context};
use scanbridge::{Dialect, FormatReader, ScanRange, ScanRangeParams, ValueRangePredicates};
use scanbridge_scanner_client::{make_scanner_ref, IpcFileScanner};
use scanbridge_types::{ColumnDescriptor, FileFormatType};
use std::sync::Arc;
use tracing::info;


fn init_logging(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::builder().parse_lossy(
        std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV)
            .unwrap_or("info".to_string()),
    );

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }
}


fn main() -> anyhow::Result<()> {
    let args = <cli::Cli as clap::Parser>::parse();

    init_logging(args.json_log);

    let dialect = Dialect::by_name(&args.dialect)
        .ok_or_else(|| anyhow!("unknown dialect '{}'", args.dialect))?;

    let params = Arc::new(ScanRangeParams {
        file_type: args.file_type,
        format_type: FileFormatType(args.format_type),
        properties: args.properties.iter().cloned().collect()
    });

    let range = ScanRange {
        path: args.uri.clone(),
        file_type: None,
        start_offset: args.split_offset,
        size: args.split_size
    };

    let scanner = make_scanner_ref(IpcFileScanner::new());

    let reader = |columns: Vec<ColumnDescriptor>| {
        FormatReader::new(dialect.clone(), scanner.clone(), params.clone(), range.clone(), columns)
            .with_batch_size(args.batch_size)
    };

    let columns = if args.columns.is_empty() || args.schema_only {
        let mut discovery = reader(Vec::new());
        discovery.init_schema_discovery()?;
        let (names, types) = discovery.resolve_schema()?;
        for (name, ty) in names.iter().zip(types.iter()) {
            println!("{}: {}", name, ty);
        }
        if args.schema_only {
            return Ok(())
        }
        names.into_iter()
            .zip(types)
            .map(|(name, ty)| ColumnDescriptor::new(name, ty))
            .collect()
    } else {
        args.columns.clone()
    };

    let mut scan = reader(columns);
    scan.init_scan(ValueRangePredicates::new())?;

    let mut total_rows = 0;
    loop {
        let res = scan.next()?;
        if res.end {
            break
        }
        total_rows += res.num_rows;
        arrow::util::pretty::print_batches(&[res.batch]).context("failed to print a batch")?;
    }
    scan.close()?;

    info!(rows = total_rows, "scan finished");
    Ok(())
}
