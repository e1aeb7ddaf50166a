use arrow::array::{Int64Array, ListBuilder, RecordBatch, StringArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::ipc::writer::FileWriter;
use scanbridge::{Dialect, FormatReader, ScanRange, ScanRangeParams, SessionState, ValueRangePredicates};
use scanbridge_scanner_client::IpcFileScanner;
use scanbridge_types::{ColumnDescriptor, FileFormatType, FileType, NativeType, ScalarType};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;


fn write_table(path: &Path) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("tags", DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))), true)
    ]));
    let mut writer = FileWriter::try_new(std::fs::File::create(path).unwrap(), &schema).unwrap();
    for chunk in 0..3i64 {
        let ids: Vec<i64> = (chunk * 10..chunk * 10 + 10).collect();
        let names: Vec<String> = ids.iter().map(|i| format!("row-{}", i)).collect();
        let mut tags = ListBuilder::new(StringBuilder::new());
        for id in ids.iter() {
            tags.values().append_value(format!("t{}", id % 3));
            tags.append(true);
        }
        let batch = RecordBatch::try_new(schema.clone(), vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(StringArray::from(names)),
            Arc::new(tags.finish())
        ]).unwrap();
        writer.write(&batch).unwrap();
    }
    writer.finish().unwrap();
}


fn local_params() -> Arc<ScanRangeParams> {
    Arc::new(ScanRangeParams {
        file_type: FileType::Local,
        format_type: FileFormatType::JNI,
        properties: BTreeMap::new()
    })
}


fn split(path: &Path, start_offset: u64) -> ScanRange {
    ScanRange {
        path: path.to_str().unwrap().to_string(),
        file_type: None,
        start_offset,
        size: 1 << 20
    }
}


#[test]
fn discover_then_scan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.arrow");
    write_table(&path);
    let scanner = Arc::new(IpcFileScanner::new());

    let mut discovery = FormatReader::new(
        Dialect::hive(),
        scanner.clone(),
        local_params(),
        split(&path, 0),
        vec![]
    );
    discovery.init_schema_discovery().unwrap();
    let (names, types) = discovery.resolve_schema().unwrap();
    assert_eq!(names, vec!["id", "name", "tags"]);
    assert_eq!(types, vec![
        ScalarType::BigInt.into(),
        NativeType::STRING,
        NativeType::array(NativeType::STRING)
    ]);
    assert_eq!(scanner.open_sessions(), 0);

    // project in a different order than the file stores
    let columns = vec![
        ColumnDescriptor::new("tags", types[2].clone()),
        ColumnDescriptor::new("id", types[0].clone())
    ];
    let mut scan = FormatReader::new(
        Dialect::hive(),
        scanner.clone(),
        local_params(),
        split(&path, 0),
        columns
    ).with_batch_size(7);
    scan.init_scan(ValueRangePredicates::new()).unwrap();

    let mut ids = Vec::new();
    loop {
        let res = scan.next().unwrap();
        if res.end {
            assert_eq!(res.num_rows, 0);
            break
        }
        assert!(res.num_rows <= 7);
        assert_eq!(res.batch.schema().field(0).name(), "tags");
        let col = res.batch.column(1).as_any().downcast_ref::<Int64Array>().unwrap();
        ids.extend(col.values().iter().copied());
    }
    assert_eq!(ids, (0..30).collect::<Vec<i64>>());
    assert_eq!(scan.session_state(), Some(SessionState::Closed));
    assert_eq!(scanner.open_sessions(), 0);
}


#[test]
fn later_splits_are_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.arrow");
    write_table(&path);
    let scanner = Arc::new(IpcFileScanner::new());

    let mut reader = FormatReader::new(
        Dialect::hive(),
        scanner.clone(),
        local_params(),
        split(&path, 4096),
        vec![ColumnDescriptor::new("id", ScalarType::BigInt.into())]
    );
    reader.init_scan(ValueRangePredicates::new()).unwrap();
    let res = reader.next().unwrap();
    assert!(res.end);
    assert_eq!(res.num_rows, 0);
    assert_eq!(scanner.open_sessions(), 0);
}


#[test]
fn dropped_reader_releases_scan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.arrow");
    write_table(&path);
    let scanner = Arc::new(IpcFileScanner::new());

    let mut reader = FormatReader::new(
        Dialect::rc_binary(),
        scanner.clone(),
        local_params(),
        split(&path, 0),
        vec![ColumnDescriptor::new("name", NativeType::STRING)]
    );
    reader.init_scan(ValueRangePredicates::new()).unwrap();
    assert_eq!(reader.next().unwrap().num_rows, 10);
    assert_eq!(scanner.open_sessions(), 1);
    drop(reader);
    assert_eq!(scanner.open_sessions(), 0);
}
