use crate::error::{Result, ScanError};
use scanbridge_types::{params, ColumnDescriptor, FileFormatType, FileType, NativeType, ScanParameters};
use std::collections::BTreeMap;


/// Byte range of a file assigned to one scan.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Split {
    pub start_offset: u64,
    pub size: u64
}


/// Column list in the scanner's encoding.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct EncodedColumns {
    pub names: Vec<String>,
    /// comma separated names
    pub fields: String,
    /// `#` separated type names
    pub types: String
}


/// Encodes descriptors in the order given.
///
/// Scanners align batch columns with this list by position.
pub fn encode_columns(columns: &[ColumnDescriptor]) -> Result<EncodedColumns> {
    let mut encoded = EncodedColumns::default();
    for (i, column) in columns.iter().enumerate() {
        if !column.ty.is_valid() {
            return Err(ScanError::UnsupportedType {
                column: column.name.clone(),
                ty: column.ty.to_string()
            })
        }
        check_name(column, &column.name, &[params::FIELDS_DELIMITER, params::TYPES_DELIMITER])?;
        check_field_names(column, &column.ty)?;
        if i > 0 {
            encoded.fields.push_str(params::FIELDS_DELIMITER);
            encoded.types.push_str(params::TYPES_DELIMITER);
        }
        encoded.fields.push_str(&column.name);
        encoded.types.push_str(&column.ty.to_string());
        encoded.names.push(column.name.clone());
    }
    Ok(encoded)
}


/// Struct field names are part of the type list, so they must not contain
/// anything the type grammar or the list encoding treats as punctuation.
const FIELD_NAME_RESERVED: &[&str] = &[
    params::FIELDS_DELIMITER,
    params::TYPES_DELIMITER,
    ":",
    "<",
    ">",
    "(",
    ")"
];


fn check_field_names(column: &ColumnDescriptor, ty: &NativeType) -> Result<()> {
    match ty {
        NativeType::Array(item) | NativeType::Map(item) => check_field_names(column, item),
        NativeType::Struct(fields) => {
            for field in fields.iter() {
                check_name(column, &field.name, FIELD_NAME_RESERVED)?;
                check_field_names(column, &field.ty)?;
            }
            Ok(())
        },
        NativeType::Scalar(_) | NativeType::Decimal { .. } | NativeType::Invalid => Ok(())
    }
}


fn check_name(column: &ColumnDescriptor, name: &str, reserved: &[&str]) -> Result<()> {
    if name.is_empty() || reserved.iter().any(|r| name.contains(r)) {
        return Err(ScanError::InvalidName {
            column: column.name.clone(),
            name: name.to_string()
        })
    }
    Ok(())
}


pub struct RequestBuilder<'a> {
    uri: &'a str,
    file_type: FileType,
    file_format: FileFormatType,
    columns: &'a [ColumnDescriptor],
    properties: Option<&'a BTreeMap<String, String>>,
    overrides: Option<&'a BTreeMap<String, String>>
}


impl<'a> RequestBuilder<'a> {
    pub fn new(uri: &'a str, file_type: FileType, file_format: FileFormatType) -> Self {
        Self {
            uri,
            file_type,
            file_format,
            columns: &[],
            properties: None,
            overrides: None
        }
    }

    pub fn columns(mut self, columns: &'a [ColumnDescriptor]) -> Self {
        self.columns = columns;
        self
    }

    /// Connection properties of the source, used for object stores only
    pub fn properties(mut self, properties: &'a BTreeMap<String, String>) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Entries that replace whatever the builder derives for the same keys
    pub fn overrides(mut self, overrides: &'a BTreeMap<String, String>) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn scan(&self, split: Split) -> Result<ScanParameters> {
        self.build(Some(split))
    }

    pub fn schema_discovery(&self) -> Result<ScanParameters> {
        self.build(None)
    }

    fn build(&self, split: Option<Split>) -> Result<ScanParameters> {
        let columns = encode_columns(self.columns)?;

        let mut p = ScanParameters::new();
        p.insert(params::URI.to_string(), self.uri.to_string());
        p.insert(params::FILE_TYPE.to_string(), self.file_type.to_string());
        p.insert(params::FILE_FORMAT.to_string(), self.file_format.to_string());
        p.insert(params::IS_GET_TABLE_SCHEMA.to_string(), split.is_none().to_string());
        p.insert(params::REQUIRED_FIELDS.to_string(), columns.fields.clone());
        p.insert(params::COLUMNS_NAMES.to_string(), columns.fields);
        p.insert(params::COLUMNS_TYPES.to_string(), columns.types);

        if let Some(split) = split {
            p.insert(params::SPLIT_START_OFFSET.to_string(), split.start_offset.to_string());
            p.insert(params::SPLIT_SIZE.to_string(), split.size.to_string());
        }

        if let Some(overrides) = self.overrides {
            for (key, value) in overrides.iter() {
                p.insert(key.clone(), value.clone());
            }
        }

        if self.file_type.is_object_store() {
            if let Some(properties) = self.properties {
                for (key, value) in properties.iter() {
                    p.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }

        Ok(p)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use scanbridge_types::ScalarType;


    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", ScalarType::BigInt.into()),
            ColumnDescriptor::new("price", NativeType::Decimal { precision: 10, scale: 2 }),
            ColumnDescriptor::new("tags", NativeType::array(NativeType::STRING))
        ]
    }

    fn credentials() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("AWS_ACCESS_KEY".to_string(), "ak".to_string()),
            ("AWS_SECRET_KEY".to_string(), "sk".to_string()),
            ("AWS_ENDPOINT".to_string(), "http://s3.local".to_string()),
            ("uri".to_string(), "s3://elsewhere".to_string())
        ])
    }

    #[test]
    fn scan_parameters() {
        let columns = columns();
        let p = RequestBuilder::new("/data/t.rc", FileType::Local, FileFormatType(11))
            .columns(&columns)
            .scan(Split { start_offset: 0, size: 4096 })
            .unwrap();

        let expected: ScanParameters = [
            ("uri", "/data/t.rc"),
            ("file_type", "0"),
            ("file_format", "11"),
            ("is_get_table_schema", "false"),
            ("required_fields", "id,price,tags"),
            ("columns_names", "id,price,tags"),
            ("columns_types", "bigint#decimal(10,2)#array<string>"),
            ("split_start_offset", "0"),
            ("split_size", "4096")
        ].into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();

        assert_eq!(p, expected);
    }

    #[test]
    fn discovery_has_no_split() {
        let p = RequestBuilder::new("/data/t.rc", FileType::Hdfs, FileFormatType::JNI)
            .schema_discovery()
            .unwrap();
        assert_eq!(p.get("is_get_table_schema").map(String::as_str), Some("true"));
        assert_eq!(p.get("required_fields").map(String::as_str), Some(""));
        assert_eq!(p.get("columns_types").map(String::as_str), Some(""));
        assert!(!p.contains_key("split_start_offset"));
        assert!(!p.contains_key("split_size"));
    }

    #[test]
    fn properties_only_for_object_stores() {
        let props = credentials();

        let local = RequestBuilder::new("/t", FileType::Hdfs, FileFormatType::JNI)
            .properties(&props)
            .scan(Split { start_offset: 0, size: 1 })
            .unwrap();
        assert!(!local.contains_key("AWS_ACCESS_KEY"));

        let s3 = RequestBuilder::new("s3://bucket/t", FileType::S3, FileFormatType::JNI)
            .properties(&props)
            .scan(Split { start_offset: 0, size: 1 })
            .unwrap();
        assert_eq!(s3.get("AWS_ACCESS_KEY").map(String::as_str), Some("ak"));
        assert_eq!(s3.get("AWS_SECRET_KEY").map(String::as_str), Some("sk"));
        assert_eq!(s3.get("AWS_ENDPOINT").map(String::as_str), Some("http://s3.local"));
        // a property never replaces a derived key
        assert_eq!(s3.get("uri").map(String::as_str), Some("s3://bucket/t"));
    }

    #[test]
    fn overrides_win() {
        let columns = columns();
        let overrides = BTreeMap::from([
            ("required_fields".to_string(), "id".to_string()),
            ("serde".to_string(), "x.y.Serde".to_string())
        ]);
        let p = RequestBuilder::new("/t", FileType::Local, FileFormatType::JNI)
            .columns(&columns)
            .overrides(&overrides)
            .scan(Split { start_offset: 0, size: 1 })
            .unwrap();
        assert_eq!(p.get("required_fields").map(String::as_str), Some("id"));
        assert_eq!(p.get("columns_names").map(String::as_str), Some("id,price,tags"));
        assert_eq!(p.get("serde").map(String::as_str), Some("x.y.Serde"));
    }

    #[test]
    fn invalid_column_type() {
        let columns = vec![
            ColumnDescriptor::new("ok", NativeType::STRING),
            ColumnDescriptor::new("bad", NativeType::map(NativeType::Invalid))
        ];
        let err = encode_columns(&columns).unwrap_err();
        assert!(matches!(
            err,
            ScanError::UnsupportedType { ref column, .. } if column == "bad"
        ));
    }

    #[test]
    fn delimiters_in_column_names() {
        for name in ["a,b", "a#b", ""] {
            let columns = vec![
                ColumnDescriptor::new(name, NativeType::STRING),
                ColumnDescriptor::new("c", NativeType::STRING)
            ];
            let err = encode_columns(&columns).unwrap_err();
            assert!(matches!(
                err,
                ScanError::InvalidName { ref column, .. } if column == name
            ));
        }

        // the type list does not split on ':', so top level names may carry it
        let columns = vec![ColumnDescriptor::new("ns:id", ScalarType::Int.into())];
        assert_eq!(encode_columns(&columns).unwrap().fields, "ns:id");
    }

    #[test]
    fn delimiters_in_struct_fields() {
        for field in ["x#y", "x,y", "x:y", "x<y", "x>y", "x(y)"] {
            let columns = vec![
                ColumnDescriptor::new(
                    "s",
                    NativeType::array(NativeType::structure([(field, ScalarType::Int.into())]))
                ),
                ColumnDescriptor::new("c", ScalarType::Int.into())
            ];
            let err = encode_columns(&columns).unwrap_err();
            assert!(matches!(
                err,
                ScanError::InvalidName { ref column, ref name } if column == "s" && name == field
            ));
        }

        let nested = vec![ColumnDescriptor::new(
            "m",
            NativeType::map(NativeType::structure([("inner_1", NativeType::STRING)]))
        )];
        assert_eq!(encode_columns(&nested).unwrap().types, "map<string,struct<inner_1:string>>");
    }
}
