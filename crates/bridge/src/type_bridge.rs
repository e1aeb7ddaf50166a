use crate::error::{Result, ScanError};
use scanbridge_types::{ColumnDescriptor, NativeType, PrimitiveTag, ScalarType, SchemaColumn};


/// Converts a wire schema entry into the native type model.
///
/// Every tag has an answer: tags without a native counterpart become
/// `NativeType::Invalid`. Only structurally broken entries are errors.
pub fn to_native_type(column: &SchemaColumn) -> Result<NativeType> {
    let Some(tag) = column.tag() else {
        return Ok(NativeType::Invalid)
    };
    let ty = match tag {
        PrimitiveTag::Boolean => ScalarType::Boolean.into(),
        PrimitiveTag::TinyInt => ScalarType::TinyInt.into(),
        PrimitiveTag::SmallInt => ScalarType::SmallInt.into(),
        PrimitiveTag::Int => ScalarType::Int.into(),
        PrimitiveTag::BigInt => ScalarType::BigInt.into(),
        PrimitiveTag::LargeInt => ScalarType::LargeInt.into(),
        PrimitiveTag::Float => ScalarType::Float.into(),
        PrimitiveTag::Double => ScalarType::Double.into(),
        PrimitiveTag::Date => ScalarType::Date.into(),
        PrimitiveTag::DateV2 => ScalarType::DateV2.into(),
        PrimitiveTag::DateTime => ScalarType::DateTime.into(),
        PrimitiveTag::DateTimeV2 => ScalarType::DateTimeV2.into(),
        PrimitiveTag::Char => ScalarType::Char.into(),
        PrimitiveTag::Varchar => ScalarType::Varchar.into(),
        PrimitiveTag::String => ScalarType::String.into(),
        PrimitiveTag::Binary => ScalarType::Binary.into(),
        PrimitiveTag::DecimalV2
        | PrimitiveTag::Decimal32
        | PrimitiveTag::Decimal64
        | PrimitiveTag::Decimal128I => NativeType::Decimal {
            precision: non_negative(column, "precision", column.precision)?,
            scale: non_negative(column, "scale", column.scale)?
        },
        PrimitiveTag::Array => {
            let [item] = children::<1>(column)?;
            NativeType::array(to_native_type(item)?)
        },
        PrimitiveTag::Map => {
            // keys are always strings, whatever the scanner declares
            let [_key, value] = children::<2>(column)?;
            NativeType::map(to_native_type(value)?)
        },
        PrimitiveTag::Struct => {
            let fields = column.child_columns.as_ref().ok_or_else(|| {
                malformed(column, "struct entry has no childColumns")
            })?;
            let fields = fields.iter().map(|field| -> Result<(String, NativeType)> {
                let name = field.name.clone().ok_or_else(|| {
                    malformed(column, "struct field has no name")
                })?;
                Ok((name, to_native_type(field)?))
            }).collect::<Result<Vec<_>>>()?;
            NativeType::structure(fields)
        },
        _ => NativeType::Invalid
    };
    Ok(ty)
}


/// Parses the scanner's table schema document, keeping the column order.
pub fn parse_table_schema(document: &str) -> Result<Vec<ColumnDescriptor>> {
    let columns: Vec<SchemaColumn> = serde_json::from_str(document)
        .map_err(|err| ScanError::SchemaParse(err.to_string()))?;

    columns.iter().map(|column| -> Result<ColumnDescriptor> {
        let name = column.name.clone().ok_or_else(|| {
            ScanError::SchemaParse("top level column has no name".to_string())
        })?;
        Ok(ColumnDescriptor::new(name, to_native_type(column)?))
    }).collect()
}


fn children<const N: usize>(column: &SchemaColumn) -> Result<[&SchemaColumn; N]> {
    let children = column.child_columns.as_ref().ok_or_else(|| {
        malformed(column, "container entry has no childColumns")
    })?;
    if children.len() < N {
        return Err(malformed(
            column,
            &format!("expected {} child columns, got {}", N, children.len())
        ))
    }
    Ok(std::array::from_fn(|i| &children[i]))
}


fn non_negative(column: &SchemaColumn, what: &str, value: i32) -> Result<u32> {
    u32::try_from(value).map_err(|_| malformed(column, &format!("negative {}: {}", what, value)))
}


fn malformed(column: &SchemaColumn, msg: &str) -> ScanError {
    ScanError::SchemaParse(format!(
        "column '{}': {}",
        column.name.as_deref().unwrap_or("<unnamed>"),
        msg
    ))
}
