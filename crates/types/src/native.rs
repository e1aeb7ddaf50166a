use std::fmt::{Display, Formatter};


#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ScalarType {
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    LargeInt,
    Float,
    Double,
    Date,
    DateV2,
    DateTime,
    DateTimeV2,
    Char,
    Varchar,
    String,
    Binary
}


impl ScalarType {
    pub const ALL: [ScalarType; 16] = [
        ScalarType::Boolean,
        ScalarType::TinyInt,
        ScalarType::SmallInt,
        ScalarType::Int,
        ScalarType::BigInt,
        ScalarType::LargeInt,
        ScalarType::Float,
        ScalarType::Double,
        ScalarType::Date,
        ScalarType::DateV2,
        ScalarType::DateTime,
        ScalarType::DateTimeV2,
        ScalarType::Char,
        ScalarType::Varchar,
        ScalarType::String,
        ScalarType::Binary
    ];

    /// Name of the type in the scanner's type grammar
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarType::Boolean => "boolean",
            ScalarType::TinyInt => "tinyint",
            ScalarType::SmallInt => "smallint",
            ScalarType::Int => "int",
            ScalarType::BigInt => "bigint",
            ScalarType::LargeInt => "largeint",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::Date => "date",
            ScalarType::DateV2 => "datev2",
            ScalarType::DateTime => "datetime",
            ScalarType::DateTimeV2 => "datetimev2",
            ScalarType::Char => "char",
            ScalarType::Varchar => "varchar",
            ScalarType::String => "string",
            ScalarType::Binary => "binary"
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.type_name() == name)
    }
}


#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct StructField {
    pub name: String,
    pub ty: NativeType
}


static MAP_KEY: NativeType = NativeType::Scalar(ScalarType::String);


/// Column type as the query engine sees it.
///
/// Maps are keyed by strings only, there is no way to express another key type.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum NativeType {
    Scalar(ScalarType),
    Decimal {
        precision: u32,
        scale: u32
    },
    Array(Box<NativeType>),
    Map(Box<NativeType>),
    Struct(Vec<StructField>),
    Invalid
}


impl NativeType {
    pub const STRING: NativeType = NativeType::Scalar(ScalarType::String);

    pub fn array(element: NativeType) -> Self {
        NativeType::Array(Box::new(element))
    }

    pub fn map(value: NativeType) -> Self {
        NativeType::Map(Box::new(value))
    }

    pub fn structure<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, NativeType)>,
        S: Into<String>
    {
        NativeType::Struct(
            fields.into_iter().map(|(name, ty)| StructField {
                name: name.into(),
                ty
            }).collect()
        )
    }

    /// Key type of any map
    pub fn map_key() -> &'static NativeType {
        &MAP_KEY
    }

    pub fn is_valid(&self) -> bool {
        match self {
            NativeType::Scalar(_) | NativeType::Decimal { .. } => true,
            NativeType::Array(item) | NativeType::Map(item) => item.is_valid(),
            NativeType::Struct(fields) => fields.iter().all(|f| f.ty.is_valid()),
            NativeType::Invalid => false
        }
    }
}


impl From<ScalarType> for NativeType {
    fn from(value: ScalarType) -> Self {
        NativeType::Scalar(value)
    }
}


impl Display for NativeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NativeType::Scalar(t) => f.write_str(t.type_name()),
            NativeType::Decimal { precision, scale } => write!(f, "decimal({},{})", precision, scale),
            NativeType::Array(item) => write!(f, "array<{}>", item),
            NativeType::Map(value) => write!(f, "map<{},{}>", Self::map_key(), value),
            NativeType::Struct(fields) => {
                f.write_str("struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{}", field.name, field.ty)?;
                }
                f.write_str(">")
            },
            NativeType::Invalid => f.write_str("invalid")
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;


    #[test]
    fn nested_type_names() {
        let ty = NativeType::structure([
            ("name", NativeType::STRING),
            ("scores", NativeType::array(NativeType::Decimal { precision: 10, scale: 2 })),
            ("attrs", NativeType::map(ScalarType::Int.into()))
        ]);
        assert_eq!(
            ty.to_string(),
            "struct<name:string,scores:array<decimal(10,2)>,attrs:map<string,int>>"
        );
    }

    #[test]
    fn invalid_is_contagious() {
        assert!(NativeType::array(NativeType::STRING).is_valid());
        assert!(!NativeType::array(NativeType::Invalid).is_valid());
        assert!(!NativeType::structure([("a", NativeType::map(NativeType::Invalid))]).is_valid());
    }
}
