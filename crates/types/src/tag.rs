/// Primitive type tags used by the remote scanner's schema documents.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum PrimitiveTag {
    Invalid = 0,
    Null = 1,
    Boolean = 2,
    TinyInt = 3,
    SmallInt = 4,
    Int = 5,
    BigInt = 6,
    Float = 7,
    Double = 8,
    Date = 9,
    DateTime = 10,
    Binary = 11,
    DecimalDeprecated = 12,
    Char = 13,
    LargeInt = 14,
    Varchar = 15,
    Hll = 16,
    DecimalV2 = 17,
    Time = 18,
    Object = 19,
    Array = 20,
    Map = 21,
    Struct = 22,
    String = 23,
    All = 24,
    QuantileState = 25,
    DateV2 = 26,
    DateTimeV2 = 27,
    TimeV2 = 28,
    Decimal32 = 29,
    Decimal64 = 30,
    Decimal128I = 31,
    Jsonb = 32
}


impl PrimitiveTag {
    pub const ALL: [PrimitiveTag; 33] = [
        PrimitiveTag::Invalid,
        PrimitiveTag::Null,
        PrimitiveTag::Boolean,
        PrimitiveTag::TinyInt,
        PrimitiveTag::SmallInt,
        PrimitiveTag::Int,
        PrimitiveTag::BigInt,
        PrimitiveTag::Float,
        PrimitiveTag::Double,
        PrimitiveTag::Date,
        PrimitiveTag::DateTime,
        PrimitiveTag::Binary,
        PrimitiveTag::DecimalDeprecated,
        PrimitiveTag::Char,
        PrimitiveTag::LargeInt,
        PrimitiveTag::Varchar,
        PrimitiveTag::Hll,
        PrimitiveTag::DecimalV2,
        PrimitiveTag::Time,
        PrimitiveTag::Object,
        PrimitiveTag::Array,
        PrimitiveTag::Map,
        PrimitiveTag::Struct,
        PrimitiveTag::String,
        PrimitiveTag::All,
        PrimitiveTag::QuantileState,
        PrimitiveTag::DateV2,
        PrimitiveTag::DateTimeV2,
        PrimitiveTag::TimeV2,
        PrimitiveTag::Decimal32,
        PrimitiveTag::Decimal64,
        PrimitiveTag::Decimal128I,
        PrimitiveTag::Jsonb
    ];

    #[inline]
    pub fn from_i32(value: i32) -> Option<Self> {
        usize::try_from(value).ok().and_then(|idx| Self::ALL.get(idx)).copied()
    }

    #[inline]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
