//!
//! Leaf element values and their binary encodings.
//!

use std::borrow::Cow;
use std::str;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use ebml_marshal_specification::TagDataType;

use super::errors::specs::SpecMismatchError;
use super::tools::{arr_to_date, arr_to_f64, arr_to_i64, arr_to_u64, i64_to_arr, u64_to_arr};

///
/// The value of a single leaf element, one variant per leaf data type.
///
/// Floats remember whether they were stored in 4 or 8 bytes.
///
#[derive(Clone, Debug, PartialEq)]
pub enum TagData<'a> {
    UnsignedInt(u64),
    Integer(i64),
    Float(f64),
    Float32(f32),
    String(Cow<'a, str>),
    Utf8(Cow<'a, str>),
    Date(Date),
    Binary(Cow<'a, [u8]>),
}

impl TagData<'_> {
    pub fn data_type(&self) -> TagDataType {
        match self {
            TagData::UnsignedInt(_) => TagDataType::UnsignedInt,
            TagData::Integer(_) => TagDataType::Integer,
            TagData::Float(_) | TagData::Float32(_) => TagDataType::Float,
            TagData::String(_) => TagDataType::String,
            TagData::Utf8(_) => TagDataType::Utf8,
            TagData::Date(_) => TagDataType::Date,
            TagData::Binary(_) => TagDataType::Binary,
        }
    }
}

///
/// Encodes a leaf value as the content of an element of the given data type.
///
/// Returns `None` when the value cannot be stored in that data type.  Text of either kind may be stored in both `String` and `Utf8` elements.
///
pub fn encode_leaf(data_type: TagDataType, data: &TagData<'_>) -> Option<Vec<u8>> {
    match (data_type, data) {
        (TagDataType::UnsignedInt, TagData::UnsignedInt(val)) => Some(u64_to_arr(*val)),
        (TagDataType::Integer, TagData::Integer(val)) => Some(i64_to_arr(*val)),
        (TagDataType::Float, TagData::Float(val)) => Some(val.to_be_bytes().to_vec()),
        (TagDataType::Float, TagData::Float32(val)) => Some(val.to_be_bytes().to_vec()),
        (TagDataType::String | TagDataType::Utf8, TagData::String(val) | TagData::Utf8(val)) => {
            let mut bytes = Vec::with_capacity(val.len() + 1);
            bytes.extend_from_slice(val.as_bytes());
            bytes.push(0x00);
            Some(bytes)
        },
        (TagDataType::Date, TagData::Date(val)) => Some(val.nanos().to_be_bytes().to_vec()),
        (TagDataType::Binary, TagData::Binary(val)) => Some(val.to_vec()),
        _ => None,
    }
}

///
/// Decodes the content of a leaf element.
///
/// # Errors
///
/// Fails when the content length does not fit the data type, when `Utf8` content is not valid utf-8, or when `data_type` is `Master`.
///
pub fn decode_leaf(data_type: TagDataType, data: &[u8]) -> Result<TagData<'_>, SpecMismatchError> {
    match data_type {
        TagDataType::Master => Err(SpecMismatchError::IncompatibleType { expected: "leaf value", data_type }),
        TagDataType::UnsignedInt => arr_to_u64(data).map(TagData::UnsignedInt).map_err(SpecMismatchError::UintParseError),
        TagDataType::Integer => arr_to_i64(data).map(TagData::Integer).map_err(SpecMismatchError::IntParseError),
        TagDataType::Float => {
            let val = arr_to_f64(data).map_err(SpecMismatchError::FloatParseError)?;
            if data.len() == 4 {
                Ok(TagData::Float32(val as f32))
            } else {
                Ok(TagData::Float(val))
            }
        },
        TagDataType::Date => arr_to_date(data).map(|val| TagData::Date(Date::from_nanos(val))).map_err(SpecMismatchError::DateParseError),
        TagDataType::String => Ok(TagData::String(String::from_utf8_lossy(trim_terminator(data)))),
        TagDataType::Utf8 => str::from_utf8(trim_terminator(data))
            .map(|val| TagData::Utf8(Cow::Borrowed(val)))
            .map_err(|source| SpecMismatchError::Utf8ParseError { source }),
        TagDataType::Binary => Ok(TagData::Binary(Cow::Borrowed(data))),
    }
}

fn trim_terminator(data: &[u8]) -> &[u8] {
    let end = data.iter().rposition(|b| *b != 0x00).map_or(0, |last| last + 1);
    &data[..end]
}

///
/// An EBML date: signed nanoseconds relative to 2001-01-01T00:00:00 UTC.
///
/// ```
/// use ebml_marshal::Date;
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let millennium = UNIX_EPOCH + Duration::from_secs(978_307_200);
/// assert_eq!(Date::default(), Date::try_from(millennium).unwrap());
/// assert_eq!(Some(millennium), Date::from_nanos(0).to_system_time());
/// ```
///
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(i64);

impl Date {
    ///
    /// Seconds between the unix epoch and the EBML epoch.
    ///
    pub const EPOCH_UNIX_SECONDS: u64 = 978_307_200;

    pub const fn from_nanos(nanos: i64) -> Self {
        Date(nanos)
    }

    pub const fn nanos(&self) -> i64 {
        self.0
    }

    ///
    /// Converts to a [`SystemTime`], returning `None` if the platform cannot represent the instant.
    ///
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let epoch = UNIX_EPOCH.checked_add(Duration::from_secs(Self::EPOCH_UNIX_SECONDS))?;
        let offset = Duration::from_nanos(self.0.unsigned_abs());
        if self.0 >= 0 {
            epoch.checked_add(offset)
        } else {
            epoch.checked_sub(offset)
        }
    }
}

impl TryFrom<SystemTime> for Date {
    type Error = SpecMismatchError;

    fn try_from(time: SystemTime) -> Result<Self, Self::Error> {
        let epoch = UNIX_EPOCH + Duration::from_secs(Self::EPOCH_UNIX_SECONDS);
        let out_of_range = || SpecMismatchError::ValueOutOfRange { expected: "Date", value: format!("{:?}", time) };
        match time.duration_since(epoch) {
            Ok(after) => i64::try_from(after.as_nanos()).map(Date).map_err(|_| out_of_range()),
            Err(before) => i64::try_from(before.duration().as_nanos())
                .map(|nanos| Date(-nanos))
                .map_err(|_| out_of_range()),
        }
    }
}

///
/// Conversion between a Rust type and a leaf element value.
///
pub trait Leaf: Sized {
    const TYPE_NAME: &'static str;

    fn to_tag_data(&self) -> TagData<'_>;

    fn from_tag_data(data: TagData<'_>) -> Result<Self, SpecMismatchError>;

    ///
    /// Whether the value is the zero value skipped by `omitempty` fields.
    ///
    fn is_zero(&self) -> bool;
}

fn incompatible<T: Leaf>(data: &TagData<'_>) -> SpecMismatchError {
    SpecMismatchError::IncompatibleType { expected: T::TYPE_NAME, data_type: data.data_type() }
}

impl Leaf for u64 {
    const TYPE_NAME: &'static str = "u64";

    fn to_tag_data(&self) -> TagData<'_> {
        TagData::UnsignedInt(*self)
    }

    fn from_tag_data(data: TagData<'_>) -> Result<Self, SpecMismatchError> {
        match data {
            TagData::UnsignedInt(val) => Ok(val),
            other => Err(incompatible::<Self>(&other)),
        }
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl Leaf for i64 {
    const TYPE_NAME: &'static str = "i64";

    fn to_tag_data(&self) -> TagData<'_> {
        TagData::Integer(*self)
    }

    fn from_tag_data(data: TagData<'_>) -> Result<Self, SpecMismatchError> {
        match data {
            TagData::Integer(val) => Ok(val),
            other => Err(incompatible::<Self>(&other)),
        }
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

macro_rules! narrow_leaf {
    ($variant:ident($wide:ty) => $($ty:ty),*) => {
        $(
            impl Leaf for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn to_tag_data(&self) -> TagData<'_> {
                    TagData::$variant(*self as $wide)
                }

                fn from_tag_data(data: TagData<'_>) -> Result<Self, SpecMismatchError> {
                    match data {
                        TagData::$variant(wide) => <$ty>::try_from(wide)
                            .map_err(|_| SpecMismatchError::ValueOutOfRange { expected: Self::TYPE_NAME, value: wide.to_string() }),
                        other => Err(incompatible::<Self>(&other)),
                    }
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

narrow_leaf!(UnsignedInt(u64) => u16, u32, usize);
narrow_leaf!(Integer(i64) => i8, i16, i32);

impl Leaf for bool {
    const TYPE_NAME: &'static str = "bool";

    fn to_tag_data(&self) -> TagData<'_> {
        TagData::UnsignedInt(u64::from(*self))
    }

    fn from_tag_data(data: TagData<'_>) -> Result<Self, SpecMismatchError> {
        match data {
            TagData::UnsignedInt(val) => Ok(val != 0),
            other => Err(incompatible::<Self>(&other)),
        }
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Leaf for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn to_tag_data(&self) -> TagData<'_> {
        TagData::Float(*self)
    }

    fn from_tag_data(data: TagData<'_>) -> Result<Self, SpecMismatchError> {
        match data {
            TagData::Float(val) => Ok(val),
            TagData::Float32(val) => Ok(val as f64),
            other => Err(incompatible::<Self>(&other)),
        }
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Leaf for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn to_tag_data(&self) -> TagData<'_> {
        TagData::Float32(*self)
    }

    fn from_tag_data(data: TagData<'_>) -> Result<Self, SpecMismatchError> {
        match data {
            TagData::Float32(val) => Ok(val),
            TagData::Float(val) => Ok(val as f32),
            other => Err(incompatible::<Self>(&other)),
        }
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Leaf for String {
    const TYPE_NAME: &'static str = "String";

    fn to_tag_data(&self) -> TagData<'_> {
        TagData::Utf8(Cow::Borrowed(self.as_str()))
    }

    fn from_tag_data(data: TagData<'_>) -> Result<Self, SpecMismatchError> {
        match data {
            TagData::String(val) | TagData::Utf8(val) => Ok(val.into_owned()),
            other => Err(incompatible::<Self>(&other)),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Leaf for Vec<u8> {
    const TYPE_NAME: &'static str = "Vec<u8>";

    fn to_tag_data(&self) -> TagData<'_> {
        TagData::Binary(Cow::Borrowed(self.as_slice()))
    }

    fn from_tag_data(data: TagData<'_>) -> Result<Self, SpecMismatchError> {
        match data {
            TagData::Binary(val) => Ok(val.into_owned()),
            other => Err(incompatible::<Self>(&other)),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Leaf for Date {
    const TYPE_NAME: &'static str = "Date";

    fn to_tag_data(&self) -> TagData<'_> {
        TagData::Date(*self)
    }

    fn from_tag_data(data: TagData<'_>) -> Result<Self, SpecMismatchError> {
        match data {
            TagData::Date(val) => Ok(val),
            other => Err(incompatible::<Self>(&other)),
        }
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}
