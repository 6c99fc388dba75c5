//! This crate provides the element vocabulary used by the ebml-marshal crate: element ids, data types and the built-in element tables.
//!
//! Element tables here are plain data.  The ebml-marshal crate turns them into a frozen registry at runtime.
//!

use std::fmt;

///
/// Contains the EBML header elements and the global elements every EBML document may contain.
///
pub mod header_spec;

///
/// Contains the Matroska/WebM element catalog.
///
pub mod matroska_spec;

///
/// Different data types defined in the EBML specification.
///
/// # Notes
///
/// `String` elements are declared as printable ASCII by the EBML specification while `Utf8` elements may hold any unicode text.  `Date` is a signed count of nanoseconds since 2001-01-01T00:00:00 UTC.
///
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum TagDataType {
    Master,
    UnsignedInt,
    Integer,
    Float,
    String,
    Utf8,
    Date,
    Binary,
}

impl fmt::Display for TagDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagDataType::Master => "master",
            TagDataType::UnsignedInt => "unsigned integer",
            TagDataType::Integer => "signed integer",
            TagDataType::Float => "float",
            TagDataType::String => "string",
            TagDataType::Utf8 => "utf-8",
            TagDataType::Date => "date",
            TagDataType::Binary => "binary",
        };
        f.write_str(name)
    }
}

///
/// The id of an EBML element, kept as its raw encoded bytes.
///
/// Unlike a plain integer, an `ElementId` retains its vint length-marker bits.  Two ids with different encoded lengths are therefore always distinct, e.g. `0x81` and `0x4001` never compare equal even though both carry the data value `1`.
///
/// ```
/// use ebml_marshal_specification::ElementId;
///
/// let ebml = ElementId::from_u32(0x1a45dfa3).unwrap();
/// assert_eq!(&[0x1a, 0x45, 0xdf, 0xa3], ebml.as_bytes());
/// assert_eq!(4, ebml.len());
/// assert!(ElementId::from_u32(0x0a45dfa3).is_none());
/// ```
///
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ElementId {
    bytes: [u8; 4],
    len: u8,
}

impl ElementId {

    ///
    /// Reads an id from its encoded bytes.
    ///
    /// Returns `None` if the slice is empty, longer than 4 bytes, or if the length marker in the first byte does not match the slice length.
    ///
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let len = bytes.len();
        if len == 0 || len > 4 {
            return None;
        }

        let first = bytes[0];
        if first == 0 || first.leading_zeros() as usize + 1 != len {
            return None;
        }

        let mut buffer = [0u8; 4];
        buffer[..len].copy_from_slice(bytes);
        Some(ElementId { bytes: buffer, len: len as u8 })
    }

    ///
    /// Reads an id from its conventional hexadecimal notation, e.g. `0x1a45dfa3`.
    ///
    /// Leading zero bytes are not part of the id, so the encoded length is taken from the most significant non-zero byte.
    ///
    pub fn from_u32(raw: u32) -> Option<Self> {
        let bytes = raw.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        Self::from_bytes(&bytes[skip..])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    ///
    /// Returns the id in its conventional hexadecimal notation, marker bits included.
    ///
    pub fn value(&self) -> u32 {
        self.as_bytes().iter().fold(0u32, |acc, b| (acc << 8) | *b as u32)
    }

    ///
    /// Returns whether the data bits of this id are all zeros or all ones.
    ///
    /// These patterns are reserved by the EBML specification and are only accepted when a registry explicitly defines them.
    ///
    pub fn is_reserved(&self) -> bool {
        let mask = (1u32 << (7 * self.len())) - 1;
        let data = self.value() & mask;
        data == 0 || data == mask
    }
}

impl TryFrom<u32> for ElementId {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        ElementId::from_u32(raw).ok_or(raw)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.as_bytes() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

///
/// Where an element may appear in a document.
///
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Placement {

    ///
    /// A top level element with no parent, e.g. `EBML` or `Segment`.
    ///
    Root,

    ///
    /// A direct child of the named master element.
    ///
    Child(&'static str),

    ///
    /// An element allowed inside any master element, e.g. `Void`.
    ///
    Global,
}

///
/// A declarative element table entry.
///
/// Ids are written in their conventional hexadecimal notation and validated when a registry is built from the table.
///
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ElementSpec {
    pub name: &'static str,
    pub id: u32,
    pub data_type: TagDataType,
    pub placement: Placement,
}

impl ElementSpec {
    pub const fn root(name: &'static str, id: u32, data_type: TagDataType) -> Self {
        ElementSpec { name, id, data_type, placement: Placement::Root }
    }

    pub const fn child(parent: &'static str, name: &'static str, id: u32, data_type: TagDataType) -> Self {
        ElementSpec { name, id, data_type, placement: Placement::Child(parent) }
    }

    pub const fn global(name: &'static str, id: u32, data_type: TagDataType) -> Self {
        ElementSpec { name, id, data_type, placement: Placement::Global }
    }
}

///
/// Returns every built-in element: the EBML header and globals followed by the Matroska catalog.
///
pub fn builtin_elements() -> impl Iterator<Item = &'static ElementSpec> {
    header_spec::HEADER_ELEMENTS.iter().chain(matroska_spec::MATROSKA_ELEMENTS.iter())
}
