//! This crate marshals Rust structs to and from [EBML][EBML] encoded data.
//!
//! [EBML][EBML] stands for Extensible Binary Meta-Language and is somewhat of a
//! binary version of XML. It's used for container formats like [WebM][webm] or
//! [MKV][mkv].
//!
//! Struct fields are bound to EBML elements with `#[derive(EbmlMarshal)]`.  Each field names a registered element; the element's id and data type come from a [`schema::Schema`].  Fields of a derived struct type become master elements, `Option` fields are written when present and `Vec` fields once per item.
//!
//! ```
//! use ebml_marshal::EbmlMarshal;
//!
//! #[derive(EbmlMarshal, Default, Debug, PartialEq)]
//! struct Header {
//!     #[ebml("EBMLDocType")]
//!     doc_type: String,
//!     #[ebml("EBMLDocTypeVersion", omitempty)]
//!     doc_type_version: u64,
//! }
//!
//! #[derive(EbmlMarshal, Default, Debug, PartialEq)]
//! struct Document {
//!     #[ebml("EBML")]
//!     header: Header,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let document = Document { header: Header { doc_type: "webm".into(), doc_type_version: 4 } };
//! let bytes = ebml_marshal::to_vec(&document)?;
//! let decoded: Document = ebml_marshal::from_slice(&bytes)?;
//! assert_eq!(document, decoded);
//! # Ok(())
//! # }
//! ```
//!
//! # Schemas
//! The built-in schema holds the EBML header, the `Void` and `CRC32` global elements and the common Matroska/WebM elements.  Other elements can be added once per process with [`schema::init_global`], or a separate [`schema::Schema`] can be used directly through [`Encoder`] and [`Decoder`].
//!
//! # Features
//! - `derive` (default) enables `#[derive(EbmlMarshal)]`.
//! - `futures` adds [`nonblocking::marshal_async`] and [`nonblocking::unmarshal_async`].
//!
//! [EBML]: http://ebml.sourceforge.net/
//! [webm]: https://www.webmproject.org/
//! [mkv]: http://www.matroska.org/technical/specs/index.html
//!

extern crate self as ebml_marshal;

mod binding;
mod decoder;
mod decoder_util;
mod encoder;
mod errors;
mod values;
pub mod schema;
pub mod tools;

#[cfg(feature = "futures")]
pub mod nonblocking;

use std::io::{Read, Write};

pub use self::binding::{bind, EbmlMarshal, Field, FieldBinding, FieldSpec};
pub use self::decoder::{DecodeOptions, Decoder, DuplicatePolicy, ElementHeader};
pub use self::decoder_util::EBMLSize;
pub use self::encoder::{EncodeOptions, Encoder};
pub use self::values::{decode_leaf, encode_leaf, Date, Leaf, TagData};
pub use ebml_marshal_specification::{ElementId, ElementSpec, Placement, TagDataType};

#[cfg(feature = "derive")]
pub use ebml_marshal_derive::EbmlMarshal;

pub mod error {
    //!
    //! Contains error types for this crate.
    //!

    pub use super::errors::tool::ToolError;
    pub use super::errors::schema::SchemaError;
    pub use super::errors::specs::SpecMismatchError;
    pub use super::errors::encoder::EncodeError;
    pub use super::errors::decoder::DecodeError;
}

use self::error::{DecodeError, EncodeError};

///
/// Encodes `value` with the global schema and writes it to `dest`.
///
/// Nothing is written if encoding fails.
///
pub fn marshal<T: EbmlMarshal, W: Write>(value: &T, dest: &mut W) -> Result<(), EncodeError> {
    Encoder::new(schema::global()?).marshal(value, dest)
}

///
/// Encodes `value` with the global schema.
///
pub fn to_vec<T: EbmlMarshal>(value: &T) -> Result<Vec<u8>, EncodeError> {
    Encoder::new(schema::global()?).encode(value)
}

///
/// Reads `source` to its end and decodes the data into `value` with the global schema.
///
/// Fields whose elements do not appear in the data keep their current values.  Decoding works on a copy of `value`, so on error `value` is left as it was.
///
pub fn unmarshal<T: EbmlMarshal + Clone, R: Read>(source: &mut R, value: &mut T) -> Result<(), DecodeError> {
    let mut buffer = Vec::new();
    source.read_to_end(&mut buffer).map_err(|source| DecodeError::ReadError { source })?;
    let mut decoded = value.clone();
    Decoder::new(schema::global()?, &buffer).decode(&mut decoded)?;
    *value = decoded;
    Ok(())
}

///
/// Decodes a new `T` from `bytes` with the global schema.
///
pub fn from_slice<T: EbmlMarshal + Default>(bytes: &[u8]) -> Result<T, DecodeError> {
    let mut value = T::default();
    Decoder::new(schema::global()?, bytes).decode(&mut value)?;
    Ok(value)
}
