//!
//! Binds the fields of a value to registered elements.
//!
//! Types describe their fields with a static table of [`FieldSpec`]s, normally generated by `#[derive(EbmlMarshal)]`.  [`bind`] resolves that table against a [`Schema`] each time a value is encoded or decoded.
//!

use ebml_marshal_specification::TagDataType;

use super::decoder::{Decoder, ElementHeader};
use super::encoder::Encoder;
use super::errors::decoder::DecodeError;
use super::errors::encoder::EncodeError;
use super::errors::schema::SchemaError;
use super::schema::{ElementDefinition, Schema};
use super::values::{Date, Leaf};

///
/// The static description of one bound field.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as declared, used in error messages.
    pub field: &'static str,
    /// Registered element name.
    pub element: &'static str,
    pub omit_empty: bool,
    pub unknown_size: bool,
    /// The field collects every occurrence of the element.
    pub repeated: bool,
}

///
/// A [`FieldSpec`] resolved against a schema.
///
#[derive(Copy, Clone, Debug)]
pub struct FieldBinding<'s> {
    /// Position of the field in [`EbmlMarshal::fields`].
    pub index: usize,
    pub spec: &'static FieldSpec,
    pub definition: &'s ElementDefinition,
}

///
/// Resolves the field table of `T` in declared order.
///
/// # Errors
///
/// Fails with [`SchemaError::UnknownElement`] for names missing from the schema, [`SchemaError::UnknownSizeLeaf`] when `unknown_size` is set on a leaf element, and [`SchemaError::DuplicateBinding`] when two fields name the same element.
///
pub fn bind<T: EbmlMarshal>(schema: &Schema) -> Result<Vec<FieldBinding<'_>>, SchemaError> {
    let mut bindings: Vec<FieldBinding<'_>> = Vec::with_capacity(T::fields().len());
    for (index, spec) in T::fields().iter().enumerate() {
        let definition = schema.lookup_by_name(spec.element).ok_or(SchemaError::UnknownElement { name: spec.element })?;
        if spec.unknown_size && !definition.is_master() {
            return Err(SchemaError::UnknownSizeLeaf { element: definition.name, data_type: definition.data_type });
        }
        if bindings.iter().any(|b| b.definition.id == definition.id) {
            return Err(SchemaError::DuplicateBinding { element: definition.name });
        }
        bindings.push(FieldBinding { index, spec, definition });
    }
    Ok(bindings)
}

impl FieldBinding<'_> {
    pub(crate) fn incompatible(&self) -> SchemaError {
        SchemaError::IncompatibleField {
            field: self.spec.field,
            element: self.definition.name,
            data_type: self.definition.data_type,
        }
    }

    pub(crate) fn expects(&self, data_type: TagDataType) -> bool {
        self.definition.data_type == data_type
    }
}

///
/// A type whose fields are bound to EBML elements.  Implemented by `#[derive(EbmlMarshal)]`.
///
/// A value of such a type is the content of a master element, or the whole document when passed to [`marshal`](crate::marshal) or [`unmarshal`](crate::unmarshal).
///
/// ```
/// use ebml_marshal::EbmlMarshal;
///
/// #[derive(EbmlMarshal, Default)]
/// struct Header {
///     #[ebml("EBMLDocType")]
///     doc_type: String,
///     #[ebml("EBMLDocTypeVersion", omitempty)]
///     version: u64,
/// }
///
/// let fields = Header::fields();
/// assert_eq!("EBMLDocType", fields[0].element);
/// assert!(fields[1].omit_empty);
/// ```
///
pub trait EbmlMarshal {
    fn fields() -> &'static [FieldSpec];

    fn field_is_empty(&self, index: usize) -> bool;

    fn encode_field(&self, index: usize, binding: &FieldBinding<'_>, encoder: &Encoder<'_>, out: &mut Vec<u8>) -> Result<(), EncodeError>;

    fn decode_field(&mut self, index: usize, binding: &FieldBinding<'_>, header: &ElementHeader, decoder: &mut Decoder<'_, '_>) -> Result<(), DecodeError>;

    ///
    /// Whether every field holds its zero value.
    ///
    fn is_zero(&self) -> bool {
        (0..Self::fields().len()).all(|index| self.field_is_empty(index))
    }
}

///
/// A field type that can hold bound elements.
///
/// Leaf types write a single leaf element, derived structs write a master element, `Option<T>` writes zero or one element and `Vec<T>` one element per item.
///
pub trait Field {
    const REPEATED: bool = false;

    fn is_empty(&self) -> bool;

    fn encode(&self, binding: &FieldBinding<'_>, encoder: &Encoder<'_>, out: &mut Vec<u8>) -> Result<(), EncodeError>;

    fn decode(&mut self, binding: &FieldBinding<'_>, header: &ElementHeader, decoder: &mut Decoder<'_, '_>) -> Result<(), DecodeError>;
}

macro_rules! leaf_field {
    ($($ty:ty),*) => {
        $(
            impl Field for $ty {
                fn is_empty(&self) -> bool {
                    Leaf::is_zero(self)
                }

                fn encode(&self, binding: &FieldBinding<'_>, encoder: &Encoder<'_>, out: &mut Vec<u8>) -> Result<(), EncodeError> {
                    encoder.write_leaf(binding, self, out)
                }

                fn decode(&mut self, binding: &FieldBinding<'_>, header: &ElementHeader, decoder: &mut Decoder<'_, '_>) -> Result<(), DecodeError> {
                    *self = decoder.read_leaf(binding, header)?;
                    Ok(())
                }
            }
        )*
    };
}

// u8 is left out so that Vec<u8> stays binary data rather than a repeated element.
leaf_field!(bool, u16, u32, u64, usize, i8, i16, i32, i64, f32, f64, String, Vec<u8>, Date);

impl<T: Field + Default> Field for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }

    fn encode(&self, binding: &FieldBinding<'_>, encoder: &Encoder<'_>, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        match self {
            Some(value) => value.encode(binding, encoder, out),
            None => Ok(()),
        }
    }

    fn decode(&mut self, binding: &FieldBinding<'_>, header: &ElementHeader, decoder: &mut Decoder<'_, '_>) -> Result<(), DecodeError> {
        self.get_or_insert_with(T::default).decode(binding, header, decoder)
    }
}

impl<T: Field + Default> Field for Vec<T> {
    const REPEATED: bool = true;

    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }

    fn encode(&self, binding: &FieldBinding<'_>, encoder: &Encoder<'_>, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        for item in self {
            item.encode(binding, encoder, out)?;
        }
        Ok(())
    }

    fn decode(&mut self, binding: &FieldBinding<'_>, header: &ElementHeader, decoder: &mut Decoder<'_, '_>) -> Result<(), DecodeError> {
        let mut item = T::default();
        item.decode(binding, header, decoder)?;
        self.push(item);
        Ok(())
    }
}
