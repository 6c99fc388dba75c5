//!
//! Writes bound struct fields as an EBML element tree.
//!

use std::io::Write;

use ebml_marshal_specification::TagDataType;

use super::binding::{bind, EbmlMarshal, FieldBinding};
use super::errors::encoder::EncodeError;
use super::schema::Schema;
use super::tools::{Vint, UNKNOWN_SIZE};
use super::values::{encode_leaf, Leaf};

///
/// Options that change how an [`Encoder`] frames elements.
///
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    size_length: Option<usize>,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Writes every size vint with exactly `length` bytes instead of the shortest length.
    ///
    /// Encoding fails with [`EncodeError::ValueTooLarge`] if an element's size does not fit.
    ///
    pub fn size_length(mut self, length: usize) -> Self {
        self.size_length = Some(length);
        self
    }
}

///
/// Writes values as EBML element trees.
///
/// Children of a master element are encoded into their own buffer first, so every size is known when its header is written.  Nothing reaches the destination until the whole value has been encoded.
///
/// ## Example
///
/// ```
/// use ebml_marshal::{EbmlMarshal, Encoder};
/// use ebml_marshal::schema::Schema;
///
/// #[derive(EbmlMarshal, Default)]
/// struct Header {
///     #[ebml("EBMLDocType")]
///     doc_type: String,
/// }
///
/// #[derive(EbmlMarshal, Default)]
/// struct Document {
///     #[ebml("EBML")]
///     header: Header,
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let schema = Schema::builtin()?;
/// let encoder = Encoder::new(&schema);
/// let document = Document { header: Header { doc_type: "webm".into() } };
/// let bytes = encoder.encode(&document)?;
/// assert_eq!(vec![0x1a, 0x45, 0xdf, 0xa3, 0x88, 0x42, 0x82, 0x85, 0x77, 0x65, 0x62, 0x6d, 0x00], bytes);
/// # Ok(())
/// # }
/// ```
///
pub struct Encoder<'s> {
    schema: &'s Schema,
    options: EncodeOptions,
}

impl<'s> Encoder<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_options(schema, EncodeOptions::default())
    }

    pub fn with_options(schema: &'s Schema, options: EncodeOptions) -> Self {
        Encoder { schema, options }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    ///
    /// Encodes the bound fields of `value` as a sequence of top level elements.
    ///
    pub fn encode<T: EbmlMarshal>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        let bindings = bind::<T>(self.schema)?;
        let mut out = Vec::new();
        self.write_fields(value, &bindings, &mut out)?;
        Ok(out)
    }

    ///
    /// Encodes `value` and writes the result to `dest` with a single `write_all`, followed by a flush.
    ///
    /// # Errors
    ///
    /// If encoding fails nothing is written.
    ///
    pub fn marshal<T: EbmlMarshal, W: Write>(&self, value: &T, dest: &mut W) -> Result<(), EncodeError> {
        let bytes = self.encode(value)?;
        dest.write_all(&bytes).map_err(|source| EncodeError::WriteError { source })?;
        dest.flush().map_err(|source| EncodeError::WriteError { source })
    }

    fn write_fields<T: EbmlMarshal>(&self, value: &T, bindings: &[FieldBinding<'_>], out: &mut Vec<u8>) -> Result<(), EncodeError> {
        for binding in bindings {
            if binding.spec.omit_empty && value.field_is_empty(binding.index) {
                continue;
            }
            value.encode_field(binding.index, binding, self, out)?;
        }
        Ok(())
    }

    ///
    /// Writes `value` as the master element named by `binding`.
    ///
    pub fn write_master<T: EbmlMarshal>(&self, binding: &FieldBinding<'_>, value: &T, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        if !binding.expects(TagDataType::Master) {
            return Err(binding.incompatible().into());
        }

        let bindings = bind::<T>(self.schema)?;
        let mut content = Vec::new();
        self.write_fields(value, &bindings, &mut content)?;
        self.write_element(binding, &content, out)
    }

    ///
    /// Writes `value` as the leaf element named by `binding`.
    ///
    pub fn write_leaf<L: Leaf>(&self, binding: &FieldBinding<'_>, value: &L, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let content = encode_leaf(binding.definition.data_type, &value.to_tag_data()).ok_or_else(|| binding.incompatible())?;
        self.write_element(binding, &content, out)
    }

    fn write_element(&self, binding: &FieldBinding<'_>, content: &[u8], out: &mut Vec<u8>) -> Result<(), EncodeError> {
        out.extend_from_slice(binding.definition.id.as_bytes());
        if binding.spec.unknown_size {
            out.extend_from_slice(&UNKNOWN_SIZE);
        } else {
            let size = content.len() as u64;
            let size = match self.options.size_length {
                Some(length) => size.as_vint_with_length(length),
                None => size.as_vint(),
            }.map_err(|source| EncodeError::ValueTooLarge { element: binding.definition.name, source })?;
            out.extend_from_slice(&size);
        }
        out.extend_from_slice(content);
        Ok(())
    }
}
