//!
//! Reads an EBML element tree into bound struct fields.
//!

use ebml_marshal_specification::{ElementId, TagDataType};

use super::binding::{bind, EbmlMarshal, FieldBinding};
use super::decoder_util::{EBMLSize, Scope};
use super::errors::decoder::DecodeError;
use super::errors::specs::SpecMismatchError;
use super::schema::Schema;
use super::tools::{read_element_id, read_size};
use super::values::{decode_leaf, Leaf};

///
/// What to do when a non-repeated field's element appears more than once in the same master.
///
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    ///
    /// Each occurrence is decoded into the field, so the last one is kept.  Master fields decode later occurrences on top of earlier ones.
    ///
    #[default]
    LastWins,

    ///
    /// The first occurrence is kept and later ones are skipped.
    ///
    FirstWins,

    ///
    /// A second occurrence fails with [`DecodeError::DuplicateElement`].
    ///
    Error,
}

///
/// Options that change how strictly a [`Decoder`] reads its input.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    duplicates: DuplicatePolicy,
    max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            duplicates: DuplicatePolicy::default(),
            max_depth: 64,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    ///
    /// Limits how deeply master elements may nest, including skipped ones.  Defaults to 64.
    ///
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

///
/// The id and size of an element, with absolute offsets into the decoder's input.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ElementHeader {
    pub id: ElementId,
    pub size: EBMLSize,
    pub tag_start: usize,
    pub data_start: usize,
}

///
/// Reads EBML element trees into values.
///
/// Elements are matched to fields by id, in any order.  Elements with no matching field are skipped, and fields whose element never appears are left untouched.
///
/// Elements with an unknown size end at the first element that cannot be their child: an element bound in an enclosing scope, or a registered parent, sibling or root element.  Ids bound in the current scope, registered children and global elements stay inside.
///
/// ## Example
///
/// ```
/// use ebml_marshal::{EbmlMarshal, Decoder};
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
/// let bytes = [0x1a, 0x45, 0xdf, 0xa3, 0x88, 0x42, 0x82, 0x85, 0x77, 0x65, 0x62, 0x6d, 0x00];
/// let mut document = Document::default();
/// let consumed = Decoder::new(&schema, &bytes).decode(&mut document)?;
/// assert_eq!(bytes.len(), consumed);
/// assert_eq!("webm", document.header.doc_type);
/// # Ok(())
/// # }
/// ```
///
pub struct Decoder<'a, 's> {
    schema: &'s Schema,
    options: DecodeOptions,
    buffer: &'a [u8],
    position: usize,
    scopes: Vec<Scope>,
}

impl<'a, 's> Decoder<'a, 's> {
    pub fn new(schema: &'s Schema, buffer: &'a [u8]) -> Self {
        Self::with_options(schema, buffer, DecodeOptions::default())
    }

    pub fn with_options(schema: &'s Schema, buffer: &'a [u8], options: DecodeOptions) -> Self {
        Decoder {
            schema,
            options,
            buffer,
            position: 0,
            scopes: Vec::new(),
        }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    ///
    /// Current read offset into the input.
    ///
    pub fn position(&self) -> usize {
        self.position
    }

    ///
    /// Reads the rest of the input into the bound fields of `value`.
    ///
    /// Returns the number of bytes consumed.
    ///
    pub fn decode<T: EbmlMarshal>(&mut self, value: &mut T) -> Result<usize, DecodeError> {
        let bindings = bind::<T>(self.schema)?;
        let start = self.position;
        self.scopes.push(Scope::root(self.buffer.len(), bound_ids(&bindings)));
        let result = self.decode_fields(value, &bindings);
        self.scopes.pop();
        result?;
        Ok(self.position - start)
    }

    fn current_end(&self) -> usize {
        self.scopes.last().map_or(self.buffer.len(), |scope| scope.end)
    }

    fn decode_fields<T: EbmlMarshal>(&mut self, value: &mut T, bindings: &[FieldBinding<'_>]) -> Result<(), DecodeError> {
        let end = self.current_end();
        let unknown_size = self.scopes.last().map_or(false, |scope| scope.unknown_size);
        let mut seen = vec![false; bindings.len()];

        while self.position < end {
            let header = self.read_header(end)?;
            if unknown_size && self.is_ended_by(&header.id) {
                self.position = header.tag_start;
                break;
            }

            let Some(binding) = bindings.iter().find(|b| b.definition.id == header.id) else {
                self.skip_element(&header)?;
                continue;
            };

            if !binding.spec.repeated && seen[binding.index] {
                match self.options.duplicates {
                    DuplicatePolicy::LastWins => {},
                    DuplicatePolicy::FirstWins => {
                        self.skip_element(&header)?;
                        continue;
                    },
                    DuplicatePolicy::Error => return Err(DecodeError::DuplicateElement {
                        element: binding.definition.name,
                        position: header.tag_start,
                    }),
                }
            }
            seen[binding.index] = true;
            value.decode_field(binding.index, binding, &header, self)?;
        }

        Ok(())
    }

    fn is_ended_by(&self, id: &ElementId) -> bool {
        let Some((current, ancestors)) = self.scopes.split_last() else {
            return false;
        };
        if current.binds(id) {
            return false;
        }
        if ancestors.iter().any(|scope| scope.binds(id)) {
            return true;
        }
        match &current.element {
            Some(element) => self.schema.is_ended_by(element, id),
            None => false,
        }
    }

    fn read_header(&mut self, end: usize) -> Result<ElementHeader, DecodeError> {
        let tag_start = self.position;
        let available = &self.buffer[tag_start..end];

        let (id, id_length) = read_element_id(available)
            .map_err(|source| DecodeError::InvalidVint { position: tag_start, source })?
            .ok_or(DecodeError::UnexpectedEnd { position: tag_start })?;
        if id.is_reserved() && self.schema.lookup_by_id(&id).is_none() {
            return Err(DecodeError::InvalidElementId { id, position: tag_start });
        }

        let (size, size_length) = read_size(&available[id_length..])
            .map_err(|source| DecodeError::InvalidVint { position: tag_start + id_length, source })?
            .ok_or(DecodeError::UnexpectedEnd { position: tag_start })?;

        let data_start = tag_start + id_length + size_length;
        if let EBMLSize::Known(size) = size {
            let remaining = end - data_start;
            if size > remaining as u64 {
                return Err(DecodeError::Truncated { id, position: tag_start, size, available: remaining });
            }
        }

        self.position = data_start;
        Ok(ElementHeader { id, size, tag_start, data_start })
    }

    ///
    /// Reads the element described by `header` as a leaf value for `binding`.
    ///
    pub fn read_leaf<L: Leaf>(&mut self, binding: &FieldBinding<'_>, header: &ElementHeader) -> Result<L, DecodeError> {
        let data_type = binding.definition.data_type;
        if data_type == TagDataType::Master {
            return Err(binding.incompatible().into());
        }

        let mismatch = |problem: SpecMismatchError| DecodeError::TypeMismatch {
            element: binding.definition.name,
            position: header.tag_start,
            problem,
        };

        let EBMLSize::Known(size) = header.size else {
            return Err(mismatch(SpecMismatchError::UnknownSizeLeaf));
        };
        let data_end = header.data_start + size as usize;
        let data = &self.buffer[header.data_start..data_end];

        let value = decode_leaf(data_type, data)
            .and_then(L::from_tag_data)
            .map_err(mismatch)?;
        self.position = data_end;
        Ok(value)
    }

    ///
    /// Reads the element described by `header` into the bound fields of `value`.
    ///
    pub fn read_master<T: EbmlMarshal>(&mut self, binding: &FieldBinding<'_>, header: &ElementHeader, value: &mut T) -> Result<(), DecodeError> {
        if !binding.expects(TagDataType::Master) {
            return Err(binding.incompatible().into());
        }

        let bindings = bind::<T>(self.schema)?;
        self.enter(header, bound_ids(&bindings))?;
        let result = self.decode_fields(value, &bindings);
        self.leave(header);
        result
    }

    ///
    /// Moves past the element described by `header` without reading it.
    ///
    /// Unknown sized elements are walked child by child until their end is found.  A registered leaf with an unknown size is an error.
    ///
    pub fn skip_element(&mut self, header: &ElementHeader) -> Result<(), DecodeError> {
        match header.size {
            EBMLSize::Known(size) => {
                self.position = header.data_start + size as usize;
                Ok(())
            },
            EBMLSize::Unknown => {
                if let Some(definition) = self.schema.lookup_by_id(&header.id).filter(|d| !d.is_master()) {
                    return Err(DecodeError::TypeMismatch {
                        element: definition.name,
                        position: header.tag_start,
                        problem: SpecMismatchError::UnknownSizeLeaf,
                    });
                }
                self.enter(header, Vec::new())?;
                let result = self.discard_children();
                self.leave(header);
                result
            },
        }
    }

    fn discard_children(&mut self) -> Result<(), DecodeError> {
        let end = self.current_end();
        while self.position < end {
            let child = self.read_header(end)?;
            if self.is_ended_by(&child.id) {
                self.position = child.tag_start;
                break;
            }
            self.skip_element(&child)?;
        }
        Ok(())
    }

    fn enter(&mut self, header: &ElementHeader, bound: Vec<ElementId>) -> Result<(), DecodeError> {
        if self.scopes.len() > self.options.max_depth {
            return Err(DecodeError::DepthLimitExceeded { depth: self.options.max_depth });
        }

        let (end, unknown_size) = match header.size {
            EBMLSize::Known(size) => (header.data_start + size as usize, false),
            EBMLSize::Unknown => (self.current_end(), true),
        };
        self.scopes.push(Scope::element(header.id, end, unknown_size, bound));
        self.position = header.data_start;
        Ok(())
    }

    fn leave(&mut self, header: &ElementHeader) {
        if let Some(scope) = self.scopes.pop() {
            if let EBMLSize::Known(_) = header.size {
                self.position = scope.end;
            }
        }
    }
}

fn bound_ids(bindings: &[FieldBinding<'_>]) -> Vec<ElementId> {
    bindings.iter().map(|b| b.definition.id).collect()
}
