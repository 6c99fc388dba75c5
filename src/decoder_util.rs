use ebml_marshal_specification::ElementId;

use crate::decoder_util::EBMLSize::{Known, Unknown};

///
/// The data size of an element as read from its size vint.
///
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EBMLSize {
    Known(u64),
    Unknown
}

impl EBMLSize {
    pub fn new(size: u64, vint_length: usize) -> Self {
        match vint_length {
            1..=8 if size == (1 << (7 * vint_length)) - 1 => Unknown,
            _ => Known(size),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Unknown)
    }
}

///
/// One open level of the decoder: the root value or a master element being read.
///
#[derive(Clone, Debug)]
pub(crate) struct Scope {
    /// `None` for the root scope.
    pub element: Option<ElementId>,
    /// Absolute offset where the scope's data ends.  Unknown sized scopes inherit the end of their enclosing scope.
    pub end: usize,
    pub unknown_size: bool,
    /// Ids bound to fields of the value being filled in this scope.
    pub bound: Vec<ElementId>,
}

impl Scope {
    pub fn root(end: usize, bound: Vec<ElementId>) -> Self {
        Scope { element: None, end, unknown_size: false, bound }
    }

    pub fn element(id: ElementId, end: usize, unknown_size: bool, bound: Vec<ElementId>) -> Self {
        Scope { element: Some(id), end, unknown_size, bound }
    }

    pub fn binds(&self, id: &ElementId) -> bool {
        self.bound.contains(id)
    }
}
