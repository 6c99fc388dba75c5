//!
//! The element registry: a frozen table that maps element names and ids to their data types and placement.
//!

use std::borrow::Borrow;
use std::collections::HashMap;
use std::sync::OnceLock;

use ebml_marshal_specification::{builtin_elements, ElementId, ElementSpec, Placement, TagDataType};

use super::errors::schema::SchemaError;

///
/// A registered element.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementDefinition {
    pub name: &'static str,
    pub id: ElementId,
    pub data_type: TagDataType,
    pub placement: Placement,
    children: Vec<ElementId>,
}

impl ElementDefinition {
    ///
    /// Ids of the elements whose placement names this element, in table order.
    ///
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn is_master(&self) -> bool {
        self.data_type == TagDataType::Master
    }

    pub fn is_global(&self) -> bool {
        self.placement == Placement::Global
    }
}

///
/// An immutable set of element definitions with unique names and ids.
///
/// ```
/// use ebml_marshal::schema::Schema;
///
/// let schema = Schema::builtin().unwrap();
/// let doc_type = schema.lookup_by_name("EBMLDocType").unwrap();
/// assert_eq!(0x4282, doc_type.id.value());
/// assert_eq!("EBML", schema.parent(doc_type).unwrap().name);
/// ```
///
#[derive(Clone, Debug)]
pub struct Schema {
    elements: Vec<ElementDefinition>,
    by_name: HashMap<&'static str, usize>,
    by_id: HashMap<ElementId, usize>,
}

impl Schema {

    ///
    /// Builds a registry from element table entries.
    ///
    /// # Errors
    ///
    /// Fails if an id is malformed, if a name or id appears twice, or if a child placement names an element that is missing or is not a master.
    ///
    pub fn new<I>(specs: I) -> Result<Self, SchemaError>
        where
            I: IntoIterator,
            I::Item: Borrow<ElementSpec>
    {
        let mut elements: Vec<ElementDefinition> = Vec::new();
        let mut by_name = HashMap::new();
        let mut by_id = HashMap::new();

        for spec in specs {
            let spec = spec.borrow();
            let id = ElementId::from_u32(spec.id).ok_or(SchemaError::InvalidId { name: spec.name, id: spec.id })?;
            if by_name.contains_key(spec.name) {
                return Err(SchemaError::DuplicateName { name: spec.name });
            }
            if let Some(existing) = by_id.get(&id) {
                let first: &ElementDefinition = &elements[*existing];
                return Err(SchemaError::DuplicateId { id: spec.id, first: first.name, second: spec.name });
            }

            by_name.insert(spec.name, elements.len());
            by_id.insert(id, elements.len());
            elements.push(ElementDefinition {
                name: spec.name,
                id,
                data_type: spec.data_type,
                placement: spec.placement,
                children: Vec::new(),
            });
        }

        for index in 0..elements.len() {
            if let Placement::Child(parent) = elements[index].placement {
                let parent_index = *by_name.get(parent).ok_or(SchemaError::UnknownParent { element: elements[index].name, parent })?;
                if !elements[parent_index].is_master() {
                    return Err(SchemaError::ParentNotMaster { element: elements[index].name, parent });
                }
                let id = elements[index].id;
                elements[parent_index].children.push(id);
            }
        }

        Ok(Schema { elements, by_name, by_id })
    }

    ///
    /// Builds a registry holding the EBML header, the global elements and the Matroska/WebM catalog.
    ///
    pub fn builtin() -> Result<Self, SchemaError> {
        Schema::new(builtin_elements())
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&ElementDefinition> {
        self.by_name.get(name).map(|index| &self.elements[*index])
    }

    pub fn lookup_by_id(&self, id: &ElementId) -> Option<&ElementDefinition> {
        self.by_id.get(id).map(|index| &self.elements[*index])
    }

    pub fn children<'s>(&'s self, definition: &'s ElementDefinition) -> impl Iterator<Item = &'s ElementDefinition> + 's {
        definition.children.iter().filter_map(move |id| self.lookup_by_id(id))
    }

    pub fn parent(&self, definition: &ElementDefinition) -> Option<&ElementDefinition> {
        match definition.placement {
            Placement::Child(parent) => self.lookup_by_name(parent),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementDefinition> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    ///
    /// Returns whether `parent` is the direct parent of `child`.
    ///
    pub fn is_parent(&self, parent: &ElementId, child: &ElementId) -> bool {
        self.lookup_by_id(child)
            .and_then(|child| self.parent(child))
            .map_or(false, |found| found.id == *parent)
    }

    ///
    /// Returns whether `ancestor` is a parent, grandparent, etc. of `descendant`.
    ///
    pub fn is_ancestor(&self, ancestor: &ElementId, descendant: &ElementId) -> bool {
        let mut current = self.lookup_by_id(descendant).and_then(|d| self.parent(d));
        while let Some(definition) = current {
            if definition.id == *ancestor {
                return true;
            }
            current = self.parent(definition);
        }
        false
    }

    ///
    /// Returns whether two elements share the same parent, or are both root elements.
    ///
    pub fn is_sibling(&self, first: &ElementId, second: &ElementId) -> bool {
        match (self.lookup_by_id(first), self.lookup_by_id(second)) {
            (Some(first), Some(second)) => match (first.placement, second.placement) {
                (Placement::Child(a), Placement::Child(b)) => a == b,
                (Placement::Root, Placement::Root) => true,
                _ => false,
            },
            _ => false,
        }
    }

    ///
    /// Returns whether reading `next` closes an unknown sized `current` element.
    ///
    /// Unknown sized elements are ended by any registered element that cannot be their descendant: a parent, a sibling, a root element, or anything placed under a different branch.  Global elements and unregistered ids never end an element.  An unregistered `current` element is ended by any registered non-global element.
    ///
    pub fn is_ended_by(&self, current: &ElementId, next: &ElementId) -> bool {
        let Some(next_definition) = self.lookup_by_id(next) else {
            return false;
        };
        if next_definition.is_global() {
            return false;
        }
        if self.lookup_by_id(current).is_none() {
            return true;
        }

        !self.is_ancestor(current, next)
    }
}

static SCHEMA: OnceLock<Result<Schema, SchemaError>> = OnceLock::new();

///
/// Returns the process-wide registry, building it from the built-in tables on first use.
///
/// # Errors
///
/// Fails only if the built-in tables are inconsistent.
///
pub fn global() -> Result<&'static Schema, SchemaError> {
    SCHEMA.get_or_init(Schema::builtin).as_ref().map_err(Clone::clone)
}

///
/// Builds the process-wide registry from the built-in tables plus `extra`.
///
/// This must run before anything reads the global registry.
///
/// # Errors
///
/// Fails with [`SchemaError::AlreadyInitialized`] if the registry already exists, or with the validation error of the combined tables.
///
pub fn init_global(extra: &[ElementSpec]) -> Result<&'static Schema, SchemaError> {
    if SCHEMA.get().is_some() {
        return Err(SchemaError::AlreadyInitialized);
    }
    let schema = Schema::new(builtin_elements().copied().chain(extra.iter().copied()))?;
    SCHEMA.set(Ok(schema)).map_err(|_| SchemaError::AlreadyInitialized)?;
    global()
}
