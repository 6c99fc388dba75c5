pub mod tool {
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum ToolError {
        #[error("Unrepresentable Vint size encountered.")]
        ReadVintOverflow,
        #[error("Value too large to be written as a vint: {0}")]
        WriteVintOverflow(u64),
        #[error("Vint length must be between 1 and 8, got {0}")]
        InvalidVintLength(usize),
        #[error("Invalid element id: {0:02X?}")]
        InvalidElementId(Vec<u8>),
        #[error("Could not read unsigned int from array: {0:?}")]
        ReadU64Overflow(Vec<u8>),
        #[error("Could not read int from array: {0:?}")]
        ReadI64Overflow(Vec<u8>),
        #[error("Could not read float from array: {0:?}")]
        ReadF64Mismatch(Vec<u8>),
        #[error("Could not read date from array: {0:?}")]
        ReadDateMismatch(Vec<u8>),
    }
}

pub mod schema {
    use ebml_marshal_specification::TagDataType;
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum SchemaError {
        #[error("Unknown element name \"{name}\"")]
        UnknownElement {
            name: &'static str,
        },
        #[error("Element \"{name}\" has an invalid id 0x{id:X}")]
        InvalidId {
            name: &'static str,
            id: u32,
        },
        #[error("Element name \"{name}\" is defined more than once")]
        DuplicateName {
            name: &'static str,
        },
        #[error("Elements \"{first}\" and \"{second}\" share id 0x{id:X}")]
        DuplicateId {
            id: u32,
            first: &'static str,
            second: &'static str,
        },
        #[error("Element \"{element}\" names unknown parent \"{parent}\"")]
        UnknownParent {
            element: &'static str,
            parent: &'static str,
        },
        #[error("Element \"{element}\" names parent \"{parent}\", which is not a master element")]
        ParentNotMaster {
            element: &'static str,
            parent: &'static str,
        },
        #[error("Element \"{element}\" is bound to more than one field")]
        DuplicateBinding {
            element: &'static str,
        },
        #[error("Element \"{element}\" is a {data_type} element and cannot be written with an unknown size")]
        UnknownSizeLeaf {
            element: &'static str,
            data_type: TagDataType,
        },
        #[error("Field \"{field}\" cannot hold {data_type} element \"{element}\"")]
        IncompatibleField {
            field: &'static str,
            element: &'static str,
            data_type: TagDataType,
        },
        #[error("The global schema registry was already initialized")]
        AlreadyInitialized,
    }
}

pub mod specs {
    use ebml_marshal_specification::TagDataType;
    use std::str;
    use thiserror::Error;

    use super::tool::ToolError;

    #[derive(Debug, Error)]
    pub enum SpecMismatchError {
        #[error("Error parsing data as Unsigned Int: {0}")]
        UintParseError(ToolError),
        #[error("Error parsing data as Integer: {0}")]
        IntParseError(ToolError),
        #[error("Error parsing data as Float: {0}")]
        FloatParseError(ToolError),
        #[error("Error parsing data as Date: {0}")]
        DateParseError(ToolError),
        #[error("Error parsing data as Utf8.  See `source()` for details.")]
        Utf8ParseError {
            #[source]
            source: str::Utf8Error,
        },
        #[error("A {data_type} element cannot be stored in a field of type {expected}")]
        IncompatibleType {
            expected: &'static str,
            data_type: TagDataType,
        },
        #[error("Value {value} does not fit in a field of type {expected}")]
        ValueOutOfRange {
            expected: &'static str,
            value: String,
        },
        #[error("Leaf elements cannot have an unknown size")]
        UnknownSizeLeaf,
    }
}

pub mod encoder {
    use std::io;
    use thiserror::Error;

    use super::schema::SchemaError;
    use super::tool::ToolError;

    #[derive(Debug, Error)]
    pub enum EncodeError {
        #[error(transparent)]
        Schema(#[from] SchemaError),
        #[error("Problem writing size of element \"{element}\". {source}")]
        ValueTooLarge {
            element: &'static str,
            #[source]
            source: ToolError,
        },
        #[error("Error writing to destination.")]
        WriteError {
            #[source]
            source: io::Error,
        },
    }
}

pub mod decoder {
    use ebml_marshal_specification::ElementId;
    use std::io;
    use thiserror::Error;

    use super::schema::SchemaError;
    use super::specs::SpecMismatchError;
    use super::tool::ToolError;

    #[derive(Debug, Error)]
    pub enum DecodeError {
        #[error(transparent)]
        Schema(#[from] SchemaError),
        #[error("Encountered corrupted vint at position {position}. {source}")]
        InvalidVint {
            position: usize,
            #[source]
            source: ToolError,
        },
        #[error("Encountered reserved element id {id} at position {position}")]
        InvalidElementId {
            id: ElementId,
            position: usize,
        },
        #[error("Expected an element header at position {position}, but reached the end of the data.")]
        UnexpectedEnd {
            position: usize,
        },
        #[error("Element {id} at position {position} declares {size} bytes but only {available} remain")]
        Truncated {
            id: ElementId,
            position: usize,
            size: u64,
            available: usize,
        },
        #[error("Source data does not match the data type of element \"{element}\" at position {position}. {problem}")]
        TypeMismatch {
            element: &'static str,
            position: usize,
            #[source]
            problem: SpecMismatchError,
        },
        #[error("Element \"{element}\" appeared more than once at position {position}")]
        DuplicateElement {
            element: &'static str,
            position: usize,
        },
        #[error("Master elements nested deeper than {depth} levels")]
        DepthLimitExceeded {
            depth: usize,
        },
        #[error("Error reading from source.")]
        ReadError {
            #[source]
            source: io::Error,
        },
    }
}
