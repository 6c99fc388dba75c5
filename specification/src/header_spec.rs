use super::ElementSpec;
use super::TagDataType::{Binary, Master, String, UnsignedInt};

///
/// The EBML header elements plus the global `Void` and `CRC32` elements.
///
/// Every EBML document starts with an `EBML` master element built from these entries.
///
pub const HEADER_ELEMENTS: &[ElementSpec] = &[
    ElementSpec::root("EBML", 0x1a45dfa3, Master),
    ElementSpec::child("EBML", "EBMLVersion", 0x4286, UnsignedInt),
    ElementSpec::child("EBML", "EBMLReadVersion", 0x42f7, UnsignedInt),
    ElementSpec::child("EBML", "EBMLMaxIDLength", 0x42f2, UnsignedInt),
    ElementSpec::child("EBML", "EBMLMaxSizeLength", 0x42f3, UnsignedInt),
    ElementSpec::child("EBML", "EBMLDocType", 0x4282, String),
    ElementSpec::child("EBML", "EBMLDocTypeVersion", 0x4287, UnsignedInt),
    ElementSpec::child("EBML", "EBMLDocTypeReadVersion", 0x4285, UnsignedInt),

    ElementSpec::global("Void", 0xec, Binary),
    ElementSpec::global("CRC32", 0xbf, Binary),
];
