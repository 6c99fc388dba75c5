
pub mod marshal_tests {
    use ebml_marshal::error::{EncodeError, SchemaError, ToolError};
    use ebml_marshal::schema::{self, Schema};
    use ebml_marshal::{EbmlMarshal, EncodeOptions, Encoder, TagDataType};

    use super::test_spec::*;

    #[derive(EbmlMarshal, Default)]
    struct PlainHeader {
        #[ebml("EBMLDocType")]
        doc_type: String,
        #[ebml("EBMLDocTypeVersion")]
        doc_type_version: u64,
    }

    #[derive(EbmlMarshal, Default)]
    struct PlainHeaderDocument {
        #[ebml("EBML")]
        header: PlainHeader,
    }

    #[derive(EbmlMarshal, Default)]
    struct SegmentDocument {
        #[ebml("Segment")]
        segment: Segment,
    }

    #[test]
    pub fn empty_header() {
        let bytes = ebml_marshal::to_vec(&HeaderDocument::default()).expect("Test shouldn't error");
        assert_eq!(vec![0x1a, 0x45, 0xdf, 0xa3, 0x80], bytes);
    }

    #[test]
    pub fn zero_values_without_omitempty() {
        let bytes = ebml_marshal::to_vec(&PlainHeaderDocument::default()).expect("Test shouldn't error");
        assert_eq!(vec![0x1a, 0x45, 0xdf, 0xa3, 0x88, 0x42, 0x82, 0x81, 0x00, 0x42, 0x87, 0x81, 0x00], bytes);
    }

    #[test]
    pub fn doc_type_string() {
        let document = HeaderDocument {
            header: Header { doc_type: String::from("webm"), ..Default::default() },
        };
        let bytes = ebml_marshal::to_vec(&document).expect("Test shouldn't error");
        assert_eq!(vec![0x1a, 0x45, 0xdf, 0xa3, 0x88, 0x42, 0x82, 0x85, 0x77, 0x65, 0x62, 0x6d, 0x00], bytes);
    }

    #[test]
    pub fn webm_header_with_versions() {
        #[derive(EbmlMarshal, Default, Debug, PartialEq)]
        struct VersionedHeader {
            #[ebml("EBMLDocType")]
            doc_type: String,
            #[ebml("EBMLDocTypeVersion")]
            doc_type_version: u64,
            #[ebml("EBMLDocTypeReadVersion")]
            doc_type_read_version: u64,
        }

        #[derive(EbmlMarshal, Default, Debug, PartialEq)]
        struct VersionedDocument {
            #[ebml("EBML")]
            header: VersionedHeader,
        }

        let document = VersionedDocument {
            header: VersionedHeader { doc_type: String::from("webm"), doc_type_version: 2, doc_type_read_version: 2 },
        };
        let bytes = ebml_marshal::to_vec(&document).expect("Test shouldn't error");
        assert_eq!(vec![
            0x1a, 0x45, 0xdf, 0xa3, 0x90,
                0x42, 0x82, 0x85, 0x77, 0x65, 0x62, 0x6d, 0x00,
                0x42, 0x87, 0x81, 0x02,
                0x42, 0x85, 0x81, 0x02,
        ], bytes);

        let decoded: VersionedDocument = ebml_marshal::from_slice(&bytes).expect("Test shouldn't error");
        assert_eq!(document, decoded);
    }

    #[test]
    pub fn field_name_is_default_element_name() {
        #[allow(non_snake_case)]
        #[derive(EbmlMarshal, Default)]
        struct Untagged {
            EBMLDocType: String,
            #[ebml(omitempty)]
            EBMLDocTypeVersion: u64,
        }

        #[derive(EbmlMarshal, Default)]
        struct Tagged {
            #[ebml("EBMLDocType")]
            doc_type: String,
            #[ebml("EBMLDocTypeVersion", omitempty)]
            doc_type_version: u64,
        }

        let untagged = Untagged { EBMLDocType: String::from("matroska"), EBMLDocTypeVersion: 0 };
        let tagged = Tagged { doc_type: String::from("matroska"), doc_type_version: 0 };
        assert_eq!(ebml_marshal::to_vec(&tagged).unwrap(), ebml_marshal::to_vec(&untagged).unwrap());
    }

    #[test]
    pub fn nested_masters() {
        let mut document = SegmentDocument::default();
        document.segment.info.timecode_scale = 1_000_000;
        document.segment.info.muxing_app = String::from("x");

        let bytes = ebml_marshal::to_vec(&document).expect("Test shouldn't error");
        assert_eq!(vec![
            0x18, 0x53, 0x80, 0x67, 0x91,
                0x15, 0x49, 0xa9, 0x66, 0x8c,
                    0x2a, 0xd7, 0xb1, 0x83, 0x0f, 0x42, 0x40,
                    0x4d, 0x80, 0x82, 0x78, 0x00,
        ], bytes);
    }

    #[test]
    pub fn signed_and_repeated_values() {
        #[derive(EbmlMarshal, Default)]
        struct Group {
            #[ebml("BlockGroup")]
            group: BlockGroup,
        }

        let group = Group { group: BlockGroup { block: vec![0xaa], reference: vec![-40, 300] } };
        let bytes = ebml_marshal::to_vec(&group).expect("Test shouldn't error");
        assert_eq!(vec![
            0xa0, 0x8a,
                0xa1, 0x81, 0xaa,
                0xfb, 0x81, 0xd8,
                0xfb, 0x82, 0x01, 0x2c,
        ], bytes);
    }

    #[test]
    pub fn encoding_is_deterministic() {
        let file = sample_file();
        let first = ebml_marshal::to_vec(&file).expect("Test shouldn't error");
        let second = ebml_marshal::to_vec(&file).expect("Test shouldn't error");
        assert_eq!(first, second);

        let mut dest = Vec::new();
        ebml_marshal::marshal(&file, &mut dest).expect("Test shouldn't error");
        assert_eq!(first, dest);
    }

    #[test]
    pub fn unknown_size_masters() {
        let file = LiveWebmFile {
            header: Header::default(),
            segment: LiveSegment {
                info: Info { timecode_scale: 1, ..Default::default() },
                clusters: vec![Cluster { timecode: 5, ..Default::default() }],
            },
        };

        let bytes = ebml_marshal::to_vec(&file).expect("Test shouldn't error");
        assert_eq!(vec![
            0x1a, 0x45, 0xdf, 0xa3, 0x80,
            0x18, 0x53, 0x80, 0x67, 0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
                0x15, 0x49, 0xa9, 0x66, 0x85, 0x2a, 0xd7, 0xb1, 0x81, 0x01,
                0x1f, 0x43, 0xb6, 0x75, 0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
                    0xe7, 0x81, 0x05,
        ], bytes);
    }

    #[test]
    pub fn size_too_large_for_fixed_length() {
        #[derive(EbmlMarshal, Default)]
        struct Padding {
            #[ebml("Void")]
            void: Vec<u8>,
        }

        let schema = Schema::builtin().unwrap();
        let encoder = Encoder::with_options(&schema, EncodeOptions::new().size_length(1));
        let padding = Padding { void: vec![0u8; 200] };

        let mut dest = Vec::new();
        match encoder.marshal(&padding, &mut dest) {
            Err(EncodeError::ValueTooLarge { element, source }) => {
                assert_eq!("Void", element);
                assert_eq!(ToolError::WriteVintOverflow(200), source);
            },
            other => panic!("unexpected result {:?}", other),
        }
        assert!(dest.is_empty());

        let small = Padding { void: vec![0u8; 2] };
        assert_eq!(vec![0xec, 0x82, 0x00, 0x00], encoder.encode(&small).unwrap());
    }

    #[test]
    pub fn unregistered_element_name() {
        #[derive(EbmlMarshal, Default)]
        struct Unregistered {
            #[ebml("NotAnElement")]
            value: u64,
        }

        let mut dest = Vec::new();
        let result = ebml_marshal::marshal(&Unregistered { value: 1 }, &mut dest);
        assert!(matches!(result, Err(EncodeError::Schema(SchemaError::UnknownElement { name: "NotAnElement" }))));
        assert!(dest.is_empty());
    }

    #[test]
    pub fn incompatible_field_types() {
        #[derive(EbmlMarshal, Default)]
        struct NumberAsText {
            #[ebml("EBMLDocType")]
            doc_type: u64,
        }

        #[derive(EbmlMarshal, Default)]
        struct MasterAsLeaf {
            #[ebml("TimecodeScale")]
            scale: Header,
        }

        let result = ebml_marshal::to_vec(&NumberAsText { doc_type: 1 });
        assert!(matches!(result, Err(EncodeError::Schema(SchemaError::IncompatibleField {
            field: "doc_type",
            element: "EBMLDocType",
            data_type: TagDataType::String,
        }))));

        let result = ebml_marshal::to_vec(&MasterAsLeaf::default());
        assert!(matches!(result, Err(EncodeError::Schema(SchemaError::IncompatibleField { field: "scale", .. }))));
    }

    #[test]
    pub fn unknown_size_on_leaf() {
        #[derive(EbmlMarshal, Default)]
        struct Streamed {
            #[ebml("EBMLDocType", unknown_size)]
            doc_type: String,
        }

        let result = ebml_marshal::to_vec(&Streamed::default());
        assert!(matches!(result, Err(EncodeError::Schema(SchemaError::UnknownSizeLeaf { element: "EBMLDocType", .. }))));
    }

    #[test]
    pub fn skipped_fields_are_not_written() {
        #[derive(EbmlMarshal, Default)]
        struct WithScratch {
            #[ebml("EBMLDocType")]
            doc_type: String,
            #[ebml(skip)]
            scratch: std::collections::HashMap<String, String>,
        }

        let mut value = WithScratch { doc_type: String::from("a"), ..Default::default() };
        value.scratch.insert(String::from("k"), String::from("v"));
        assert_eq!(vec![0x42, 0x82, 0x82, 0x61, 0x00], ebml_marshal::to_vec(&value).unwrap());
    }

    #[test]
    pub fn custom_schema() {
        use ebml_marshal::ElementSpec;

        #[derive(EbmlMarshal, Default)]
        struct Reading {
            #[ebml("Celsius")]
            celsius: i32,
        }

        #[derive(EbmlMarshal, Default)]
        struct Log {
            #[ebml("Reading")]
            readings: Vec<Reading>,
        }

        let specs = [
            ElementSpec::root("Reading", 0x81, TagDataType::Master),
            ElementSpec::child("Reading", "Celsius", 0x82, TagDataType::Integer),
        ];
        let schema = Schema::new(&specs).unwrap();
        let log = Log { readings: vec![Reading { celsius: -5 }, Reading { celsius: 21 }] };
        let bytes = Encoder::new(&schema).encode(&log).unwrap();
        assert_eq!(vec![0x81, 0x83, 0x82, 0x81, 0xfb, 0x81, 0x83, 0x82, 0x81, 0x15], bytes);

        // the global registry does not know these names
        assert!(schema::global().unwrap().lookup_by_name("Celsius").is_none());
    }
}
