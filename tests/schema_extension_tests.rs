pub mod schema_extension_tests {
    use ebml_marshal::error::SchemaError;
    use ebml_marshal::schema;
    use ebml_marshal::{EbmlMarshal, ElementSpec, TagDataType};

    #[derive(EbmlMarshal, Default, Debug, PartialEq)]
    struct Sensor {
        #[ebml("SensorName")]
        name: String,
        #[ebml("SensorReading")]
        readings: Vec<f32>,
    }

    #[derive(EbmlMarshal, Default, Debug, PartialEq)]
    struct Capture {
        #[ebml("EBMLDocType")]
        doc_type: String,
        #[ebml("Sensor")]
        sensors: Vec<Sensor>,
    }

    const EXTRA: &[ElementSpec] = &[
        ElementSpec::root("Sensor", 0x1c0ffee5, TagDataType::Master),
        ElementSpec::child("Sensor", "SensorName", 0x4e01, TagDataType::Utf8),
        ElementSpec::child("Sensor", "SensorReading", 0x4e02, TagDataType::Float),
    ];

    // Everything lives in one test: the global registry can only be set up once per process.
    #[test]
    pub fn extend_global_registry_once() {
        let bad = [ElementSpec::root("Broken", 0x1a45dfa3, TagDataType::Master)];
        assert!(matches!(schema::init_global(&bad), Err(SchemaError::DuplicateId { .. })));

        let registry = schema::init_global(EXTRA).expect("Test shouldn't error");
        assert_eq!(0x1c0ffee5, registry.lookup_by_name("Sensor").unwrap().id.value());
        assert!(registry.lookup_by_name("EBML").is_some());

        let capture = Capture {
            doc_type: String::from("sensors"),
            sensors: vec![Sensor { name: String::from("left"), readings: vec![1.5, -2.25] }],
        };
        let bytes = ebml_marshal::to_vec(&capture).expect("Test shouldn't error");
        let decoded: Capture = ebml_marshal::from_slice(&bytes).expect("Test shouldn't error");
        assert_eq!(capture, decoded);

        assert!(matches!(schema::init_global(EXTRA), Err(SchemaError::AlreadyInitialized)));
    }
}
