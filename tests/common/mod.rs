//! Common test helpers and fixtures shared across the test suite.

use datacite_convert::{
    ControlledVocabulary, ConverterConfig, DatasetConverter, DatasetPathUrlBuilder,
    ResourceConverter, ResourceOutcome, SchemaMaps, SourceRecord,
};
use serde_json::Value;

/// Site URL used by every fixture configuration.
#[allow(dead_code)]
pub const SITE_URL: &str = "https://data.example.org";

/// Schema maps for the `datacite` format, as a host would ship them.
pub const SCHEMA_MAPS_JSON: &str = r#"{
    "datacite": {
        "metadata_resource": {
            "identifier": ["doi", "extras.doi"],
            "titles": "titles",
            "titles.title": "title",
            "titles.title.xml:lang": "lang",
            "titles.title.titleType": "type",
            "descriptions.description": "description",
            "descriptions.description.descriptionType": "description_type",
            "formats.format": "format",
            "version": "version"
        }
    }
}"#;

/// Creates the configuration used by the fixtures.
#[allow(dead_code)]
pub fn test_config() -> ConverterConfig {
    ConverterConfig::new().with_site_url(SITE_URL)
}

/// Parses the fixture schema maps.
#[allow(dead_code)]
pub fn test_schema_maps() -> SchemaMaps {
    SchemaMaps::from_json(SCHEMA_MAPS_JSON).expect("fixture schema maps")
}

/// Builds a record from a JSON value.
#[allow(dead_code)]
pub fn record(value: Value) -> SourceRecord {
    SourceRecord::from_value(value).expect("record must be an object")
}

/// Converts a dataset with the fixture configuration.
#[allow(dead_code)]
pub fn convert_dataset(value: Value) -> String {
    let config = test_config();
    DatasetConverter::new(&config, &DatasetPathUrlBuilder)
        .convert(&record(value))
        .expect("dataset conversion")
}

/// Converts a resource with the fixture configuration and schema maps.
#[allow(dead_code)]
pub fn convert_resource(value: Value) -> ResourceOutcome {
    let config = test_config();
    let maps = test_schema_maps();
    let vocabulary = ControlledVocabulary::datacite_31();
    let converter = ResourceConverter::new(&config, &maps, &vocabulary, &DatasetPathUrlBuilder);
    converter.convert(&record(value))
}
