//! Resource → DataCite conversion, including inheritance from the dataset.

mod common;

use common::{convert_resource, record, test_config, test_schema_maps};
use datacite_convert::{
    ControlledVocabulary, ConvertError, DatasetPathUrlBuilder, Document, Inheritance,
    OutputFormat, ResourceConverter, ResourceOutcome, SchemaMaps,
};
use serde_json::{json, Value};

fn converted(outcome: ResourceOutcome) -> (Document, Inheritance, String) {
    match outcome {
        ResourceOutcome::Converted(conversion) => {
            (conversion.document, conversion.inheritance, conversion.xml)
        },
        ResourceOutcome::Skipped(reason) => panic!("resource skipped: {reason}"),
    }
}

fn rain_dataset() -> Value {
    json!({
        "name": "rain-data",
        "title": "Rain Data",
        "metadata_created": "2020-01-01",
        "author": "Doe, Jane",
        "tags": [{"name": "rain"}],
        "resources": [
            {"size": 1024, "mimetype": "text/csv"},
            {"size": 2048, "mimetype": "application/json"}
        ],
        "version": "1.0"
    })
}

#[test]
fn test_resource_without_parent() {
    let (doc, inheritance, xml) = converted(convert_resource(json!({
        "id": "res-1",
        "doi": "10.1234/rain.csv",
        "titles": [{"title": "Rain CSV", "lang": "en-gb", "type": "Subtitle"}],
        "description": "Hourly values",
        "mimetype": "text/csv",
        "size": 1024
    })));

    assert!(matches!(inheritance, Inheritance::Standalone));
    assert!(xml.contains("<identifier identifierType=\"DOI\">10.1234/rain.csv</identifier>"));
    assert!(xml.contains(
        "<titles><title xml:lang=\"en-gb\" titleType=\"Subtitle\">Rain CSV</title></titles>"
    ));
    assert!(xml.contains(
        "<descriptions><description descriptionType=\"Abstract\" xml:lang=\"en-us\">\
         Hourly values</description></descriptions>"
    ));
    assert_eq!(doc.group_texts("sizes", "size"), vec!["1024 bytes"]);
    assert_eq!(doc.group_texts("formats", "format"), vec!["text/csv"]);
    assert!(doc.get("language").is_none());
}

#[test]
fn test_identifier_from_nested_extras() {
    let (doc, _, _) = converted(convert_resource(json!({"extras": {"doi": "10.1/x"}})));
    let identifier = doc.get("identifier").and_then(|n| n.as_text()).expect("identifier");
    assert_eq!(identifier.text, "10.1/x");
}

#[test]
fn test_resource_inherits_dataset() {
    let (doc, inheritance, _) = converted(convert_resource(json!({
        "doi": "10.1234/rain.csv",
        "titles": [
            {"title": "Rain Data"},
            {"title": "Rain CSV"}
        ],
        "mimetype": "text/csv",
        "size": 1024,
        "version": "1.1",
        "package_dict": rain_dataset()
    })));

    assert!(matches!(inheritance, Inheritance::Merged));

    // Resource titles carry xml:lang, so they differ from the dataset title.
    let titles = doc.get("titles").and_then(|n| n.as_list()).expect("titles");
    let texts: Vec<&str> = titles
        .get("title")
        .iter()
        .filter_map(|n| n.as_text())
        .map(|leaf| leaf.text.as_str())
        .collect();
    assert_eq!(texts, vec!["Rain Data", "Rain Data", "Rain CSV"]);

    // Resource-specific elements replace the dataset's.
    assert_eq!(doc.group_texts("sizes", "size"), vec!["1024 bytes"]);
    assert_eq!(doc.group_texts("formats", "format"), vec!["text/csv"]);
    assert_eq!(
        doc.get("version").and_then(|n| n.as_text()).map(|l| l.text.as_str()),
        Some("1.1")
    );

    // Dataset-only elements survive.
    assert_eq!(doc.group_texts("subjects", "subject"), vec!["rain"]);
    assert!(doc.get("creators").is_some());
    assert!(doc.get("language").is_some());
    assert_eq!(
        doc.group_texts("alternateIdentifiers", "alternateIdentifier"),
        vec!["https://data.example.org/dataset/rain-data"]
    );

    // Dataset order first, resource-only elements last.
    let names: Vec<&str> = doc.elements.keys().map(String::as_str).collect();
    assert_eq!(names.first(), Some(&"titles"));
    assert_eq!(names.last(), Some(&"identifier"));
}

#[test]
fn test_failing_parent_leaves_resource_alone() {
    let (doc, inheritance, _) = converted(convert_resource(json!({
        "doi": "10.1234/rain.csv",
        "package_dict": {"name": "rain-data", "note": "flag without notes"}
    })));

    assert!(matches!(
        inheritance,
        Inheritance::ParentFailed(ConvertError::MissingField(_))
    ));
    assert!(doc.get("alternateIdentifiers").is_none());
    assert!(doc.get("identifier").is_some());
}

#[test]
fn test_missing_schema_map_yields_nothing() {
    let config = test_config();
    let maps = SchemaMaps::new();
    let vocabulary = ControlledVocabulary::datacite_31();
    let converter = ResourceConverter::new(&config, &maps, &vocabulary, &DatasetPathUrlBuilder);

    let outcome = converter.convert(&record(json!({"doi": "10.1234/rain.csv"})));
    assert!(matches!(
        outcome.skip_reason(),
        Some(ConvertError::MissingSchemaMap(_))
    ));
    assert_eq!(outcome.into_option(), None);
}

#[test]
fn test_unregistered_format_yields_nothing() {
    let format = OutputFormat {
        name: "oai_dc".to_string(),
        ..OutputFormat::datacite_31()
    };
    let config = test_config().with_output_format(format);
    let maps = test_schema_maps();
    let vocabulary = ControlledVocabulary::datacite_31();
    let converter = ResourceConverter::new(&config, &maps, &vocabulary, &DatasetPathUrlBuilder);

    assert!(converter.convert(&record(json!({}))).xml().is_none());
}

#[test]
fn test_batch_continues_past_bad_resources() {
    let config = test_config();
    let maps = test_schema_maps();
    let empty_vocabulary = ControlledVocabulary::empty();
    let converter =
        ResourceConverter::new(&config, &maps, &empty_vocabulary, &DatasetPathUrlBuilder);

    let batch = vec![
        record(json!({"doi": "10.1/a"})),
        // titleType needs a vocabulary table, which this converter lacks
        record(json!({"doi": "10.1/b", "titles": [{"title": "B", "type": "Subtitle"}]})),
        record(json!({"doi": "10.1/c", "titles": [{"title": "C"}]})),
    ];

    let outcomes: Vec<ResourceOutcome> = batch.iter().map(|r| converter.convert(r)).collect();
    assert!(outcomes[0].is_converted());
    assert!(matches!(
        outcomes[1].skip_reason(),
        Some(ConvertError::UnknownVocabulary(_))
    ));
    assert!(outcomes[2].is_converted());

    let documents: Vec<String> = outcomes
        .into_iter()
        .filter_map(ResourceOutcome::into_option)
        .collect();
    assert_eq!(documents.len(), 2);
}
