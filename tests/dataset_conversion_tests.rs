//! Dataset → DataCite conversion through the public API.

mod common;

use common::{convert_dataset, record, test_config, SITE_URL};
use datacite_convert::{
    xml::xml_to_document, DatasetConverter, DatasetPathUrlBuilder, Node, XmlStyle,
};
use serde_json::json;

#[test]
fn test_rain_data_end_to_end() {
    let xml = convert_dataset(json!({
        "name": "rain-data",
        "title": "Rain Data",
        "metadata_created": "2020-01-01",
        "tags": [{"name": "rain"}],
        "resources": [{"size": 1024, "mimetype": "text/csv"}]
    }));

    assert!(xml.contains("<titles><title>Rain Data</title></titles>"));
    assert!(xml.contains("<publicationYear>2020-01-01</publicationYear>"));
    assert!(xml.contains("<subjects><subject>rain</subject></subjects>"));
    assert!(xml.contains("<sizes><size>1024 bytes</size></sizes>"));
    assert!(xml.contains("<formats><format>text/csv</format></formats>"));
    assert!(xml.contains("<language>en</language>"));
    assert!(xml.contains(
        "<alternateIdentifiers><alternateIdentifier alternateIdentifierType=\"URL\">\
         https://data.example.org/dataset/rain-data</alternateIdentifier></alternateIdentifiers>"
    ));
}

#[test]
fn test_header_is_always_present() {
    let xml = convert_dataset(json!({}));
    assert!(xml.contains("xmlns=\"http://datacite.org/schema/kernel-3\""));
    assert!(xml.contains("xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\""));
    assert!(xml.contains(
        "xsi:schemaLocation=\"http://datacite.org/schema/kernel-3 \
         http://schema.datacite.org/meta/kernel-3/metadata.xsd\""
    ));
}

#[test]
fn test_empty_dataset_emits_only_unconditional_elements() {
    let xml = convert_dataset(json!({
        "title": "",
        "author": null,
        "tags": [],
        "resources": [],
        "version": ""
    }));
    let doc = xml_to_document(&xml).expect("parse back");

    let names: Vec<&str> = doc.elements.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["language", "alternateIdentifiers"]);
}

#[test]
fn test_duplicate_mimetypes_collapse_in_order() {
    let xml = convert_dataset(json!({"resources": [
        {"mimetype": "text/csv"},
        {"mimetype": "text/csv"},
        {"mimetype": "application/json"}
    ]}));
    assert!(xml.contains(
        "<formats><format>text/csv</format><format>application/json</format></formats>"
    ));
}

#[test]
fn test_full_dataset_element_order() {
    let xml = convert_dataset(json!({
        "name": "rain-data",
        "title": "Rain Data",
        "metadata_created": "2020-01-01",
        "author": "Doe, Jane",
        "maintainer": "Data Desk",
        "tags": [{"name": "rain", "display_name": "Rain"}],
        "resources": [{"size": 10, "mimetype": "text/csv"}],
        "version": "1.0",
        "license_title": "CC-BY-4.0",
        "license_url": "https://creativecommons.org/licenses/by/4.0/",
        "note": "present",
        "notes": "Hourly rainfall in mm"
    }));
    let doc = xml_to_document(&xml).expect("parse back");

    let names: Vec<&str> = doc.elements.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "titles",
            "publicationYear",
            "creators",
            "subjects",
            "contributors",
            "language",
            "sizes",
            "formats",
            "version",
            "alternateIdentifiers",
            "rightsList",
            "descriptions",
        ]
    );
    assert!(xml.contains("<rights rightsURI=\"https://creativecommons.org/licenses/by/4.0/\">"));
    assert!(xml.contains(
        "<description descriptionType=\"Abstract\">Hourly rainfall in mm</description>"
    ));
}

#[test]
fn test_notes_alone_produce_no_description() {
    // Only the singular `note` field switches the description on.
    let xml = convert_dataset(json!({"notes": "Hourly rainfall in mm"}));
    assert!(!xml.contains("<descriptions>"));
}

#[test]
fn test_site_locale_and_pretty_output() {
    let config = test_config()
        .with_default_locale("de")
        .with_xml_style(XmlStyle::Pretty);
    let xml = DatasetConverter::new(&config, &DatasetPathUrlBuilder)
        .convert(&record(json!({"name": "regen"})))
        .expect("convert");

    assert!(xml.contains("\n  <language>de</language>"));
    let doc = xml_to_document(&xml).expect("parse back");
    assert_eq!(doc.get("language"), Some(&Node::text("de")));
    assert_eq!(
        doc.group_texts("alternateIdentifiers", "alternateIdentifier"),
        vec![format!("{SITE_URL}/dataset/regen").as_str()]
    );
}
