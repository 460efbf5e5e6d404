//! DataCite conversion of dataset records.
//!
//! This module maps a CKAN dataset record onto a DataCite 3.1 document. Fields
//! are read directly from the record; no schema map is involved.
//!
//! | DataCite element | dataset field |
//! |---|---|
//! | `titles/title` | `title` |
//! | `publicationYear` | `metadata_created` |
//! | `creators/creator/creatorName` | `author` |
//! | `subjects/subject` | `tags[].display_name`, else `tags[].name` |
//! | `contributors/contributor/contributorName` | `maintainer` |
//! | `language` | site default locale (always) |
//! | `sizes/size` | `resources[].size` + `" bytes"` |
//! | `formats/format` | `resources[].mimetype`, else `mimetype_inner` (deduplicated) |
//! | `version` | `version` |
//! | `alternateIdentifiers/alternateIdentifier` | landing-page URL (always) |
//! | `rightsList/rights` | `license_title` + `license_url` (both required) |
//! | `descriptions/description` | `notes`, when `note` is defined |
//!
//! Unlike resource conversion, every failure is returned to the caller.
//!
//! # Examples
//!
//! ```ignore
//! use datacite_convert::{ConverterConfig, DatasetConverter, DatasetPathUrlBuilder, SourceRecord};
//!
//! let record = SourceRecord::from_json(r#"{"name": "rain", "title": "Rain Data"}"#)?;
//! let config = ConverterConfig::new().with_site_url("https://data.example.org");
//! let converter = DatasetConverter::new(&config, &DatasetPathUrlBuilder);
//!
//! let xml = converter.convert(&record)?;
//! assert!(xml.contains("<titles><title>Rain Data</title></titles>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde_json::Value;

use crate::config::{ConverterConfig, UrlBuilder};
use crate::document::{Document, ElementList, Node, TextLeaf};
use crate::error::{ConvertError, Result};
use crate::record::{first_defined, is_truthy, value_text, SourceRecord};
use crate::xml::document_to_xml;

/// Converts dataset records to DataCite.
#[derive(Clone, Copy)]
pub struct DatasetConverter<'a> {
    config: &'a ConverterConfig,
    urls: &'a dyn UrlBuilder,
}

impl std::fmt::Debug for DatasetConverter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetConverter")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> DatasetConverter<'a> {
    /// Creates a converter over borrowed configuration and URL builder.
    #[must_use]
    pub fn new(config: &'a ConverterConfig, urls: &'a dyn UrlBuilder) -> Self {
        DatasetConverter { config, urls }
    }

    /// Convert a dataset record to DataCite XML.
    ///
    /// # Errors
    ///
    /// Returns an error if the output format lacks a namespace or schema
    /// location, if a field the mapping reads is missing, or if writing the
    /// XML fails.
    pub fn convert(&self, record: &SourceRecord) -> Result<String> {
        let doc = self.to_document(record)?;
        document_to_xml(&doc, self.config.xml_style)
    }

    /// Convert a dataset record to a DataCite document tree.
    ///
    /// # Errors
    ///
    /// See [`DatasetConverter::convert`].
    pub fn to_document(&self, record: &SourceRecord) -> Result<Document> {
        let format = &self.config.output_format;
        let mut doc = Document::with_namespace(format.namespace()?, format.xsd_url()?);

        if let Some(title) = record.text("title") {
            doc.set_group("titles", "title", vec![Node::text(title)]);
        }

        if let Some(created) = record.text("metadata_created") {
            doc.set("publicationYear", Node::text(created));
        }

        // Datasets carry a single author.
        if let Some(author) = record.text("author") {
            let creator = ElementList::of("creatorName", vec![Node::text(author)]);
            doc.set_group("creators", "creator", vec![Node::List(creator)]);
        }

        if record.is_defined("tags") {
            let subjects = record
                .objects("tags")
                .filter_map(|tag| first_defined(tag, &["display_name", "name"]))
                .map(Node::text)
                .collect();
            doc.set_group("subjects", "subject", subjects);
        }

        if let Some(maintainer) = record.text("maintainer") {
            let contributor = ElementList::of("contributorName", vec![Node::text(maintainer)]);
            doc.set_group("contributors", "contributor", vec![Node::List(contributor)]);
        }

        doc.set("language", Node::text(self.config.default_locale.as_str()));

        doc.set_group("sizes", "size", resource_sizes(record));
        doc.set_group("formats", "format", resource_formats(record));

        if let Some(version) = record.text("version") {
            doc.set("version", Node::text(version));
        }

        let name = record.get("name").map(value_text).unwrap_or_default();
        let landing_page = format!("{}{}", self.config.site_url, self.urls.dataset_url(&name));
        let alternate = TextLeaf::new(landing_page).with_attribute("alternateIdentifierType", "URL");
        doc.set_group("alternateIdentifiers", "alternateIdentifier", vec![Node::Text(alternate)]);

        if let (Some(title), Some(url)) = (record.text("license_title"), record.text("license_url")) {
            let rights = TextLeaf::new(title).with_attribute("rightsURI", url);
            doc.set_group("rightsList", "rights", vec![Node::Text(rights)]);
        }

        // Presence is tested on `note` while the text comes from `notes`.
        if record.is_defined("note") {
            let notes = record
                .get("notes")
                .ok_or_else(|| ConvertError::MissingField("notes".into()))?;
            let description =
                TextLeaf::new(value_text(notes)).with_attribute("descriptionType", "Abstract");
            doc.set_group("descriptions", "description", vec![Node::Text(description)]);
        }

        Ok(doc)
    }
}

fn resources(record: &SourceRecord) -> impl Iterator<Item = &serde_json::Map<String, Value>> {
    record.objects("resources")
}

fn resource_sizes(record: &SourceRecord) -> Vec<Node> {
    resources(record)
        .filter_map(|resource| resource.get("size").filter(|v| is_truthy(v)))
        .map(|size| Node::text(format!("{} bytes", value_text(size))))
        .collect()
}

/// Mimetypes of all resources, first occurrence kept.
fn resource_formats(record: &SourceRecord) -> Vec<Node> {
    let mut formats: Vec<Node> = Vec::new();
    for resource in resources(record) {
        if let Some(mimetype) = first_defined(resource, &["mimetype", "mimetype_inner"]) {
            let format = Node::text(mimetype);
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
    }
    formats
}
