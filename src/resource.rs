//! DataCite conversion of resource records.
//!
//! Resource fields are located through the schema map of the output format
//! (section [`RESOURCE_SECTION`]). When the record embeds its parent dataset
//! under `package_dict`, the dataset is converted as well and the resource
//! document is merged over it using the configured
//! [`MergePolicy`](crate::merge::MergePolicy).
//!
//! Resource conversion runs over batches of many resources, so it never
//! returns an error: any failure is logged and reported as
//! [`ResourceOutcome::Skipped`] with the reason attached.
//!
//! # Examples
//!
//! ```ignore
//! use datacite_convert::{
//!     ControlledVocabulary, ConverterConfig, DatasetPathUrlBuilder, ResourceConverter,
//!     ResourceOutcome, SchemaMaps, SourceRecord,
//! };
//!
//! let maps = SchemaMaps::from_json(r#"{"datacite": {"metadata_resource": {
//!     "identifier": "doi", "titles.title": "name"}}}"#)?;
//! let vocabulary = ControlledVocabulary::datacite_31();
//! let config = ConverterConfig::new();
//! let converter = ResourceConverter::new(&config, &maps, &vocabulary, &DatasetPathUrlBuilder);
//!
//! let record = SourceRecord::from_json(r#"{"name": "rain.csv", "doi": "10.1234/rain"}"#)?;
//! match converter.convert(&record) {
//!     ResourceOutcome::Converted(conversion) => println!("{}", conversion.xml),
//!     ResourceOutcome::Skipped(reason) => eprintln!("skipped: {reason}"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use tracing::{debug, warn};

use crate::config::{ConverterConfig, UrlBuilder};
use crate::dataset::DatasetConverter;
use crate::document::{Document, Node, TextLeaf};
use crate::error::{ConvertError, Result};
use crate::merge::merge_documents;
use crate::record::{first_defined, SourceRecord};
use crate::schema_map::{SchemaMapProvider, SectionMap, RESOURCE_SECTION};
use crate::vocabulary::{to_controlled, Vocabulary};
use crate::xml::document_to_xml;

/// Field of a resource record holding its parent dataset.
pub const PARENT_FIELD: &str = "package_dict";

/// Language assumed for titles and descriptions without one.
pub const DEFAULT_LANGUAGE: &str = "en-us";

/// Description type assumed when none is mapped.
pub const DEFAULT_DESCRIPTION_TYPE: &str = "Abstract";

/// How the resource document relates to its parent dataset.
#[derive(Debug)]
pub enum Inheritance {
    /// The record embeds no parent dataset
    Standalone,
    /// The resource document was merged over the converted dataset
    Merged,
    /// The parent dataset could not be converted; the resource stands alone
    ParentFailed(ConvertError),
}

/// A successfully converted resource.
#[derive(Debug)]
pub struct ResourceConversion {
    /// Serialized DataCite XML
    pub xml: String,
    /// The document tree that was serialized
    pub document: Document,
    /// Whether and how the parent dataset contributed
    pub inheritance: Inheritance,
}

/// Result of converting one resource.
#[derive(Debug)]
pub enum ResourceOutcome {
    /// The resource was converted
    Converted(ResourceConversion),
    /// No document was produced; the batch should continue with the next resource
    Skipped(ConvertError),
}

impl ResourceOutcome {
    /// Returns true if a document was produced.
    #[must_use]
    pub fn is_converted(&self) -> bool {
        matches!(self, ResourceOutcome::Converted(_))
    }

    /// Returns the XML if a document was produced.
    #[must_use]
    pub fn xml(&self) -> Option<&str> {
        match self {
            ResourceOutcome::Converted(conversion) => Some(&conversion.xml),
            ResourceOutcome::Skipped(_) => None,
        }
    }

    /// Returns why the resource was skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&ConvertError> {
        match self {
            ResourceOutcome::Converted(_) => None,
            ResourceOutcome::Skipped(reason) => Some(reason),
        }
    }

    /// Collapses the outcome to "document or nothing".
    #[must_use]
    pub fn into_option(self) -> Option<String> {
        match self {
            ResourceOutcome::Converted(conversion) => Some(conversion.xml),
            ResourceOutcome::Skipped(_) => None,
        }
    }
}

/// Converts resource records to DataCite.
#[derive(Clone, Copy)]
pub struct ResourceConverter<'a> {
    config: &'a ConverterConfig,
    schema_maps: &'a dyn SchemaMapProvider,
    vocabulary: &'a dyn Vocabulary,
    urls: &'a dyn UrlBuilder,
}

impl std::fmt::Debug for ResourceConverter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceConverter")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> ResourceConverter<'a> {
    /// Creates a converter over borrowed configuration and collaborators.
    #[must_use]
    pub fn new(
        config: &'a ConverterConfig,
        schema_maps: &'a dyn SchemaMapProvider,
        vocabulary: &'a dyn Vocabulary,
        urls: &'a dyn UrlBuilder,
    ) -> Self {
        ResourceConverter {
            config,
            schema_maps,
            vocabulary,
            urls,
        }
    }

    /// Convert a resource record, inheriting from its parent dataset if embedded.
    #[must_use]
    pub fn convert(&self, record: &SourceRecord) -> ResourceOutcome {
        match self.try_convert(record) {
            Ok(conversion) => ResourceOutcome::Converted(conversion),
            Err(reason) => {
                warn!(resource = %record_label(record), error = %reason, "resource skipped");
                ResourceOutcome::Skipped(reason)
            },
        }
    }

    fn try_convert(&self, record: &SourceRecord) -> Result<ResourceConversion> {
        let own = self.to_document(record)?;
        let (document, inheritance) = self.inherit(record, own);
        let xml = document_to_xml(&document, self.config.xml_style)?;
        Ok(ResourceConversion {
            xml,
            document,
            inheritance,
        })
    }

    /// Convert the resource's own fields, without inheritance.
    ///
    /// # Errors
    ///
    /// Returns an error if no schema map or resource section exists for the
    /// output format, if the output format lacks a namespace, or if a
    /// vocabulary table is missing.
    pub fn to_document(&self, record: &SourceRecord) -> Result<Document> {
        let format = &self.config.output_format;
        let schema_map = self
            .schema_maps
            .schema_map(&format.name)
            .ok_or_else(|| ConvertError::MissingSchemaMap(format.name.clone()))?;
        let section = schema_map.section(RESOURCE_SECTION).ok_or_else(|| {
            ConvertError::MissingSchemaSection {
                format: format.name.clone(),
                section: RESOURCE_SECTION.to_string(),
            }
        })?;

        let mut doc = Document::with_namespace(format.namespace()?, format.xsd_url()?);

        // Always typed DOI, whatever the mapped value looks like.
        let identifier = section.single_value("identifier", record).unwrap_or_default();
        doc.set(
            "identifier",
            TextLeaf::new(identifier).with_attribute("identifierType", "DOI"),
        );

        doc.set_group("titles", "title", self.titles(section, record)?);

        if let Some(size) = section.single_value_or("sizes.size", record, record.text("size")) {
            doc.set_group("sizes", "size", vec![Node::text(format!("{size} bytes"))]);
        }

        let own_format = first_defined(record.as_map(), &["mimetype", "mimetype_inner"]);
        if let Some(mimetype) = section.single_value_or("formats.format", record, own_format) {
            doc.set_group("formats", "format", vec![Node::text(mimetype)]);
        }

        if let Some(version) = section.single_value("version", record) {
            doc.set("version", Node::text(version));
        }

        doc.set_group("descriptions", "description", descriptions(section, record));

        Ok(doc)
    }

    fn titles(&self, section: &SectionMap, record: &SourceRecord) -> Result<Vec<Node>> {
        let mut titles: Vec<Node> = Vec::new();
        for entry in section.complex_values("titles", "title", &["titleType", "xml:lang"], record) {
            let lang = entry.attribute("xml:lang").unwrap_or(DEFAULT_LANGUAGE);
            let mut title = TextLeaf::new(entry.text.as_str()).with_attribute("xml:lang", lang);
            if let Some(raw) = entry.attribute("titleType") {
                let title_type = to_controlled(self.vocabulary, "titleType", raw)?;
                title = title.with_attribute("titleType", title_type);
            }
            titles.push(Node::Text(title));
        }
        Ok(titles)
    }

    fn inherit(&self, record: &SourceRecord, own: Document) -> (Document, Inheritance) {
        let Some(package) = record.nested(PARENT_FIELD) else {
            return (own, Inheritance::Standalone);
        };

        debug!(dataset = %record_label(&package), "inheriting from dataset");
        match DatasetConverter::new(self.config, self.urls).to_document(&package) {
            Ok(parent) => {
                let merged = merge_documents(&own, &parent, &self.config.merge_policy);
                (merged, Inheritance::Merged)
            },
            Err(reason) => {
                warn!(
                    resource = %record_label(record),
                    error = %reason,
                    "parent dataset not converted; resource stands alone"
                );
                (own, Inheritance::ParentFailed(reason))
            },
        }
    }
}

fn descriptions(section: &SectionMap, record: &SourceRecord) -> Vec<Node> {
    section
        .complex_values(
            "descriptions",
            "description",
            &["xml:lang", "descriptionType"],
            record,
        )
        .into_iter()
        .map(|entry| {
            let description_type = entry
                .attribute("descriptionType")
                .unwrap_or(DEFAULT_DESCRIPTION_TYPE);
            let lang = entry.attribute("xml:lang").unwrap_or(DEFAULT_LANGUAGE);
            let description = TextLeaf::new(entry.text.as_str())
                .with_attribute("descriptionType", description_type)
                .with_attribute("xml:lang", lang);
            Node::Text(description)
        })
        .collect()
}

fn record_label(record: &SourceRecord) -> String {
    first_defined(record.as_map(), &["id", "name"]).unwrap_or_else(|| "UNKNOWN".to_string())
}
