#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # datacite-convert
//!
//! Converts CKAN dataset and resource metadata records into DataCite 3.1 XML.
//!
//! ## Quick Start
//!
//! ### Converting a dataset
//!
//! ```ignore
//! use datacite_convert::{ConverterConfig, DatasetConverter, DatasetPathUrlBuilder, SourceRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let record = SourceRecord::from_json(r#"{
//!     "name": "rain-data",
//!     "title": "Rain Data",
//!     "metadata_created": "2020-01-01",
//!     "tags": [{"name": "rain"}],
//!     "resources": [{"size": 1024, "mimetype": "text/csv"}]
//! }"#)?;
//!
//! let config = ConverterConfig::new().with_site_url("https://data.example.org");
//! let xml = DatasetConverter::new(&config, &DatasetPathUrlBuilder).convert(&record)?;
//! println!("{xml}");
//! # Ok(())
//! # }
//! ```
//!
//! ### Converting a resource that inherits from its dataset
//!
//! ```ignore
//! use datacite_convert::{
//!     ControlledVocabulary, ConverterConfig, DatasetPathUrlBuilder, ResourceConverter,
//!     SchemaMaps, SourceRecord,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let maps = SchemaMaps::from_json(&std::fs::read_to_string("schema_maps.json")?)?;
//! let vocabulary = ControlledVocabulary::datacite_31();
//! let config = ConverterConfig::new();
//! let converter = ResourceConverter::new(&config, &maps, &vocabulary, &DatasetPathUrlBuilder);
//!
//! let record = SourceRecord::from_json(&std::fs::read_to_string("resource.json")?)?;
//! if let Some(xml) = converter.convert(&record).into_option() {
//!     println!("{xml}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`dataset`] — Dataset → DataCite mapping
//! - [`resource`] — Resource → DataCite mapping with dataset inheritance
//! - [`merge`] — Layering a resource document over its dataset document
//! - [`document`] — DataCite document tree
//! - [`xml`] — XML serialization and parsing of documents
//! - [`schema_map`] — Field mappings per output format
//! - [`vocabulary`] — Controlled vocabularies for DataCite attributes
//! - [`record`] — Source record access
//! - [`config`] — Conversion settings
//! - [`error`] — Error types and result type

pub mod config;
pub mod dataset;
pub mod document;
pub mod error;
pub mod merge;
pub mod record;
pub mod resource;
pub mod schema_map;
pub mod vocabulary;
pub mod xml;

pub use config::{ConverterConfig, DatasetPathUrlBuilder, OutputFormat, UrlBuilder, XmlStyle};
pub use dataset::DatasetConverter;
pub use document::{Document, ElementList, Node, TextLeaf};
pub use error::{ConvertError, Result};
pub use merge::{merge_documents, merge_xml, MergePolicy, MergeRule};
pub use record::SourceRecord;
pub use resource::{Inheritance, ResourceConversion, ResourceConverter, ResourceOutcome};
pub use schema_map::{FieldMapping, SchemaMap, SchemaMapProvider, SchemaMaps, SectionMap};
pub use vocabulary::{ControlledVocabulary, Vocabulary};
