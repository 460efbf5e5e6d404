//! Schema maps: where each DataCite field comes from in a source record.
//!
//! A [`SchemaMap`] belongs to one output format and is split into named
//! sections (`metadata_resource` for resources). Each section maps a target
//! key to a [`FieldMapping`]. Target keys join the DataCite element path with
//! dots, and attributes are addressed as a last segment:
//!
//! | key | target |
//! |---|---|
//! | `identifier` | `<identifier>` text |
//! | `titles` | collection the titles are read from |
//! | `titles.title` | `<title>` text |
//! | `titles.title.xml:lang` | `xml:lang` attribute of `<title>` |
//!
//! Schema maps are plain data and can be loaded from JSON, where a mapping may
//! be written as a single path, a list of paths, or an object:
//!
//! ```json
//! {
//!   "datacite": {
//!     "metadata_resource": {
//!       "identifier": "doi",
//!       "titles.title": ["name", "title"],
//!       "version": {"sources": ["version"], "default": "1.0"}
//!     }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::record::{is_truthy, lookup_in, value_text, SourceRecord};

/// Section holding the resource field mappings.
pub const RESOURCE_SECTION: &str = "metadata_resource";

/// Where one target field is read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFieldMapping")]
pub struct FieldMapping {
    /// Dotted source paths, tried in order
    pub sources: Vec<String>,
    /// Value used when no source path is defined
    pub default: Option<String>,
}

impl FieldMapping {
    /// Maps a single source path.
    #[must_use]
    pub fn path(source: impl Into<String>) -> Self {
        FieldMapping {
            sources: vec![source.into()],
            default: None,
        }
    }

    /// Maps several source paths, first defined wins.
    #[must_use]
    pub fn paths(sources: &[&str]) -> Self {
        FieldMapping {
            sources: sources.iter().map(|s| (*s).to_string()).collect(),
            default: None,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// First defined source value within `fields`.
    fn find<'a>(&self, fields: &'a Map<String, Value>) -> Option<&'a Value> {
        self.sources
            .iter()
            .filter_map(|path| lookup_in(fields, path))
            .find(|v| is_truthy(v))
    }

    fn default_text(&self) -> Option<String> {
        self.default.clone().filter(|d| !d.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldMapping {
    Path(String),
    Paths(Vec<String>),
    Full {
        #[serde(default, alias = "field_name")]
        sources: Vec<String>,
        #[serde(default)]
        default: Option<String>,
    },
}

impl From<RawFieldMapping> for FieldMapping {
    fn from(raw: RawFieldMapping) -> Self {
        match raw {
            RawFieldMapping::Path(path) => FieldMapping::path(path),
            RawFieldMapping::Paths(sources) => FieldMapping {
                sources,
                default: None,
            },
            RawFieldMapping::Full { sources, default } => FieldMapping { sources, default },
        }
    }
}

/// One value of a multi-value field: element text plus named attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedEntry {
    /// Element text
    pub text: String,
    /// Attribute values keyed by attribute name (e.g. `xml:lang`)
    pub attributes: IndexMap<String, String>,
}

impl MappedEntry {
    /// Returns an attribute value if it was mapped.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Field mappings of one section, keyed by joined target key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SectionMap {
    fields: IndexMap<String, FieldMapping>,
}

impl SectionMap {
    /// Creates an empty section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, mapping: FieldMapping) -> Self {
        self.fields.insert(key.into(), mapping);
        self
    }

    /// Returns the mapping for a target key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldMapping> {
        self.fields.get(key)
    }

    /// Single value: first defined source path, else the mapping default.
    #[must_use]
    pub fn single_value(&self, key: &str, record: &SourceRecord) -> Option<String> {
        self.resolve(key, record.as_map())
    }

    /// Single value with a caller-supplied last resort.
    #[must_use]
    pub fn single_value_or(
        &self,
        key: &str,
        record: &SourceRecord,
        fallback: Option<String>,
    ) -> Option<String> {
        self.single_value(key, record)
            .or_else(|| fallback.filter(|f| !f.is_empty()))
    }

    /// Multi-value lookup for `group.element` with attribute sub-keys.
    ///
    /// If `group` itself is mapped, its first defined source is taken as the
    /// collection of items (a list of objects, or one object), and the element
    /// and attribute paths are resolved inside each item. Otherwise the paths
    /// are resolved against the record; a list of scalars there yields one
    /// entry per value. Items without element text are dropped.
    #[must_use]
    pub fn complex_values(
        &self,
        group: &str,
        element: &str,
        attributes: &[&str],
        record: &SourceRecord,
    ) -> Vec<MappedEntry> {
        let element_key = join(&[group, element]);

        if let Some(group_mapping) = self.get(group) {
            let items: Vec<&Map<String, Value>> = match group_mapping.find(record.as_map()) {
                Some(Value::Array(values)) => values.iter().filter_map(Value::as_object).collect(),
                Some(Value::Object(item)) => vec![item],
                _ => Vec::new(),
            };
            return items
                .into_iter()
                .filter_map(|item| {
                    let text = self.resolve(&element_key, item)?;
                    Some(self.entry(text, &element_key, attributes, item))
                })
                .collect();
        }

        let fields = record.as_map();
        let Some(mapping) = self.get(&element_key) else {
            return Vec::new();
        };
        let texts: Vec<String> = match mapping.find(fields) {
            Some(Value::Array(values)) => values
                .iter()
                .filter(|v| is_truthy(v) && !v.is_object() && !v.is_array())
                .map(value_text)
                .collect(),
            Some(value) => vec![value_text(value)],
            None => mapping.default_text().into_iter().collect(),
        };
        texts
            .into_iter()
            .map(|text| self.entry(text, &element_key, attributes, fields))
            .collect()
    }

    fn entry(
        &self,
        text: String,
        element_key: &str,
        attributes: &[&str],
        fields: &Map<String, Value>,
    ) -> MappedEntry {
        let mut entry = MappedEntry {
            text,
            attributes: IndexMap::new(),
        };
        for attribute in attributes {
            if let Some(value) = self.resolve(&join(&[element_key, attribute]), fields) {
                entry.attributes.insert((*attribute).to_string(), value);
            }
        }
        entry
    }

    fn resolve(&self, key: &str, fields: &Map<String, Value>) -> Option<String> {
        let mapping = self.get(key)?;
        mapping
            .find(fields)
            .map(value_text)
            .or_else(|| mapping.default_text())
    }
}

/// All sections of the schema map for one output format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SchemaMap {
    sections: IndexMap<String, SectionMap>,
}

impl SchemaMap {
    /// Creates an empty schema map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a section.
    #[must_use]
    pub fn with_section(mut self, name: impl Into<String>, section: SectionMap) -> Self {
        self.sections.insert(name.into(), section);
        self
    }

    /// Returns a section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&SectionMap> {
        self.sections.get(name)
    }
}

/// Supplies the schema map of an output format.
pub trait SchemaMapProvider: Send + Sync {
    /// Returns the schema map registered for `format_name`.
    fn schema_map(&self, format_name: &str) -> Option<&SchemaMap>;
}

/// In-memory registry of schema maps keyed by output format name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SchemaMaps {
    maps: IndexMap<String, SchemaMap>,
}

impl SchemaMaps {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a registry from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or does not describe schema maps.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Registers the schema map of a format.
    #[must_use]
    pub fn with_format(mut self, format_name: impl Into<String>, map: SchemaMap) -> Self {
        self.maps.insert(format_name.into(), map);
        self
    }
}

impl SchemaMapProvider for SchemaMaps {
    fn schema_map(&self, format_name: &str) -> Option<&SchemaMap> {
        self.maps.get(format_name)
    }
}

/// Joins target-key segments with dots.
#[must_use]
pub fn join(segments: &[&str]) -> String {
    segments.join(".")
}
