//! Controlled vocabularies for DataCite attributes.
//!
//! Several DataCite attributes only accept an enumerated set of values
//! (`titleType`, `descriptionType`, `resourceTypeGeneral`, ...). Source
//! records carry free-form text, so raw values are translated through a
//! [`Vocabulary`]. Values that cannot be translated become the literal
//! [`FALLBACK_TERM`] instead of failing the conversion.

use indexmap::IndexMap;

use crate::error::{ConvertError, Result};

/// Term used when a raw value has no counterpart in the vocabulary.
pub const FALLBACK_TERM: &str = "other";

/// Translates raw values into controlled terms.
pub trait Vocabulary: Send + Sync {
    /// Returns the controlled term for `raw`, or `None` if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::UnknownVocabulary`] if there is no table for
    /// `attribute` at all.
    fn lookup(&self, attribute: &str, raw: &str) -> Result<Option<String>>;
}

/// Translate `raw`, falling back to [`FALLBACK_TERM`].
///
/// # Errors
///
/// Propagates a missing vocabulary table from [`Vocabulary::lookup`].
pub fn to_controlled(vocabulary: &dyn Vocabulary, attribute: &str, raw: &str) -> Result<String> {
    Ok(vocabulary
        .lookup(attribute, raw)?
        .unwrap_or_else(|| FALLBACK_TERM.to_string()))
}

const TITLE_TYPES: &[&str] = &["AlternativeTitle", "Subtitle", "TranslatedTitle"];

const DESCRIPTION_TYPES: &[&str] = &[
    "Abstract",
    "Methods",
    "SeriesInformation",
    "TableOfContents",
    "Other",
];

const RESOURCE_TYPES_GENERAL: &[&str] = &[
    "Audiovisual",
    "Collection",
    "Dataset",
    "Event",
    "Image",
    "InteractiveResource",
    "Model",
    "PhysicalObject",
    "Service",
    "Software",
    "Sound",
    "Text",
    "Workflow",
    "Other",
];

const DATE_TYPES: &[&str] = &[
    "Accepted",
    "Available",
    "Copyrighted",
    "Collected",
    "Created",
    "Issued",
    "Submitted",
    "Updated",
    "Valid",
];

const CONTRIBUTOR_TYPES: &[&str] = &[
    "ContactPerson",
    "DataCollector",
    "DataCurator",
    "DataManager",
    "Distributor",
    "Editor",
    "Funder",
    "HostingInstitution",
    "Producer",
    "ProjectLeader",
    "ProjectManager",
    "ProjectMember",
    "RegistrationAgency",
    "RegistrationAuthority",
    "RelatedPerson",
    "Researcher",
    "ResearchGroup",
    "RightsHolder",
    "Sponsor",
    "Supervisor",
    "WorkPackageLeader",
    "Other",
];

/// Table-driven vocabulary.
///
/// Matching ignores case and any character that is not a letter or digit, so
/// `alternative_title`, `Alternative Title` and `AlternativeTitle` all map to
/// `AlternativeTitle`. Explicit aliases are checked first.
#[derive(Debug, Clone, Default)]
pub struct ControlledVocabulary {
    tables: IndexMap<String, IndexMap<String, String>>,
}

impl ControlledVocabulary {
    /// Creates a vocabulary without any tables.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The DataCite 3.1 attribute tables.
    #[must_use]
    pub fn datacite_31() -> Self {
        ControlledVocabulary::empty()
            .with_terms("titleType", TITLE_TYPES)
            .with_terms("descriptionType", DESCRIPTION_TYPES)
            .with_terms("resourceTypeGeneral", RESOURCE_TYPES_GENERAL)
            .with_terms("dateType", DATE_TYPES)
            .with_terms("contributorType", CONTRIBUTOR_TYPES)
    }

    /// Adds the allowed terms of an attribute.
    #[must_use]
    pub fn with_terms(mut self, attribute: &str, terms: &[&str]) -> Self {
        let table = self.tables.entry(attribute.to_string()).or_default();
        for term in terms {
            table.insert(normalize(term), (*term).to_string());
        }
        self
    }

    /// Maps an additional raw spelling onto a term.
    #[must_use]
    pub fn with_alias(mut self, attribute: &str, raw: &str, term: &str) -> Self {
        self.tables
            .entry(attribute.to_string())
            .or_default()
            .insert(normalize(raw), term.to_string());
        self
    }

    /// Returns the names of the attributes with a table.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl Vocabulary for ControlledVocabulary {
    fn lookup(&self, attribute: &str, raw: &str) -> Result<Option<String>> {
        let table = self
            .tables
            .get(attribute)
            .ok_or_else(|| ConvertError::UnknownVocabulary(attribute.to_string()))?;
        Ok(table.get(&normalize(raw)).cloned())
    }
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
