//! Error types for metadata conversion.
//!
//! This module provides the [`ConvertError`] type for all conversion operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all conversion operations.
///
/// The dataset converter returns these directly to its caller. The resource
/// converter never propagates them; it reports them as the reason a resource
/// was skipped.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The output format has no namespace URI configured.
    #[error("Output format '{0}' has no namespace")]
    MissingNamespace(String),

    /// The output format has no XSD location configured.
    #[error("Output format '{0}' has no schema location")]
    MissingSchemaLocation(String),

    /// No schema map is registered for the output format.
    #[error("No schema map for output format '{0}'")]
    MissingSchemaMap(String),

    /// The schema map exists but lacks a required section.
    #[error("Schema map for '{format}' has no section '{section}'")]
    MissingSchemaSection {
        /// Output format name
        format: String,
        /// Section that was looked up
        section: String,
    },

    /// A source field the mapping needs to read is absent.
    #[error("Missing source field: {0}")]
    MissingField(String),

    /// No controlled vocabulary exists for the attribute.
    #[error("No controlled vocabulary for attribute '{0}'")]
    UnknownVocabulary(String),

    /// The source record is not a JSON object.
    #[error("Source record is not an object")]
    NotAnObject,

    /// Structurally unusable XML input.
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// Error from the XML reader or writer.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Error decoding JSON input.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;
