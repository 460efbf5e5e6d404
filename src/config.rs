//! Configuration for DataCite conversion.
//!
//! Site-wide settings the host platform would otherwise read from its own
//! configuration (default locale, site URL) are passed in explicitly through
//! [`ConverterConfig`], so a conversion depends only on the record, the
//! configuration, and the schema map.

use std::fmt;

use serde::Deserialize;

use crate::error::{ConvertError, Result};
use crate::merge::MergePolicy;

/// DataCite kernel-3 namespace URI.
pub const DATACITE_31_NAMESPACE: &str = "http://datacite.org/schema/kernel-3";

/// DataCite kernel-3 XSD location.
pub const DATACITE_31_XSD: &str = "http://schema.datacite.org/meta/kernel-3/metadata.xsd";

/// Layout of the produced XML text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XmlStyle {
    /// No whitespace between elements
    #[default]
    Compact,
    /// One element per line, two-space indent
    Pretty,
}

impl fmt::Display for XmlStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Pretty => write!(f, "pretty"),
        }
    }
}

/// Description of the target metadata format.
///
/// The format name selects the schema map; namespace and XSD location feed
/// the `resource` header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputFormat {
    /// Format name used to look up schema maps (e.g. `datacite`)
    pub name: String,
    /// Schema version
    pub version: String,
    /// Target namespace URI
    pub namespace: Option<String>,
    /// XSD location
    pub xsd_url: Option<String>,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::datacite_31()
    }
}

impl OutputFormat {
    /// DataCite metadata kernel 3.1.
    #[must_use]
    pub fn datacite_31() -> Self {
        OutputFormat {
            name: "datacite".to_string(),
            version: "3.1".to_string(),
            namespace: Some(DATACITE_31_NAMESPACE.to_string()),
            xsd_url: Some(DATACITE_31_XSD.to_string()),
        }
    }

    /// Returns the namespace URI.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingNamespace`] if none is configured.
    pub fn namespace(&self) -> Result<&str> {
        self.namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| ConvertError::MissingNamespace(self.name.clone()))
    }

    /// Returns the XSD location.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::MissingSchemaLocation`] if none is configured.
    pub fn xsd_url(&self) -> Result<&str> {
        self.xsd_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConvertError::MissingSchemaLocation(self.name.clone()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Settings shared by the dataset and resource converters.
///
/// # Examples
///
/// ```ignore
/// use datacite_convert::{ConverterConfig, XmlStyle};
///
/// let config = ConverterConfig::new()
///     .with_site_url("https://data.example.org")
///     .with_default_locale("de")
///     .with_xml_style(XmlStyle::Pretty);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Base URL of the site, prefixed to landing-page paths.
    pub site_url: String,

    /// Locale emitted as the dataset `language`.
    pub default_locale: String,

    /// Target format.
    pub output_format: OutputFormat,

    /// How resource documents are layered over dataset documents.
    pub merge_policy: MergePolicy,

    /// Output layout.
    pub xml_style: XmlStyle,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            default_locale: "en".to_string(),
            output_format: OutputFormat::default(),
            merge_policy: MergePolicy::default(),
            xml_style: XmlStyle::default(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the site base URL.
    #[must_use]
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    /// Sets the default locale.
    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Sets the merge policy.
    #[must_use]
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// Sets the output layout.
    #[must_use]
    pub const fn with_xml_style(mut self, style: XmlStyle) -> Self {
        self.xml_style = style;
        self
    }
}

/// Builds the landing-page path of a dataset from its name.
pub trait UrlBuilder: Send + Sync {
    /// Returns the site-relative path of the dataset page.
    fn dataset_url(&self, name: &str) -> String;
}

/// Routes datasets to `/dataset/{name}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetPathUrlBuilder;

impl UrlBuilder for DatasetPathUrlBuilder {
    fn dataset_url(&self, name: &str) -> String {
        format!("/dataset/{name}")
    }
}
