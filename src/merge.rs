//! Layering a resource document over its parent dataset document.
//!
//! Some DataCite elements belong to exactly one artifact (a DOI, a byte size,
//! a format, a version) and are replaced wholesale by the resource. Others are
//! dataset-level facts (titles, creators, subjects, descriptions) to which a
//! resource may add entries.
//!
//! Which element gets which treatment is a [`MergePolicy`] table. Elements
//! missing from the table fall back to their shape: text leaves are replaced,
//! lists are merged.
//!
//! Merging a list appends each child entry to the parent's entries of the
//! same name unless an equal entry (same text, same attributes, same nested
//! children) is already there. Parent entries keep their order and come
//! first.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::config::XmlStyle;
use crate::document::{Document, ElementList, Node};
use crate::error::Result;
use crate::xml::{document_to_xml, xml_to_document};

/// How a top-level element of the child document is applied to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeRule {
    /// The child's element replaces the parent's
    Replace,
    /// The child's list entries are appended to the parent's, skipping equal entries
    MergeAppendDedup,
}

/// Per-element merge rules.
///
/// When loaded from configuration, the configured rules are laid over the
/// default table; start from [`MergePolicy::by_shape`] in code for an empty
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    /// Rules keyed by top-level element name
    #[serde(deserialize_with = "over_default_rules")]
    pub rules: IndexMap<String, MergeRule>,
}

fn over_default_rules<'de, D>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, MergeRule>, D::Error>
where
    D: Deserializer<'de>,
{
    let configured = IndexMap::<String, MergeRule>::deserialize(deserializer)?;
    let mut rules = MergePolicy::default().rules;
    rules.extend(configured);
    Ok(rules)
}

/// Elements that identify a single artifact.
pub const RESOURCE_SPECIFIC: [&str; 4] = ["identifier", "sizes", "version", "formats"];

/// Elements a resource adds to rather than replaces.
pub const DATASET_LEVEL: [&str; 7] = [
    "titles",
    "creators",
    "subjects",
    "contributors",
    "descriptions",
    "rightsList",
    "alternateIdentifiers",
];

impl Default for MergePolicy {
    fn default() -> Self {
        let mut rules = IndexMap::new();
        for name in RESOURCE_SPECIFIC {
            rules.insert(name.to_string(), MergeRule::Replace);
        }
        for name in DATASET_LEVEL {
            rules.insert(name.to_string(), MergeRule::MergeAppendDedup);
        }
        MergePolicy { rules }
    }
}

impl MergePolicy {
    /// A policy with no rules; every element is handled by its shape.
    #[must_use]
    pub fn by_shape() -> Self {
        MergePolicy {
            rules: IndexMap::new(),
        }
    }

    /// Sets the rule for an element.
    #[must_use]
    pub fn with_rule(mut self, element: impl Into<String>, rule: MergeRule) -> Self {
        self.rules.insert(element.into(), rule);
        self
    }

    /// Returns the configured rule for an element, if any.
    #[must_use]
    pub fn rule_for(&self, element: &str) -> Option<MergeRule> {
        self.rules.get(element).copied()
    }

    fn effective_rule(&self, element: &str, node: &Node) -> MergeRule {
        match (self.rule_for(element), node) {
            (_, Node::Text(_)) | (Some(MergeRule::Replace), _) => MergeRule::Replace,
            (Some(MergeRule::MergeAppendDedup) | None, Node::List(_)) => {
                MergeRule::MergeAppendDedup
            },
        }
    }
}

/// Merge `child` over `parent`.
///
/// The result keeps the parent's header and element order; elements present
/// only in the child are appended at the end.
#[must_use]
pub fn merge_documents(child: &Document, parent: &Document, policy: &MergePolicy) -> Document {
    let mut merged = parent.clone();

    for (name, child_node) in &child.elements {
        if policy.effective_rule(name, child_node) == MergeRule::MergeAppendDedup {
            if let (Some(Node::List(parent_list)), Node::List(child_list)) =
                (merged.elements.get_mut(name), child_node)
            {
                debug!(element = %name, "merging");
                merge_lists(parent_list, child_list);
                continue;
            }
        }
        debug!(element = %name, "replacing");
        merged.elements.insert(name.clone(), child_node.clone());
    }

    merged
}

/// Append each child entry to the parent list unless already present.
pub fn merge_lists(parent: &mut ElementList, child: &ElementList) {
    for (name, items) in &child.children {
        let target = parent.children.entry(name.clone()).or_default();
        for item in items {
            if !target.contains(item) {
                target.push(item.clone());
            }
        }
    }
}

/// Merge two serialized documents.
///
/// Both texts are parsed back into document trees, merged with
/// [`merge_documents`], and written out again.
///
/// # Errors
///
/// Returns an error if either text is not a well-formed DataCite document.
pub fn merge_xml(
    child_xml: &str,
    parent_xml: &str,
    policy: &MergePolicy,
    style: XmlStyle,
) -> Result<String> {
    let child = xml_to_document(child_xml)?;
    let parent = xml_to_document(parent_xml)?;
    document_to_xml(&merge_documents(&child, &parent, policy), style)
}
