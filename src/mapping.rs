//! Per-class mapping configuration and the read-only registry.
//!
//! Mappings drive everything the transformer does to an object: which
//! properties disappear, which are renamed, which identify the object, and
//! which URL templates produce its navigation links. The registry is built
//! once and never mutated afterwards, so it can be shared freely across
//! threads.

use crate::node::SELF_LINK;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping declared for one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    /// Fully qualified class name, as emitted in `@type` markers.
    pub class: String,
    /// Public alias for the class; empty when none is declared.
    #[serde(default)]
    pub alias: String,
    /// Property renames, original name to output name.
    #[serde(default)]
    pub aliased_properties: IndexMap<String, String>,
    /// Properties removed from the output entirely.
    #[serde(default)]
    pub hide_properties: Vec<String>,
    /// Identifier properties, in declaration order.
    #[serde(default)]
    pub id_properties: Vec<String>,
    /// URL templates by link name; `self` is mandatory, the rest are
    /// relations emitted in declaration order.
    #[serde(default)]
    pub urls: IndexMap<String, String>,
    /// Extra link templates merged after the relations.
    #[serde(default)]
    pub additional_urls: IndexMap<String, String>,
}

impl Mapping {
    /// The class name without its namespace prefix.
    pub fn bare_class_name(&self) -> &str {
        self.class
            .rsplit(['\\', ':', '.', '/'])
            .next()
            .unwrap_or(&self.class)
    }

    /// The `self` URL template, when declared.
    pub fn resource_url(&self) -> Option<&str> {
        self.urls.get(SELF_LINK).map(String::as_str)
    }

    /// Relation templates, in declaration order, excluding `self`.
    pub fn relation_urls(&self) -> impl Iterator<Item = (&str, &str)> {
        self.urls
            .iter()
            .filter(|(name, _)| name.as_str() != SELF_LINK)
            .map(|(name, url)| (name.as_str(), url.as_str()))
    }
}

/// Read-only mapping registry, keyed by class name.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    mappings: HashMap<String, Mapping>,
}

impl Mapper {
    pub fn new(mappings: Vec<Mapping>) -> Self {
        Self {
            mappings: mappings
                .into_iter()
                .map(|mapping| (mapping.class.clone(), mapping))
                .collect(),
        }
    }

    /// Builds a registry from a JSON array of mappings.
    pub fn from_json(json: &str) -> Result<Self, MappingError> {
        let mappings: Vec<Mapping> = serde_json::from_str(json)?;
        Self::validated(mappings)
    }

    /// Builds a registry from a YAML list of mappings.
    pub fn from_yaml(yaml: &str) -> Result<Self, MappingError> {
        let mappings: Vec<Mapping> = serde_yaml::from_str(yaml)?;
        Self::validated(mappings)
    }

    fn validated(mappings: Vec<Mapping>) -> Result<Self, MappingError> {
        for mapping in &mappings {
            if mapping.resource_url().is_none() {
                return Err(MappingError::MissingSelfUrl(mapping.class.clone()));
            }
        }
        Ok(Self::new(mappings))
    }

    /// The mapping registered for `class`, if any.
    pub fn mapping(&self, class: &str) -> Option<&Mapping> {
        self.mappings.get(class)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Errors raised while loading a mapping registry.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("invalid mapping JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid mapping YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("mapping for `{0}` declares no `self` URL template")]
    MissingSelfUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_mapping() -> Mapping {
        Mapping {
            class: "Acme\\Domain\\Post".to_string(),
            alias: "Message".to_string(),
            aliased_properties: IndexMap::new(),
            hide_properties: vec![],
            id_properties: vec!["postId".to_string()],
            urls: IndexMap::from([
                (
                    "self".to_string(),
                    "http://example.com/posts/{postId}".to_string(),
                ),
                (
                    "comments".to_string(),
                    "http://example.com/posts/{postId}/comments".to_string(),
                ),
            ]),
            additional_urls: IndexMap::new(),
        }
    }

    #[test]
    fn test_bare_class_name() {
        assert_eq!(post_mapping().bare_class_name(), "Post");

        let mut mapping = post_mapping();
        mapping.class = "acme::domain::Post".to_string();
        assert_eq!(mapping.bare_class_name(), "Post");

        mapping.class = "Post".to_string();
        assert_eq!(mapping.bare_class_name(), "Post");
    }

    #[test]
    fn test_relation_urls_exclude_self() {
        let mapping = post_mapping();
        let relations: Vec<(&str, &str)> = mapping.relation_urls().collect();
        assert_eq!(
            relations,
            [(
                "comments",
                "http://example.com/posts/{postId}/comments"
            )]
        );
        assert_eq!(
            mapping.resource_url(),
            Some("http://example.com/posts/{postId}")
        );
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
- class: "Acme\\Domain\\Post"
  alias: "Message"
  aliased_properties:
    title: headline
  hide_properties: [secret]
  id_properties: [postId]
  urls:
    self: "http://example.com/posts/{postId}"
    comments: "http://example.com/posts/{postId}/comments"
"#;
        let mapper = Mapper::from_yaml(yaml).unwrap();
        assert_eq!(mapper.len(), 1);
        let mapping = mapper.mapping("Acme\\Domain\\Post").unwrap();
        assert_eq!(mapping.alias, "Message");
        assert_eq!(mapping.aliased_properties["title"], "headline");
    }

    #[test]
    fn test_missing_self_url_is_rejected() {
        let json = r#"[{"class": "Post", "urls": {"comments": "http://example.com/comments"}}]"#;
        assert!(matches!(
            Mapper::from_json(json),
            Err(MappingError::MissingSelfUrl(class)) if class == "Post"
        ));
    }
}
