//! Tree rewriting: property hiding/renaming, meta injection, link building,
//! marker stripping and wrapper flattening.
//!
//! The transformer receives the generic tree the deep-copy serializer
//! produced, rewrites it according to the mapping registry, and hands the
//! result to the presenter. All state lives in the call: the registry is
//! read-only and the meta payload is set up front, so `serialize` is a pure
//! function of its input.

use crate::mapping::Mapper;
use crate::node::{
    Node, Scalar, CLASS_IDENTIFIER_KEY, LINKS_HREF, LINKS_KEY, MAP_TYPE_KEY, META_KEY,
    SCALAR_VALUE_KEY, SELF_LINK,
};
use crate::presenter::{RenderError, XmlPresenter};
use crate::url::{self, ResolveError};
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Errors raised while transforming or rendering a tree.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("malformed input tree: {0}")]
    MalformedTree(&'static str),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Rewrites serializer trees and renders them as hypermedia XML.
#[derive(Debug, Clone)]
pub struct XmlTransformer {
    mapper: Mapper,
    meta: Option<Node>,
}

impl XmlTransformer {
    pub fn new(mapper: Mapper) -> Self {
        Self { mapper, meta: None }
    }

    /// Attaches a sideband payload injected under `meta` on every
    /// top-level object.
    pub fn with_meta(mut self, meta: Node) -> Self {
        self.set_meta(meta);
        self
    }

    pub fn set_meta(&mut self, meta: Node) {
        self.meta = Some(meta);
    }

    /// Transforms `value` and renders it as an XML document.
    pub fn serialize(&self, value: &Node) -> Result<String, TransformError> {
        let tree = self.transform(value)?;
        Ok(XmlPresenter::new().render(&tree)?)
    }

    /// Transforms `value` without rendering. Exposed so callers can inspect
    /// the annotated tree; `serialize` is the usual entry point.
    pub fn transform(&self, value: &Node) -> Result<Node, TransformError> {
        if let Node::Map(map) = value {
            let is_object_list = map.get(MAP_TYPE_KEY).is_some_and(|marker| !marker.is_empty());
            if is_object_list {
                let Some(Node::List(items)) = map.get(SCALAR_VALUE_KEY) else {
                    return Err(TransformError::MalformedTree(
                        "`@map` marker without a `@value` list",
                    ));
                };
                debug!(objects = items.len(), "transforming object list");
                let mut transformed = Vec::with_capacity(items.len());
                for item in items {
                    transformed.push(self.serialize_object(item)?);
                }
                return Ok(Node::List(transformed));
            }
        }

        self.serialize_object(value)
    }

    fn serialize_object(&self, value: &Node) -> Result<Node, TransformError> {
        if matches!(value, Node::Scalar(_)) {
            return Err(TransformError::MalformedTree(
                "expected an object or a list at the root",
            ));
        }

        let mut object = value.clone();
        self.rewrite_properties(&mut object)?;
        self.inject_meta(&mut object);
        self.attach_links(&mut object)?;
        format_scalar_values(&mut object);
        strip_key(&mut object, CLASS_IDENTIFIER_KEY);
        flatten_single_scalars(&mut object);

        Ok(object)
    }

    /// One bottom-up pass deleting hidden properties and renaming aliased
    /// ones on every map whose `@type` has a registered mapping.
    fn rewrite_properties(&self, node: &mut Node) -> Result<(), TransformError> {
        match node {
            Node::List(items) => {
                for item in items {
                    self.rewrite_properties(item)?;
                }
            }
            Node::Map(map) => {
                for (_, value) in map.iter_mut() {
                    self.rewrite_properties(value)?;
                }

                let class = match map.get(CLASS_IDENTIFIER_KEY) {
                    Some(Node::Scalar(Scalar::String(class))) => class.clone(),
                    Some(_) => {
                        return Err(TransformError::MalformedTree(
                            "class identifier marker is not a string",
                        ));
                    }
                    None => return Ok(()),
                };

                if let Some(mapping) = self.mapper.mapping(&class) {
                    if !mapping.hide_properties.is_empty() {
                        map.retain(|key, _| !mapping.hide_properties.contains(key));
                    }
                    if !mapping.aliased_properties.is_empty() {
                        rename_keys(map, &mapping.aliased_properties);
                    }
                }
            }
            Node::Scalar(_) => {}
        }

        Ok(())
    }

    fn inject_meta(&self, object: &mut Node) {
        let Some(meta) = &self.meta else { return };
        if meta.is_empty() {
            return;
        }
        if let Node::Map(map) = object {
            map.insert(META_KEY.to_string(), meta.clone());
        }
    }

    /// Builds the link block for the top-level object: self first, then the
    /// relation templates in mapping order, then any extra templates.
    fn attach_links(&self, object: &mut Node) -> Result<(), TransformError> {
        let Node::Map(map) = object else {
            return Ok(());
        };
        let Some(class) = map
            .get(CLASS_IDENTIFIER_KEY)
            .and_then(Node::as_str)
            .map(String::from)
        else {
            return Ok(());
        };
        let Some(mapping) = self.mapper.mapping(&class) else {
            trace!(class, "no mapping registered, skipping links");
            return Ok(());
        };

        let (id_properties, id_values) = id_properties_and_values(map, mapping);

        let mut links: IndexMap<String, String> = IndexMap::new();

        if let Some(template) = mapping.resource_url() {
            let href = url::resolve(&id_properties, &id_values, template, mapping)?;
            if href != template {
                links.insert(SELF_LINK.to_string(), href);
            }
        }

        let extra_urls = mapping
            .additional_urls
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()));
        for (name, template) in mapping.relation_urls().chain(extra_urls) {
            let href = url::resolve(&id_properties, &id_values, template, mapping)?;
            if href != template && !href.is_empty() {
                links.insert(name.to_string(), href);
            }
        }

        if !links.is_empty() {
            trace!(class, links = links.len(), "attaching link block");
            let descriptors: IndexMap<String, Node> = links
                .into_iter()
                .map(|(name, href)| {
                    let mut descriptor = IndexMap::new();
                    descriptor.insert(LINKS_HREF.to_string(), Node::string(href));
                    (name, Node::Map(descriptor))
                })
                .collect();
            map.insert(LINKS_KEY.to_string(), Node::Map(descriptors));
        }

        Ok(())
    }
}

/// Reads the declared id properties off the object, skipping absent or empty
/// values. Properties and values stay index-aligned.
fn id_properties_and_values(
    map: &IndexMap<String, Node>,
    mapping: &crate::mapping::Mapping,
) -> (Vec<String>, Vec<String>) {
    let mut properties = Vec::new();
    let mut values = Vec::new();

    for name in &mapping.id_properties {
        if let Some(value) = map.get(name) {
            if !value.is_empty() {
                properties.push(name.clone());
                values.push(id_value(value));
            }
        }
    }

    (properties, values)
}

/// Extracts the scalar identity out of a possibly wrapped value object:
/// scalar wrappers unwrap via `@value`, value objects yield their first
/// non-marker entry.
fn id_value(node: &Node) -> String {
    match node {
        Node::Scalar(scalar) => scalar.to_string(),
        Node::Map(map) => {
            if let Some(inner) = map.get(SCALAR_VALUE_KEY) {
                return id_value(inner);
            }
            map.iter()
                .find(|(key, _)| key.as_str() != CLASS_IDENTIFIER_KEY)
                .map(|(_, value)| id_value(value))
                .unwrap_or_default()
        }
        Node::List(items) => items.first().map(id_value).unwrap_or_default(),
    }
}

/// Renames keys in place, preserving entry order.
fn rename_keys(map: &mut IndexMap<String, Node>, renames: &IndexMap<String, String>) {
    let renamed: IndexMap<String, Node> = map
        .drain(..)
        .map(|(key, value)| match renames.get(&key) {
            Some(new_key) => (new_key.clone(), value),
            None => (key, value),
        })
        .collect();
    *map = renamed;
}

/// Unwraps `@value` scalar wrappers everywhere in the subtree.
fn format_scalar_values(node: &mut Node) {
    while let Node::Map(map) = &mut *node {
        match map.shift_remove(SCALAR_VALUE_KEY) {
            Some(inner) => *node = inner,
            None => break,
        }
    }

    match node {
        Node::Map(map) => {
            for (_, value) in map.iter_mut() {
                format_scalar_values(value);
            }
        }
        Node::List(items) => {
            for item in items {
                format_scalar_values(item);
            }
        }
        Node::Scalar(_) => {}
    }
}

/// Removes `key` from every map in the subtree.
fn strip_key(node: &mut Node, key: &str) {
    match node {
        Node::Map(map) => {
            map.shift_remove(key);
            for (_, value) in map.iter_mut() {
                strip_key(value, key);
            }
        }
        Node::List(items) => {
            for item in items {
                strip_key(item, key);
            }
        }
        Node::Scalar(_) => {}
    }
}

/// Collapses maps holding exactly one scalar entry into that scalar,
/// bottom-up so nested wrappers reduce fully. Link descriptors are exempt:
/// a lone `href` is structural, not a value object.
fn flatten_single_scalars(node: &mut Node) {
    match node {
        Node::Map(map) => {
            for (_, value) in map.iter_mut() {
                flatten_single_scalars(value);
            }
            let single_scalar = map.len() == 1
                && matches!(map.get_index(0), Some((key, Node::Scalar(_))) if key != LINKS_HREF);
            if single_scalar {
                if let Some((_, value)) = map.shift_remove_index(0) {
                    *node = value;
                }
            }
        }
        Node::List(items) => {
            for item in items {
                flatten_single_scalars(item);
            }
        }
        Node::Scalar(_) => {}
    }
}
