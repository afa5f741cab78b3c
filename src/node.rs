//! Generic tree produced by the upstream deep-copy serializer.
//!
//! The serializer flattens an object graph into scalars, lists and ordered
//! maps, tagging maps with marker keys (`@type`, `@map`, `@value`) that the
//! transformer consumes and strips before rendering. Lists are an explicit
//! variant: list-ness is carried structurally from the serializer boundary
//! inward, never inferred from numeric key shapes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Marker naming the originating class of a map node. Consumed by link
/// building, stripped before rendering.
pub const CLASS_IDENTIFIER_KEY: &str = "@type";

/// Marker flagging the root value as a list of typed objects.
pub const MAP_TYPE_KEY: &str = "@map";

/// Scalar wrapper key; also holds the element list under a `@map` root.
pub const SCALAR_VALUE_KEY: &str = "@value";

/// Key under which a meta payload is injected.
pub const META_KEY: &str = "meta";

/// Key under which computed links are attached.
pub const LINKS_KEY: &str = "links";

/// Attribute key inside a link descriptor.
pub const LINKS_HREF: &str = "href";

/// Name of the mandatory self link.
pub const SELF_LINK: &str = "self";

/// A leaf value in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Whether the value counts as empty for link filtering and id lookup.
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Bool(b) => !b,
            Scalar::Int(i) => *i == 0,
            Scalar::Float(f) => *f == 0.0,
            Scalar::String(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(n) => write!(f, "{n}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// A node of the generic tree: a scalar, an ordered list, or an
/// insertion-ordered map. Map order determines output element order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Scalar(Scalar),
    List(Vec<Node>),
    Map(IndexMap<String, Node>),
}

impl Node {
    /// Null scalar shorthand.
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    pub fn int(value: i64) -> Self {
        Node::Scalar(Scalar::Int(value))
    }

    pub fn bool(value: bool) -> Self {
        Node::Scalar(Scalar::Bool(value))
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Map entry lookup; `None` for non-map nodes.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// The class named by the `@type` marker, when present.
    pub fn class_identifier(&self) -> Option<&str> {
        self.get(CLASS_IDENTIFIER_KEY).and_then(Node::as_str)
    }

    /// Whether the node counts as empty (mirrors the filtering the link
    /// builder applies before emitting descriptors).
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Scalar(scalar) => scalar.is_empty(),
            Node::List(items) => items.is_empty(),
            Node::Map(map) => map.is_empty(),
        }
    }
}

impl From<JsonValue> for Node {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Node::Scalar(Scalar::Null),
            JsonValue::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Node::Scalar(Scalar::Int(i)),
                None => Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            JsonValue::String(s) => Node::Scalar(Scalar::String(s)),
            JsonValue::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
            JsonValue::Object(entries) => Node::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_preserves_map_order() {
        let node = Node::from(json!({"zulu": 1, "alpha": 2, "mike": 3}));
        let keys: Vec<&String> = node.as_map().unwrap().keys().collect();
        assert_eq!(keys, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_from_json_distinguishes_lists() {
        let node = Node::from(json!({"items": [1, 2]}));
        assert!(matches!(node.get("items"), Some(Node::List(_))));
    }

    #[test]
    fn test_class_identifier() {
        let node = Node::from(json!({"@type": "Post", "postId": 9}));
        assert_eq!(node.class_identifier(), Some("Post"));
        assert_eq!(Node::int(1).class_identifier(), None);
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Int(9).to_string(), "9");
        assert_eq!(Scalar::Float(1.5).to_string(), "1.5");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Null.to_string(), "");
        assert_eq!(Scalar::String("a".into()), Scalar::String("a".into()));
    }

    #[test]
    fn test_emptiness() {
        assert!(Node::null().is_empty());
        assert!(Node::string("").is_empty());
        assert!(Node::bool(false).is_empty());
        assert!(!Node::int(9).is_empty());
        assert!(Node::List(vec![]).is_empty());
    }

    #[test]
    fn test_deserializes_from_yaml() {
        let yaml = "\
\"@type\": Post
postId: 9
published: true
tags:
  - a
  - b
";
        let node: Node = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(node.class_identifier(), Some("Post"));
        assert_eq!(node.get("postId"), Some(&Node::int(9)));
        assert_eq!(node.get("published"), Some(&Node::bool(true)));
        assert!(matches!(node.get("tags"), Some(Node::List(items)) if items.len() == 2));
        let keys: Vec<&String> = node.as_map().unwrap().keys().collect();
        assert_eq!(keys, ["@type", "postId", "published", "tags"]);
    }

    #[test]
    fn test_serde_round_trip() {
        let node = Node::from(json!({"a": [1, true, null], "b": {"c": "x"}}));
        let text = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&text).unwrap();
        assert_eq!(back, node);
    }
}
