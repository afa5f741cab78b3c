//! Hypermedia XML serializer.
//!
//! Renders object trees (already flattened into a generic tree by a
//! deep-copy serializer) as formatted XML documents, augmented with `self`
//! and relation navigation links built from per-type URL templates:
//!
//! - property renaming and hiding driven by a mapping registry
//! - link computation with a three-stage placeholder resolution cascade
//! - value-object flattening (single-scalar wrappers collapse to the scalar)
//! - CDATA-wrapped scalar text with HTML entities decoded
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use xml_api_serializer::{Mapper, Node, XmlTransformer};
//!
//! let mapper = Mapper::from_yaml(r#"
//! - class: "Post"
//!   id_properties: [postId]
//!   urls:
//!     self: "http://example.com/posts/{postId}"
//! "#).unwrap();
//!
//! let tree = Node::from(json!({
//!     "@type": "Post",
//!     "postId": 9,
//!     "title": "Hello World",
//! }));
//!
//! let xml = XmlTransformer::new(mapper).serialize(&tree).unwrap();
//! assert!(xml.contains(r#"<link rel="self" href="http://example.com/posts/9"/>"#));
//! ```

pub mod case;
pub mod mapping;
pub mod node;
pub mod presenter;
pub mod response;
pub mod transformer;
pub mod url;

pub use mapping::{Mapper, Mapping, MappingError};
pub use node::{Node, Scalar};
pub use presenter::{RenderError, XmlPresenter};
pub use response::XmlResponse;
pub use transformer::{TransformError, XmlTransformer};
pub use url::ResolveError;
