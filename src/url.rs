//! URL template resolution.
//!
//! Templates carry `{placeholder}` tokens. Declared id property names, type
//! aliases and raw class names may each follow a different casing convention
//! than the template author used, so resolution is a fixed cascade that tries
//! every convention and stops at the first stage that changes the template.

use crate::case;
use crate::mapping::Mapping;

/// Errors raised during template resolution.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("id property/value mismatch: {properties} properties, {values} values")]
    IdCountMismatch { properties: usize, values: usize },
}

/// Resolves `template` to a concrete URL.
///
/// `id_properties` and `id_values` correspond index-for-index. The cascade:
///
/// 1. declared id property names, substituted pairwise;
/// 2. the alias, in PascalCase / lowerCamelCase / snake_case order;
/// 3. the bare class name, same three variants.
///
/// When no stage changes the template it is returned unchanged; the caller
/// decides whether an unresolved template still counts as a link.
pub fn resolve(
    id_properties: &[String],
    id_values: &[String],
    template: &str,
    mapping: &Mapping,
) -> Result<String, ResolveError> {
    if id_properties.len() != id_values.len() {
        return Err(ResolveError::IdCountMismatch {
            properties: id_properties.len(),
            values: id_values.len(),
        });
    }

    let mut url = template.to_string();
    for (name, value) in id_properties.iter().zip(id_values) {
        url = url.replace(&placeholder(name), value);
    }
    if url != template {
        return Ok(url);
    }

    // Stages 2 and 3 substitute a single candidate name with the first id
    // value; templates with one placeholder are the common case here.
    let first_value = id_values.first().map(String::as_str).unwrap_or("");

    if !mapping.alias.is_empty() {
        let url = substitute_variants(&mapping.alias, first_value, template);
        if url != template {
            return Ok(url);
        }
    }

    let url = substitute_variants(mapping.bare_class_name(), first_value, template);
    if url != template {
        return Ok(url);
    }

    Ok(template.to_string())
}

/// Tries the three casing variants of `name` in fixed order, returning the
/// first substitution that changes the template.
fn substitute_variants(name: &str, value: &str, template: &str) -> String {
    let variants = [
        case::to_camel_case(name),
        case::to_lower_first_camel_case(name),
        case::camel_case_to_underscore(name),
    ];

    for variant in variants {
        let url = template.replace(&placeholder(&variant), value);
        if url != template {
            return url;
        }
    }

    template.to_string()
}

fn placeholder(name: &str) -> String {
    format!("{{{name}}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn mapping(alias: &str) -> Mapping {
        Mapping {
            class: "Acme\\Domain\\Post".to_string(),
            alias: alias.to_string(),
            aliased_properties: IndexMap::new(),
            hide_properties: vec![],
            id_properties: vec!["postId".to_string()],
            urls: IndexMap::new(),
            additional_urls: IndexMap::new(),
        }
    }

    fn ids() -> (Vec<String>, Vec<String>) {
        (vec!["postId".to_string()], vec!["9".to_string()])
    }

    #[test]
    fn test_declared_property_wins() {
        let (props, values) = ids();
        let url = resolve(
            &props,
            &values,
            "http://example.com/posts/{postId}",
            &mapping("Message"),
        )
        .unwrap();
        assert_eq!(url, "http://example.com/posts/9");
    }

    #[test]
    fn test_multiple_declared_properties() {
        let props = vec!["postId".to_string(), "userId".to_string()];
        let values = vec!["9".to_string(), "1".to_string()];
        let url = resolve(
            &props,
            &values,
            "http://example.com/users/{userId}/posts/{postId}",
            &mapping(""),
        )
        .unwrap();
        assert_eq!(url, "http://example.com/users/1/posts/9");
    }

    #[test]
    fn test_alias_casing_variants() {
        let (props, values) = ids();
        let m = mapping("Message");
        for template in [
            "http://example.com/m/{Message}",
            "http://example.com/m/{message}",
        ] {
            let url = resolve(&props, &values, template, &m).unwrap();
            assert_eq!(url, "http://example.com/m/9");
        }

        let m = mapping("UserComment");
        let url = resolve(&props, &values, "http://example.com/m/{user_comment}", &m).unwrap();
        assert_eq!(url, "http://example.com/m/9");
    }

    #[test]
    fn test_bare_class_name_fallback() {
        let (props, values) = ids();
        let url = resolve(
            &props,
            &values,
            "http://example.com/p/{post}",
            &mapping(""),
        )
        .unwrap();
        assert_eq!(url, "http://example.com/p/9");
    }

    #[test]
    fn test_unresolved_template_returned_unchanged() {
        let (props, values) = ids();
        let template = "http://example.com/archive/{year}";
        let url = resolve(&props, &values, template, &mapping("Message")).unwrap();
        assert_eq!(url, template);
    }

    #[test]
    fn test_id_count_mismatch_is_fatal() {
        let err = resolve(
            &["postId".to_string()],
            &[],
            "http://example.com/posts/{postId}",
            &mapping(""),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ResolveError::IdCountMismatch {
                properties: 1,
                values: 0
            }
        );
    }
}
