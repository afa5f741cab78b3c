//! Identifier case conversion.
//!
//! URL templates, mapping aliases and class names are frequently authored in
//! different casing conventions. These transforms normalize identifiers so the
//! URL resolver can try every convention deterministically.
//!
//! The segmentation rules are deliberately exact: a separator goes before each
//! uppercase run that does not start the string. Deployed URL templates depend
//! on this segmentation, so it must not be "improved".

/// Converts a camelCase (or PascalCase) identifier to snake_case.
///
/// ```
/// use xml_api_serializer::case::camel_case_to_underscore;
///
/// assert_eq!(camel_case_to_underscore("UserID"), "user_id");
/// assert_eq!(camel_case_to_underscore("postId"), "post_id");
/// ```
pub fn camel_case_to_underscore(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut in_upper_run = false;

    for (index, ch) in input.chars().enumerate() {
        if ch.is_uppercase() {
            // A run starting at position 0 is left alone; the run beginning at
            // its second character still gets a separator.
            if index > 0 && !in_upper_run {
                out.push('_');
                in_upper_run = true;
            }
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            in_upper_run = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        }
    }

    out
}

/// Converts a snake_case (or kebab-case) identifier to PascalCase.
///
/// ```
/// use xml_api_serializer::case::underscore_to_camel_case;
///
/// assert_eq!(underscore_to_camel_case("post_id"), "PostId");
/// ```
pub fn underscore_to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;

    for ch in input.chars() {
        if ch == '_' || ch == '-' {
            at_word_start = true;
            continue;
        }
        if at_word_start {
            for upper in ch.to_uppercase() {
                out.push(upper);
            }
            at_word_start = false;
        } else {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        }
    }

    out
}

/// Normalizes any supported convention to PascalCase.
pub fn to_camel_case(input: &str) -> String {
    underscore_to_camel_case(&camel_case_to_underscore(input))
}

/// Normalizes any supported convention to lowerCamelCase.
pub fn to_lower_first_camel_case(input: &str) -> String {
    let pascal = to_camel_case(input);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => pascal,
    }
}
