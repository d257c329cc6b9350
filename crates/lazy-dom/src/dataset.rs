//! Dataset key mapping
//!
//! `element.dataset.fooBar` is backed by the `data-foo-bar` attribute.

/// Convert a camelCase dataset key to its attribute name
pub fn to_attribute_name(key: &str) -> String {
    let mut result = String::with_capacity(key.len() + 6);
    result.push_str("data-");

    for c in key.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Convert a `data-*` attribute name to its camelCase dataset key
pub fn to_camel_case(attribute: &str) -> Option<String> {
    let key = attribute.strip_prefix("data-")?;
    let mut result = String::with_capacity(key.len());
    let mut capitalize_next = false;

    for c in key.chars() {
        if c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    Some(result)
}
