//! Custom Elements
//!
//! Custom element registry.

use std::collections::HashMap;

/// Custom elements registry
#[derive(Debug, Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<String, CustomElementDefinition>,
}

/// Custom element definition
#[derive(Debug, Clone)]
pub struct CustomElementDefinition {
    pub name: String,
    pub observed_attributes: Vec<String>,
}

/// Custom element options
#[derive(Debug, Clone, Default)]
pub struct CustomElementOptions {
    pub observed_attributes: Vec<String>,
}

/// Custom element errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomElementError {
    #[error("Invalid custom element name: {0}")]
    InvalidName(String),

    #[error("Custom element already defined: {0}")]
    AlreadyDefined(String),
}

const RESERVED_NAMES: [&str; 8] = [
    "annotation-xml", "color-profile", "font-face",
    "font-face-src", "font-face-uri", "font-face-format",
    "font-face-name", "missing-glyph",
];

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a custom element
    pub fn define(
        &mut self,
        name: &str,
        options: CustomElementOptions,
    ) -> Result<(), CustomElementError> {
        if !Self::is_valid_name(name) {
            return Err(CustomElementError::InvalidName(name.to_string()));
        }

        if self.definitions.contains_key(name) {
            return Err(CustomElementError::AlreadyDefined(name.to_string()));
        }

        self.definitions.insert(
            name.to_string(),
            CustomElementDefinition {
                name: name.to_string(),
                observed_attributes: options.observed_attributes,
            },
        );

        Ok(())
    }

    /// Get element definition
    pub fn get(&self, name: &str) -> Option<&CustomElementDefinition> {
        self.definitions.get(name)
    }

    /// Check if element is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Validate custom element name
    pub fn is_valid_name(name: &str) -> bool {
        if !name.contains('-') {
            return false;
        }

        if !name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
            return false;
        }

        if name.chars().any(|c| c.is_ascii_uppercase()) {
            return false;
        }

        !RESERVED_NAMES.contains(&name)
    }
}
