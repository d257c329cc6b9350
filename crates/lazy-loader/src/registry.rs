//! Element registration
//!
//! The host application calls [`define`] once at startup; calling it again
//! is harmless.

use lazy_dom::{CustomElementOptions, CustomElementRegistry, DomTree};

use crate::LoaderError;
use crate::config::LoaderConfig;
use crate::element::LazyLoaderElement;

/// Tag name of the element
pub const TAG_NAME: &str = "lazy-loader";

/// Register `<lazy-loader>`. Returns `Ok(true)` when newly defined and
/// `Ok(false)` when it was already registered.
pub fn define(registry: &mut CustomElementRegistry) -> Result<bool, LoaderError> {
    if registry.is_defined(TAG_NAME) {
        tracing::trace!("<{}> already defined", TAG_NAME);
        return Ok(false);
    }

    registry.define(
        TAG_NAME,
        CustomElementOptions {
            observed_attributes: vec!["threshold".to_string()],
        },
    )?;
    tracing::debug!("Defined <{}>", TAG_NAME);
    Ok(true)
}

/// Create element instances for every `<lazy-loader>` in the document and
/// run their connected callbacks. Nothing is upgraded while the tag is
/// undefined.
pub fn upgrade(
    tree: &mut DomTree,
    registry: &CustomElementRegistry,
    config: &LoaderConfig,
) -> Result<Vec<LazyLoaderElement>, LoaderError> {
    if !registry.is_defined(TAG_NAME) {
        return Ok(Vec::new());
    }

    let hosts = tree.query_selector_all(tree.root(), TAG_NAME);
    let mut elements = Vec::with_capacity(hosts.len());
    for host in hosts {
        if tree.shadow_root(host).is_some() {
            continue;
        }
        let mut element = LazyLoaderElement::new(tree, host, config.clone())?;
        element.connected_callback(tree)?;
        elements.push(element);
    }

    tracing::debug!("Upgraded {} <{}> element(s)", elements.len(), TAG_NAME);
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_idempotent() {
        let mut registry = CustomElementRegistry::new();
        assert!(define(&mut registry).unwrap());
        assert!(!define(&mut registry).unwrap());
        assert!(registry.is_defined(TAG_NAME));
        assert_eq!(
            registry.get(TAG_NAME).map(|d| d.observed_attributes.clone()),
            Some(vec!["threshold".to_string()])
        );
    }

    #[test]
    fn test_upgrade_requires_definition() {
        let mut tree = DomTree::new();
        let host = tree.create_element("lazy-loader");
        tree.append_child(tree.root(), host).unwrap();

        let mut registry = CustomElementRegistry::new();
        let config = LoaderConfig::default();
        assert!(upgrade(&mut tree, &registry, &config).unwrap().is_empty());

        define(&mut registry).unwrap();
        let elements = upgrade(&mut tree, &registry, &config).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].host(), host);
        assert!(elements[0].has_rendered());

        // Already upgraded hosts are skipped
        assert!(upgrade(&mut tree, &registry, &config).unwrap().is_empty());
    }
}
