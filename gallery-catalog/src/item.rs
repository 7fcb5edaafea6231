//! Gallery item descriptors.
//!
//! An [`Item`] names where the image for one gallery position can be found:
//! a bundled resource, a remote URL, or both, plus an optional placeholder
//! resource shown while the image is loading. The constructors only accept
//! descriptors with at least one image source, so every item the catalog sees
//! is loadable in principle.

use std::fmt;

/// Identifier of a bundled image resource.
///
/// # Example
///
/// ```
/// use gallery_catalog::ResourceId;
///
/// let id = ResourceId::new(42);
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "res:42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u32);

impl ResourceId {
    /// Create a resource identifier.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "res:{}", self.0)
    }
}

/// Descriptor for one gallery position.
///
/// # Example
///
/// ```
/// use gallery_catalog::{Item, ResourceId};
///
/// let item = Item::from_url("https://example.com/avatar.png")
///     .with_placeholder(ResourceId::new(7));
/// assert_eq!(item.url(), Some("https://example.com/avatar.png"));
/// assert_eq!(item.resource(), None);
/// assert_eq!(item.placeholder(), Some(ResourceId::new(7)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    resource: Option<ResourceId>,
    url: Option<String>,
    placeholder: Option<ResourceId>,
}

impl Item {
    /// Item backed by a bundled resource.
    pub fn from_resource(resource: ResourceId) -> Self {
        Self {
            resource: Some(resource),
            url: None,
            placeholder: None,
        }
    }

    /// Item backed by a remote URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            resource: None,
            url: Some(url.into()),
            placeholder: None,
        }
    }

    /// Add a remote URL, used when the resource cannot be resolved.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Add a bundled resource, tried before the URL.
    pub fn with_resource(mut self, resource: ResourceId) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Add a placeholder resource shown until the image is ready.
    pub fn with_placeholder(mut self, placeholder: ResourceId) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn resource(&self) -> Option<ResourceId> {
        self.resource
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn placeholder(&self) -> Option<ResourceId> {
        self.placeholder
    }
}
