//! Load request types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::item::{Item, ResourceId};

/// Transform the loader should apply to the decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transform {
    /// Deliver the image as decoded (resized to the target size).
    None,
    /// Crop the image to a circle inscribed in the target square.
    #[default]
    Circle,
}

impl Transform {
    /// Configuration name of the transform.
    pub fn name(&self) -> &'static str {
        match self {
            Transform::None => "none",
            Transform::Circle => "circle",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown transform name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown transform '{0}' (expected 'circle' or 'none')")]
pub struct UnknownTransform(pub String);

impl FromStr for Transform {
    type Err = UnknownTransform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Transform::None),
            "circle" | "circular" => Ok(Transform::Circle),
            other => Err(UnknownTransform(other.to_string())),
        }
    }
}

/// One image source, in the order a loader should try them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRef<'a> {
    Resource(ResourceId),
    Url(&'a str),
}

/// Everything a loader needs to produce the image for one position.
///
/// # Example
///
/// ```
/// use gallery_catalog::{Item, LoadRequest, ResourceId, SourceRef, Transform};
///
/// let item = Item::from_resource(ResourceId::new(1)).with_url("https://example.com/1.png");
/// let request = LoadRequest::for_item(4, &item, 128, Transform::Circle);
///
/// let sources: Vec<_> = request.sources().collect();
/// assert_eq!(
///     sources,
///     vec![
///         SourceRef::Resource(ResourceId::new(1)),
///         SourceRef::Url("https://example.com/1.png"),
///     ]
/// );
/// assert_eq!(request.position(), 4);
/// assert_eq!(request.target_size(), 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    position: usize,
    resource: Option<ResourceId>,
    url: Option<String>,
    placeholder: Option<ResourceId>,
    target_size: u32,
    transform: Transform,
}

impl LoadRequest {
    /// Build the request for `item` at `position`.
    pub fn for_item(position: usize, item: &Item, target_size: u32, transform: Transform) -> Self {
        Self {
            position,
            resource: item.resource(),
            url: item.url().map(str::to_string),
            placeholder: item.placeholder(),
            target_size,
            transform,
        }
    }

    /// Catalog position this request is for.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Primary source.
    pub fn resource(&self) -> Option<ResourceId> {
        self.resource
    }

    /// Remote source, the fallback when the resource is absent or fails.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn placeholder(&self) -> Option<ResourceId> {
        self.placeholder
    }

    /// Edge length of the square the image must be rendered to.
    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Image sources in priority order: resource first, then URL.
    pub fn sources(&self) -> impl Iterator<Item = SourceRef<'_>> {
        self.resource
            .map(SourceRef::Resource)
            .into_iter()
            .chain(self.url.as_deref().map(SourceRef::Url))
    }
}
