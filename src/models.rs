//! Data model for vision service responses
//!
//! Field names follow the service's camelCase JSON. Every collection defaults to
//! empty so that a response missing a facet (for example when a feature was not
//! requested) still deserializes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Feature categories that can be requested from the analyze endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualFeature {
    Description,
    Tags,
    Categories,
    Brands,
    Objects,
    Adult,
}

impl VisualFeature {
    /// The six facets requested by a full analysis, in request order
    pub const ALL: [Self; 6] = [
        Self::Description,
        Self::Tags,
        Self::Categories,
        Self::Brands,
        Self::Objects,
        Self::Adult,
    ];

    /// Name used in the `visualFeatures` query parameter
    #[must_use]
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Description => "Description",
            Self::Tags => "Tags",
            Self::Categories => "Categories",
            Self::Brands => "Brands",
            Self::Objects => "Objects",
            Self::Adult => "Adult",
        }
    }
}

impl fmt::Display for VisualFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

/// Structured output of the vision service for one image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub description: ImageDescription,
    pub tags: Vec<ImageTag>,
    pub categories: Vec<Category>,
    pub brands: Vec<DetectedBrand>,
    pub objects: Vec<DetectedObject>,
    pub adult: AdultInfo,
    pub request_id: Option<String>,
    pub metadata: Option<ImageMetadata>,
    pub model_version: Option<String>,
}

impl AnalysisResult {
    /// Landmarks across all categories, deduplicated by name, first occurrence wins
    #[must_use]
    pub fn landmarks(&self) -> Vec<&Landmark> {
        let mut seen = HashSet::new();
        self.categories
            .iter()
            .filter_map(|category| category.detail.as_ref())
            .filter_map(|detail| detail.landmarks.as_ref())
            .flatten()
            .filter(|&landmark| seen.insert(landmark.name.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDescription {
    pub tags: Vec<String>,
    pub captions: Vec<Caption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTag {
    pub name: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<CategoryDetail>,
}

/// Domain-specific detail attached to a category.
///
/// `landmarks` stays an `Option` because the service distinguishes an absent
/// list from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<Landmark>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celebrities: Option<Vec<Celebrity>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Celebrity {
    pub name: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_rectangle: Option<FaceRectangle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRectangle {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedBrand {
    pub name: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rectangle: Option<BoundingRect>,
}

/// One detected object; the label is the service's `object` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    #[serde(rename = "object")]
    pub label: String,
    pub confidence: f64,
    pub rectangle: BoundingRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectHierarchy>,
}

/// Ancestor chain of a detected object (for example dog → mammal → animal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectHierarchy {
    #[serde(rename = "object")]
    pub label: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<ObjectHierarchy>>,
}

/// Pixel rectangle in source image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdultInfo {
    pub is_adult_content: bool,
    pub is_racy_content: bool,
    pub is_gory_content: bool,
    pub adult_score: f64,
    pub racy_score: f64,
    pub gore_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: Option<String>,
}

/// Thumbnail dimensions as entered by the user.
///
/// Anything that parses as an integer is kept, including zero and negative
/// values; range checks are left to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub width: i32,
    pub height: i32,
    pub smart_cropping: bool,
}

impl ThumbnailRequest {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            smart_cropping: true,
        }
    }
}
