//! Listing normalization: raw search results into the `Photo` view model.
//!
//! The search API returns loosely-typed records: dimensions, format, and an
//! optional `context.custom` block of free-form descriptive fields that may
//! carry any subset of alt/title/description. [`normalize`] maps each record
//! into a fixed [`Photo`] shape with every ambiguity resolved up front:
//!
//! - Each photo gets an ordinal `id` from its position in the listing. The
//!   listing is sorted by `public_id` descending upstream, so position is
//!   stable across the fetch/placeholders/generate stages of one build. Ids
//!   are **not** persistent identifiers; a later build may renumber.
//! - A record with no custom context gets no `metadata` at all (the key is
//!   omitted from the manifest). A record with any custom context gets a
//!   metadata object with all three fields present: `alt` falls back to a
//!   fixed string, `title` and `description` to explicit `null`.
//!
//! Modeling the optional fields as `Option` from the start means the
//! manifest JSON never contains an "undefined" in any nested position, so no
//! post-hoc scrubbing pass is needed.

use serde::{Deserialize, Serialize};

/// Alt text used when an asset carries custom context without an alt field.
pub const DEFAULT_ALT: &str = "No alt text";

/// A single asset as returned by the search API.
///
/// Deserialized leniently: the API returns many more fields (bytes, etag,
/// timestamps) which are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAsset {
    pub public_id: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub context: Option<RawContext>,
}

/// The `context` block of a raw asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContext {
    #[serde(default)]
    pub custom: Option<RawCustom>,
}

/// Free-form descriptive fields under `context.custom`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCustom {
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A normalized photo, the unit every downstream stage works with.
///
/// Serialized into the stage manifests; `placeholder` and `metadata` are
/// omitted entirely when absent, while the fields inside `metadata` are
/// always present (null rather than missing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Ordinal position within the listing that produced this photo.
    /// 0-based, contiguous, valid only relative to that listing.
    pub id: usize,
    pub width: u32,
    pub height: u32,
    /// The asset host's opaque identifier, used to build rendition URLs.
    pub public_id: String,
    /// File extension as reported by the host ("jpg", "png", ...).
    pub format: String,
    /// Inline blur-up preview as a data URI. Absent until placeholder
    /// generation succeeds; absence is never an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Descriptive fields, present only when the asset carried custom
    /// context upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PhotoMetadata>,
}

/// Descriptive fields of a photo.
///
/// `title` and `description` serialize as explicit `null` when missing so
/// the manifest shape is identical for every photo that has metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub alt: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Photo {
    /// The photo's alt text: metadata alt if present, fallback otherwise.
    pub fn alt_text(&self) -> &str {
        self.metadata.as_ref().map_or(DEFAULT_ALT, |m| m.alt.as_str())
    }
}

/// Map raw search results into normalized photos.
///
/// Pure and deterministic: input order is preserved and becomes the ordinal
/// `id`, so the upstream sort order fully determines the final numbering.
pub fn normalize(raw: Vec<RawAsset>) -> Vec<Photo> {
    raw.into_iter()
        .enumerate()
        .map(|(id, asset)| {
            let metadata = asset.context.and_then(|c| c.custom).map(|custom| {
                PhotoMetadata {
                    alt: custom.alt.unwrap_or_else(|| DEFAULT_ALT.to_string()),
                    title: custom.title,
                    description: custom.description,
                }
            });
            Photo {
                id,
                width: asset.width,
                height: asset.height,
                public_id: asset.public_id,
                format: asset.format,
                placeholder: None,
                metadata,
            }
        })
        .collect()
}
