//! Shared test utilities for the cloud-gal test suite.
//!
//! Builders for raw search results, so tests can describe upstream
//! listings without spelling out every field.

use crate::listing::{RawAsset, RawContext, RawCustom};

/// A raw asset with the given public id and no custom context.
pub fn raw_asset(public_id: &str) -> RawAsset {
    RawAsset {
        public_id: public_id.to_string(),
        format: "jpg".to_string(),
        width: 720,
        height: 480,
        context: None,
    }
}

/// A raw asset carrying a custom context block with the given fields.
pub fn raw_asset_with_custom(
    public_id: &str,
    alt: Option<&str>,
    title: Option<&str>,
    description: Option<&str>,
) -> RawAsset {
    RawAsset {
        context: Some(RawContext {
            custom: Some(RawCustom {
                alt: alt.map(String::from),
                title: title.map(String::from),
                description: description.map(String::from),
            }),
        }),
        ..raw_asset(public_id)
    }
}
