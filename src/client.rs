//! Cloudinary asset host client.
//!
//! The [`AssetHost`] trait defines the two operations the pipeline needs
//! from the image host: a folder-scoped search of the asset catalog and a
//! byte fetch of a scaled rendition. The production implementation is
//! [`CloudinaryClient`]; tests substitute a recording mock so pipeline
//! logic can be exercised without the network.
//!
//! ## Search query
//!
//! One POST to the Admin API per listing:
//!
//! ```text
//! POST https://api.cloudinary.com/v1_1/<cloud>/resources/search
//! {
//!   "expression": "folder:<folder>/*",
//!   "with_field": ["context"],
//!   "sort_by": [{"public_id": "desc"}],
//!   "max_results": 400
//! }
//! ```
//!
//! Authentication is HTTP basic auth with the API key/secret. A successful
//! response with no `resources` array is an empty listing, not an error.
//!
//! ## Renditions
//!
//! Scaled variants are never produced locally; they are delivery URLs of
//! the form `.../image/upload/c_scale,w_<N>/<public_id>.<format>`, built by
//! [`rendition_url`]. The placeholder stage fetches tiny widths through
//! [`AssetHost::fetch_rendition`]; the generated pages embed larger widths
//! directly.

use crate::config::{CloudinaryConfig, Credentials};
use crate::listing::RawAsset;
use log::debug;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on assets per listing. Ordinal photo ids are positions in
/// the capped, `public_id`-descending result, so this is a fixed constant
/// rather than a config knob: changing it renumbers every detail page.
pub const MAX_RESULTS: usize = 400;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("asset host returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Operations the pipeline needs from the asset host.
///
/// `Sync` so a single client can serve the parallel placeholder fetches.
pub trait AssetHost: Sync {
    /// List all assets under `folder` (sub-folders included), sorted by
    /// `public_id` descending, capped at [`MAX_RESULTS`]. An empty match
    /// is an empty `Vec`, not an error.
    fn search(&self, folder: &str) -> Result<Vec<RawAsset>, UpstreamError>;

    /// Fetch the bytes of a `c_scale,w_<width>` rendition of an asset.
    fn fetch_rendition(
        &self,
        public_id: &str,
        format: &str,
        width: u32,
    ) -> Result<Vec<u8>, UpstreamError>;
}

/// Delivery URL for a scaled rendition of an asset.
pub fn rendition_url(cloud_name: &str, public_id: &str, format: &str, width: u32) -> String {
    format!(
        "https://res.cloudinary.com/{cloud_name}/image/upload/c_scale,w_{width}/{public_id}.{format}"
    )
}

/// Search request body for a folder listing.
fn search_request_body(folder: &str) -> serde_json::Value {
    serde_json::json!({
        "expression": format!("folder:{folder}/*"),
        "with_field": ["context"],
        "sort_by": [{"public_id": "desc"}],
        "max_results": MAX_RESULTS,
    })
}

/// Search API response envelope.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    resources: Vec<RawAsset>,
}

/// Authenticated client for the Cloudinary Admin and delivery APIs.
pub struct CloudinaryClient {
    http: reqwest::blocking::Client,
    cloud_name: String,
    credentials: Credentials,
}

impl CloudinaryClient {
    pub fn new(
        config: &CloudinaryConfig,
        credentials: Credentials,
    ) -> Result<Self, UpstreamError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            cloud_name: config.cloud_name.clone(),
            credentials,
        })
    }
}

impl AssetHost for CloudinaryClient {
    fn search(&self, folder: &str) -> Result<Vec<RawAsset>, UpstreamError> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/resources/search",
            self.cloud_name
        );
        debug!("searching folder '{folder}'");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .json(&search_request_body(folder))
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let body = response.text()?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        debug!("search matched {} assets", parsed.resources.len());
        Ok(parsed.resources)
    }

    fn fetch_rendition(
        &self,
        public_id: &str,
        format: &str,
        width: u32,
    ) -> Result<Vec<u8>, UpstreamError> {
        let url = rendition_url(&self.cloud_name, public_id, format, width);
        let response = self.http.get(&url).send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Mock asset host that records calls without touching the network.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockHost {
        pub assets: Vec<RawAsset>,
        pub search_fails: bool,
        pub failing_renditions: HashSet<String>,
        pub rendition_bytes: Vec<u8>,
        pub calls: Mutex<Vec<RecordedCall>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedCall {
        Search(String),
        Rendition { public_id: String, width: u32 },
    }

    impl MockHost {
        pub fn with_assets(assets: Vec<RawAsset>) -> Self {
            Self {
                assets,
                rendition_bytes: b"tiny image bytes".to_vec(),
                ..Default::default()
            }
        }

        pub fn failing_search() -> Self {
            Self {
                search_fails: true,
                ..Default::default()
            }
        }

        /// Make rendition fetches for one public id fail.
        pub fn fail_rendition(mut self, public_id: &str) -> Self {
            self.failing_renditions.insert(public_id.to_string());
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn search_count(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, RecordedCall::Search(_)))
                .count()
        }
    }

    impl AssetHost for MockHost {
        fn search(&self, folder: &str) -> Result<Vec<RawAsset>, UpstreamError> {
            self.calls
                .lock()
                .unwrap()
                .push(RecordedCall::Search(folder.to_string()));
            if self.search_fails {
                return Err(UpstreamError::Status {
                    status: 401,
                    body: "mock auth failure".into(),
                });
            }
            Ok(self.assets.clone())
        }

        fn fetch_rendition(
            &self,
            public_id: &str,
            _format: &str,
            width: u32,
        ) -> Result<Vec<u8>, UpstreamError> {
            self.calls.lock().unwrap().push(RecordedCall::Rendition {
                public_id: public_id.to_string(),
                width,
            });
            if self.failing_renditions.contains(public_id) {
                return Err(UpstreamError::Status {
                    status: 404,
                    body: "mock missing rendition".into(),
                });
            }
            Ok(self.rendition_bytes.clone())
        }
    }

    // =========================================================================
    // URL and request construction
    // =========================================================================

    #[test]
    fn rendition_url_format() {
        assert_eq!(
            rendition_url("my-account", "gallery/dsc-0042", "jpg", 720),
            "https://res.cloudinary.com/my-account/image/upload/c_scale,w_720/gallery/dsc-0042.jpg"
        );
    }

    #[test]
    fn search_body_carries_fixed_query_policy() {
        let body = search_request_body("events/2026");
        assert_eq!(body["expression"], "folder:events/2026/*");
        assert_eq!(body["with_field"][0], "context");
        assert_eq!(body["sort_by"][0]["public_id"], "desc");
        assert_eq!(body["max_results"], 400);
    }

    // =========================================================================
    // Response parsing
    // =========================================================================

    #[test]
    fn search_response_parses_resources() {
        let json = r#"{
            "total_count": 2,
            "resources": [
                {"public_id": "b", "format": "jpg", "width": 100, "height": 80},
                {"public_id": "a", "format": "png", "width": 50, "height": 40}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.resources.len(), 2);
        assert_eq!(parsed.resources[0].public_id, "b");
    }

    #[test]
    fn search_response_missing_resources_is_empty() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"total_count": 0}"#).unwrap();
        assert!(parsed.resources.is_empty());
    }

    #[test]
    fn search_response_garbage_is_malformed() {
        let result: Result<SearchResponse, _> = serde_json::from_str("not json");
        assert!(result.is_err());
    }

    // =========================================================================
    // Mock behavior
    // =========================================================================

    #[test]
    fn mock_records_search_calls() {
        let mock = MockHost::with_assets(vec![]);
        mock.search("gallery").unwrap();

        assert_eq!(mock.calls(), vec![RecordedCall::Search("gallery".into())]);
    }

    #[test]
    fn mock_failing_search_errors() {
        let mock = MockHost::failing_search();
        let result = mock.search("gallery");
        assert!(matches!(
            result,
            Err(UpstreamError::Status { status: 401, .. })
        ));
    }

    #[test]
    fn mock_failing_rendition_errors_only_for_marked_id() {
        let mock = MockHost::with_assets(vec![]).fail_rendition("b");
        assert!(mock.fetch_rendition("a", "jpg", 16).is_ok());
        assert!(mock.fetch_rendition("b", "jpg", 16).is_err());
    }
}
