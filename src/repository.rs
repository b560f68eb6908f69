//! In-process photo repository.
//!
//! One build renders an index page and a detail page per photo, and every
//! one of those renders needs the same listing. The repository runs the
//! fetch → normalize → placeholders pipeline once per process and serves
//! every subsequent call from memory, so a build issues exactly one search
//! query no matter how many pages it generates.
//!
//! ## Cache lifecycle
//!
//! The cache is an explicit state machine, one cycle per repository:
//!
//! ```text
//! Empty → Fetching → Ready    (listing loaded)
//! Empty → Fetching → Failed   (upstream error, served as an empty listing)
//! ```
//!
//! There is no transition back to `Empty`: a repository caches one listing
//! for its lifetime, and ordinal photo ids are only meaningful against that
//! one listing. A failed load is sticky for the same reason: retrying
//! mid-build could produce a listing with different numbering than pages
//! already generated.
//!
//! Concurrent first callers share one in-flight load: the first caller
//! moves the state to `Fetching` and loads with the lock released; everyone
//! else waits on a condvar until the state settles.
//!
//! ## Failure policy
//!
//! An upstream failure degrades to an empty listing rather than failing the
//! build; a gallery page with no photos beats no gallery page. The error
//! is logged at warn level.

use crate::client::{AssetHost, UpstreamError};
use crate::config::SiteConfig;
use crate::listing::{Photo, normalize};
use crate::placeholder::attach_placeholders;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use thiserror::Error;

/// A detail lookup for an id outside the current listing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no photo with id {0} in the current listing")]
pub struct NotFound(pub usize);

/// Where a repository gets its listing from.
///
/// Production uses [`GallerySource`] (the full pipeline against the asset
/// host); the standalone `generate` command uses [`ManifestSource`]; tests
/// inject counting or failing sources.
pub trait PhotoSource: Sync {
    fn load(&self) -> Result<Vec<Photo>, UpstreamError>;
}

/// The full pipeline: search, normalize, attach placeholders.
pub struct GallerySource<C> {
    client: C,
    folder: String,
    placeholder_width: u32,
}

impl<C: AssetHost> GallerySource<C> {
    pub fn new(client: C, config: &SiteConfig) -> Self {
        Self {
            client,
            folder: config.cloudinary.folder.clone(),
            placeholder_width: config.placeholders.width,
        }
    }
}

impl<C: AssetHost> PhotoSource for GallerySource<C> {
    fn load(&self) -> Result<Vec<Photo>, UpstreamError> {
        let raw = self.client.search(&self.folder)?;
        let mut photos = normalize(raw);
        // Placeholders are non-fatal: a batch-level failure (pool setup)
        // ships the listing without them, same as per-photo failures.
        if let Err(e) = attach_placeholders(&self.client, &mut photos, self.placeholder_width) {
            warn!("placeholder batch skipped: {e}");
        }
        Ok(photos)
    }
}

/// A listing read back from a stage manifest on disk.
pub struct ManifestSource {
    path: PathBuf,
}

impl ManifestSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PhotoSource for ManifestSource {
    fn load(&self) -> Result<Vec<Photo>, UpstreamError> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

enum CacheState {
    Empty,
    Fetching,
    Ready(Arc<[Photo]>),
    Failed,
}

/// Memoizing, single-flight access to one listing.
pub struct PhotoRepository<S> {
    source: S,
    state: Mutex<CacheState>,
    settled: Condvar,
}

impl<S: PhotoSource> PhotoRepository<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(CacheState::Empty),
            settled: Condvar::new(),
        }
    }

    /// The full normalized, placeholder-augmented listing.
    ///
    /// Loads from the source on first use; every later call (and every
    /// concurrent call during the load) shares the same result. A failed
    /// load yields an empty listing for the repository's whole lifetime.
    pub fn get_all(&self) -> Arc<[Photo]> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        loop {
            match &*state {
                CacheState::Ready(photos) => return Arc::clone(photos),
                CacheState::Failed => return Vec::new().into(),
                CacheState::Fetching => {
                    state = self
                        .settled
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                CacheState::Empty => {
                    *state = CacheState::Fetching;
                    drop(state);

                    let loaded = self.source.load();

                    state = self
                        .state
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                    *state = match loaded {
                        Ok(photos) => {
                            info!("listing ready: {} photos", photos.len());
                            CacheState::Ready(photos.into())
                        }
                        Err(e) => {
                            warn!("listing fetch failed, serving empty gallery: {e}");
                            CacheState::Failed
                        }
                    };
                    self.settled.notify_all();
                }
            }
        }
    }

    /// Resolve a photo by its ordinal id within the current listing.
    pub fn get_by_id(&self, id: usize) -> Result<Photo, NotFound> {
        self.get_all().get(id).cloned().ok_or(NotFound(id))
    }

    /// Every valid detail-page id for the current listing, `0..N`.
    ///
    /// Used to enumerate the detail pages to generate; an id not in this
    /// set resolves to [`NotFound`], never to a crash.
    pub fn all_ids(&self) -> Vec<usize> {
        (0..self.get_all().len()).collect()
    }
}
