//! Blur-up placeholder generation.
//!
//! For each photo in a listing, fetches a tiny `c_scale` rendition from the
//! asset host and encodes it as a `data:` URI that the generated pages
//! inline behind the real image. One placeholder is one network round trip,
//! so a listing of N photos performs N independent fetches; running them
//! serially would make build time scale linearly with gallery size. The
//! whole batch is therefore fanned out at once on a dedicated thread pool
//! and collected in listing order.
//!
//! ## Failure policy
//!
//! A placeholder is a progressive-loading nicety, not part of the photo's
//! identity. A failed fetch is logged and leaves that one photo without a
//! placeholder; it never fails the other photos and never shortens the
//! listing. Only a failure to set up the pool itself aborts the batch, and
//! the caller treats that the same way: photos without placeholders.

use crate::client::{AssetHost, MAX_RESULTS, UpstreamError};
use crate::listing::Photo;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, warn};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaceholderError {
    #[error("rendition fetch failed: {0}")]
    Fetch(#[from] UpstreamError),
    #[error("thread pool setup failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Generate the placeholder data URI for a single photo.
pub fn generate_placeholder<C: AssetHost>(
    client: &C,
    photo: &Photo,
    width: u32,
) -> Result<String, PlaceholderError> {
    let bytes = client.fetch_rendition(&photo.public_id, &photo.format, width)?;
    Ok(format!(
        "data:{};base64,{}",
        mime_type(&photo.format),
        STANDARD.encode(bytes)
    ))
}

/// Fetch and attach placeholders for every photo in the listing.
///
/// Fan-out/fan-in: all fetches are issued concurrently on a pool with one
/// thread per photo (the fetches are blocking network calls, not CPU work,
/// so the pool is sized to the batch rather than the core count; the batch
/// is bounded by [`MAX_RESULTS`]). Results come back in listing order.
/// Individual failures are captured per photo; see the module docs.
pub fn attach_placeholders<C: AssetHost>(
    client: &C,
    photos: &mut [Photo],
    width: u32,
) -> Result<(), PlaceholderError> {
    if photos.is_empty() {
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(photos.len().min(MAX_RESULTS))
        .build()?;

    let results: Vec<Option<String>> = pool.install(|| {
        photos
            .par_iter()
            .map(|photo| match generate_placeholder(client, photo, width) {
                Ok(uri) => Some(uri),
                Err(e) => {
                    warn!("placeholder for '{}' failed: {e}", photo.public_id);
                    None
                }
            })
            .collect()
    });

    let generated = results.iter().filter(|r| r.is_some()).count();
    debug!("generated {generated}/{} placeholders", photos.len());

    for (photo, placeholder) in photos.iter_mut().zip(results) {
        photo.placeholder = placeholder;
    }
    Ok(())
}

/// MIME type for a format extension as reported by the asset host.
fn mime_type(format: &str) -> String {
    match format {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "svg" => "image/svg+xml".to_string(),
        other => format!("image/{other}"),
    }
}
