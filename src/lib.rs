//! # Cloud Gal
//!
//! A minimal static site generator for photo galleries whose images live in
//! Cloudinary. The asset host is the data source: one folder is one
//! gallery, ordering comes from the host's `public_id` sort, and all image
//! scaling is delegated to the host's transformation URLs.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Cloud Gal builds a site in three independent stages, each producing a
//! JSON manifest the next stage consumes:
//!
//! ```text
//! 1. Fetch         search API  →  listing.json   (normalized photos)
//! 2. Placeholders  listing     →  gallery.json   (blur-up data URIs)
//! 3. Generate      gallery     →  dist/          (final HTML site)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: each manifest is human-readable JSON you can inspect.
//! - **Quota thrift**: re-rendering after a template or config change reuses
//!   the fetched manifests instead of re-querying the API.
//! - **Testability**: each stage is a function from manifest to manifest,
//!   so unit tests exercise pipeline logic without the network.
//!
//! The `build` command runs all three stages in one process through the
//! [`repository::PhotoRepository`], which memoizes the listing so the index
//! page and every detail page come from a single upstream query.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`client`] | Asset host access: search query, rendition fetches, delivery URLs |
//! | [`listing`] | Normalization of raw search results into the `Photo` view model |
//! | [`placeholder`] | Concurrent blur-up placeholder generation |
//! | [`repository`] | Per-build memoized listing with ordinal-id lookups |
//! | [`generate`] | Final HTML rendering with Maud |
//! | [`config`] | `config.toml` loading, validation, and CSS generation |
//!
//! # Design Decisions
//!
//! ## No Local Image Processing
//!
//! Every rendition the site shows, including the tiny blur-up previews,
//! is a Cloudinary transformation URL (`c_scale,w_<N>`). The binary never
//! decodes a pixel, which keeps it free of codec dependencies and keeps
//! builds fast: the only per-photo cost is one small HTTP fetch for the
//! placeholder.
//!
//! ## Ordinal Photo Ids
//!
//! Photos are addressed by their position in the listing (`/p/0.html`,
//! `/p/1.html`, ...), not by a persistent identifier. The listing order is
//! pinned upstream (`public_id` descending, capped at 400), so ids are
//! stable across the stages of one build and across rebuilds of an
//! unchanged folder, but adding or removing photos renumbers. The
//! repository owns this invariant: detail lookups always resolve against
//! the same cached listing the index was rendered from.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system: malformed markup is a build error, interpolation is
//! auto-escaped, and there is no template directory to ship.
//!
//! ## Availability Over Completeness
//!
//! A gallery that renders beats a build that crashes. An upstream failure
//! produces an empty (but valid) site; a failed placeholder produces a
//! photo without blur-up; an unknown detail id lands on the generated 404
//! page. Errors are logged, never fatal past the repository boundary.

pub mod client;
pub mod config;
pub mod generate;
pub mod listing;
pub mod placeholder;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_helpers;
