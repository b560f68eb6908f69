//! HTML site generation.
//!
//! Final stage of the build pipeline: renders the static site from the
//! repository's listing.
//!
//! ## Generated Pages
//!
//! - **Index page** (`/index.html`): the photo grid, or an empty-gallery
//!   message when the listing is empty
//! - **Detail pages** (`/p/<id>.html`): one per photo id the repository
//!   enumerates, with previous/next navigation
//! - **Not-found page** (`/404.html`): served by static hosts for any
//!   detail id outside the listing
//!
//! ## Blur-up Loading
//!
//! Grid and detail images carry the photo's placeholder data URI as an
//! inline `background-image`, so the tiny preview shows while the real
//! rendition streams in. Photos whose placeholder generation failed simply
//! render without one.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! The stylesheet is embedded at compile time and inlined into every page
//! together with color custom properties from the config, so the output
//! needs no extra asset files.

use crate::client::rendition_url;
use crate::config::{self, SiteConfig};
use crate::listing::Photo;
use crate::repository::{PhotoRepository, PhotoSource};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Render the full static site into `output_dir`.
///
/// Returns the number of pages written.
pub fn generate<S: PhotoSource>(
    repo: &PhotoRepository<S>,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<usize, GenerateError> {
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );

    fs::create_dir_all(output_dir)?;

    let photos = repo.get_all();
    let mut pages = 0;

    let index = render_index(&photos, config, &css);
    fs::write(output_dir.join("index.html"), index.into_string())?;
    println!("Generated index.html");
    pages += 1;

    let detail_dir = output_dir.join("p");
    fs::create_dir_all(&detail_dir)?;
    for id in repo.all_ids() {
        // Ids come from the same listing, so the lookup cannot miss; a
        // miss would mean the repository reloaded mid-build.
        let Ok(photo) = repo.get_by_id(id) else {
            continue;
        };
        let prev = id.checked_sub(1);
        let next = (id + 1 < photos.len()).then_some(id + 1);

        let page = render_detail(&photo, prev, next, config, &css);
        fs::write(detail_dir.join(format!("{id}.html")), page.into_string())?;
        println!("Generated p/{id}.html");
        pages += 1;
    }

    let not_found = render_not_found(config, &css);
    fs::write(output_dir.join("404.html"), not_found.into_string())?;
    println!("Generated 404.html");
    pages += 1;

    Ok(pages)
}

/// Shared page shell: head with inlined CSS, body, footer.
fn page_shell(title: &str, css: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (body)
                footer { "Powered by cloud-gal" }
            }
        }
    }
}

/// Inline style carrying the blur-up background, when the photo has one.
fn blur_style(photo: &Photo) -> Option<String> {
    photo
        .placeholder
        .as_ref()
        .map(|uri| format!("background-image:url({uri})"))
}

fn render_index(photos: &[Photo], config: &SiteConfig, css: &str) -> Markup {
    let cloud = &config.cloudinary.cloud_name;
    let width = config.display.grid_width;

    page_shell(
        &config.site.title,
        css,
        html! {
            header { h1 { (config.site.title) } }
            main {
                @if photos.is_empty() {
                    p.empty { "No photos found." }
                } @else {
                    div.grid {
                        @for photo in photos {
                            a href={ "p/" (photo.id) ".html" } {
                                img src=(rendition_url(cloud, &photo.public_id, &photo.format, width))
                                    alt=(photo.alt_text())
                                    width=(photo.width)
                                    height=(photo.height)
                                    loading="lazy"
                                    style=[blur_style(photo)];
                            }
                        }
                    }
                }
            }
        },
    )
}

fn render_detail(
    photo: &Photo,
    prev: Option<usize>,
    next: Option<usize>,
    config: &SiteConfig,
    css: &str,
) -> Markup {
    let cloud = &config.cloudinary.cloud_name;
    let url = rendition_url(cloud, &photo.public_id, &photo.format, config.display.detail_width);

    let title = photo
        .metadata
        .as_ref()
        .and_then(|m| m.title.as_deref())
        .unwrap_or(&config.site.title);
    let description = photo
        .metadata
        .as_ref()
        .and_then(|m| m.description.as_deref())
        .unwrap_or("No description available");

    page_shell(
        title,
        css,
        html! {
            main.detail {
                p.description { (description) }
                img src=(url)
                    alt=(photo.alt_text())
                    width=(photo.width)
                    height=(photo.height)
                    style=[blur_style(photo)];
                nav.pager {
                    @if let Some(prev) = prev {
                        a href={ (prev) ".html" } { "Previous" }
                    } @else {
                        span {}
                    }
                    a href="../index.html" { "All photos" }
                    @if let Some(next) = next {
                        a href={ (next) ".html" } { "Next" }
                    } @else {
                        span {}
                    }
                }
            }
        },
    )
}

fn render_not_found(config: &SiteConfig, css: &str) -> Markup {
    page_shell(
        &config.site.title,
        css,
        html! {
            main {
                p.not-found {
                    "That photo doesn't exist. "
                    a href="/index.html" { "Back to the gallery" }
                }
            }
        },
    )
}
