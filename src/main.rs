use clap::{Parser, Subcommand};
use cloud_gal::client::{AssetHost, CloudinaryClient};
use cloud_gal::config::{self, Credentials, SiteConfig};
use cloud_gal::listing::{self, Photo};
use cloud_gal::repository::{GallerySource, ManifestSource, PhotoRepository};
use cloud_gal::{generate, placeholder};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cloud-gal")]
#[command(about = "Static site generator for Cloudinary-hosted photo galleries")]
#[command(long_about = "\
Static site generator for Cloudinary-hosted photo galleries

Your Cloudinary folder is the data source. Photos are listed from the
search API, ordered by public_id descending, and every rendition the site
shows is a Cloudinary transformation URL; nothing is processed locally.

Setup:

  1. cloud-gal gen-config > config.toml, then set cloud_name and folder
  2. export CLOUDINARY_API_KEY=... CLOUDINARY_API_SECRET=...
  3. cloud-gal build

Pipeline stages (run individually, or all at once with 'build'):

  fetch          search API → .cloud-gal-temp/listing.json
  placeholders   listing.json → .cloud-gal-temp/gallery.json
  generate       gallery.json → dist/

Each stage writes a JSON manifest you can inspect. 'generate' reuses the
fetched manifests, so template and color tweaks don't re-query the API.")]
#[command(version)]
struct Cli {
    /// Site configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate manifests
    #[arg(long, default_value = ".cloud-gal-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Query the asset host and write the normalized listing manifest
    Fetch,
    /// Attach blur-up placeholders to the fetched listing
    Placeholders,
    /// Produce the static HTML site from the gallery manifest
    Generate,
    /// Run the full pipeline: fetch → placeholders → generate
    Build,
    /// Validate config and credentials by querying the asset host
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch => {
            let config = config::load_config(&cli.config)?;
            let client = authenticated_client(&config)?;

            let raw = client.search(&config.cloudinary.folder)?;
            let photos = listing::normalize(raw);

            std::fs::create_dir_all(&cli.temp_dir)?;
            write_manifest(&cli.temp_dir.join("listing.json"), &photos)?;
            println!("Fetched {} photos from '{}'", photos.len(), config.cloudinary.folder);
        }
        Command::Placeholders => {
            let config = config::load_config(&cli.config)?;
            let client = authenticated_client(&config)?;

            let mut photos = read_manifest(&cli.temp_dir.join("listing.json"))?;
            placeholder::attach_placeholders(&client, &mut photos, config.placeholders.width)?;

            let generated = photos.iter().filter(|p| p.placeholder.is_some()).count();
            write_manifest(&cli.temp_dir.join("gallery.json"), &photos)?;
            println!("Placeholders: {generated}/{} generated", photos.len());
        }
        Command::Generate => {
            let config = config::load_config(&cli.config)?;
            let repo =
                PhotoRepository::new(ManifestSource::new(cli.temp_dir.join("gallery.json")));

            let pages = generate::generate(&repo, &config, &cli.output)?;
            println!("Generated {pages} pages → {}", cli.output.display());
        }
        Command::Build => {
            let config = config::load_config(&cli.config)?;
            let client = authenticated_client(&config)?;

            println!("==> Stage 1: Fetching listing and placeholders from Cloudinary");
            let repo = PhotoRepository::new(GallerySource::new(client, &config));
            let photos = repo.get_all();
            std::fs::create_dir_all(&cli.temp_dir)?;
            write_manifest(&cli.temp_dir.join("gallery.json"), &photos)?;
            println!("    {} photos listed", photos.len());

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let pages = generate::generate(&repo, &config, &cli.output)?;

            println!("==> Build complete: {pages} pages");
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            let client = authenticated_client(&config)?;

            let raw = client.search(&config.cloudinary.folder)?;
            println!(
                "OK: folder '{}' has {} photos",
                config.cloudinary.folder,
                raw.len()
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn authenticated_client(
    config: &SiteConfig,
) -> Result<CloudinaryClient, Box<dyn std::error::Error>> {
    let credentials = Credentials::from_env()?;
    Ok(CloudinaryClient::new(&config.cloudinary, credentials)?)
}

fn write_manifest(path: &Path, photos: &[Photo]) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(photos)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn read_manifest(path: &Path) -> Result<Vec<Photo>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
