//! # Product Image Probe
//!
//! Runs one authenticated image fetch and prints what the screen would show.
//!
//! ## Usage
//! ```bash
//! # Fetch the image for product 42 with the token in CAJA_API_TOKEN
//! CAJA_API_TOKEN=... cargo run -p caja-client --bin image_probe -- 42
//!
//! # Use a specific config file
//! cargo run -p caja-client --bin image_probe -- 42 --config ./client.toml
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use caja_client::{init_logging, ClientConfig, EnvTokenStore, ImageFetcher, ImageSource, ImageState};

const TOKEN_VAR: &str = "CAJA_API_TOKEN";

fn print_help() {
    println!("Caja POS Image Probe");
    println!();
    println!("Usage: image_probe <PRODUCT_ID> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Client config file (default: platform config dir)");
    println!("  -h, --help           Show this help message");
    println!();
    println!("The bearer token is read from {}.", TOKEN_VAR);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let mut product_id: Option<i64> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => product_id = Some(other.parse()?),
        }
        i += 1;
    }

    let Some(product_id) = product_id else {
        print_help();
        return Err("missing product id".into());
    };

    let config = ClientConfig::load_or_default(config_path);
    println!("API:     {}", config.api.base_url);
    println!("Image:   {}", config.image_url(product_id)?);

    let fetcher = ImageFetcher::new(config, Arc::new(EnvTokenStore::new(TOKEN_VAR)))?;
    match fetcher.load(product_id).await {
        ImageState::Ready {
            source: ImageSource::Url { url },
        } => println!("✓ Ready: redirect to {}", url),
        ImageState::Ready {
            source: ImageSource::Bytes { content_type, data },
        } => println!("✓ Ready: {} bytes of {}", data.len(), content_type),
        ImageState::Placeholder { reason } => println!("⚠ Placeholder: {:?}", reason),
        ImageState::Loading => println!("… Loading"),
    }

    Ok(())
}
