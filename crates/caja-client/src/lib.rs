//! # caja-client: I/O Edge for Caja POS
//!
//! Everything around the pure sale logic in `caja-core` that touches the
//! network, configuration or shared state.
//!
//! ## Module Organization
//! ```text
//! caja_client/
//! ├── lib.rs          ◄─── You are here (exports, logging init)
//! ├── config.rs       ◄─── TOML + env configuration
//! ├── auth.rs         ◄─── Bearer token lookup
//! ├── image.rs        ◄─── Product image fetch with placeholder fallback
//! ├── catalog.rs      ◄─── Backend product records → core Product
//! ├── commands.rs     ◄─── Session operations invoked by screens
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Shared sale session
//! │   └── image.rs    ◄─── Per-screen image slot
//! ├── error.rs        ◄─── ClientError
//! └── bin/
//!     └── image_probe.rs
//! ```
//!
//! ## Startup
//! ```rust,ignore
//! caja_client::init_logging();
//! let config = ClientConfig::load_or_default(None);
//! let session = SessionState::new();
//! let images = ImageFetcher::new(config, Arc::new(MemoryTokenStore::new()))?;
//! ```

pub mod auth;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod image;
pub mod state;

use tracing::debug;
use tracing_subscriber::EnvFilter;

pub use auth::{EnvTokenStore, MemoryTokenStore, TokenStore};
pub use catalog::{parse_products, ApiProduct};
pub use commands::CartResponse;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use image::{ImageFetcher, ImageSource, ImageState, PlaceholderReason};
pub use state::{ImageSlot, ImageTicket, SessionState};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=caja=trace` - Show trace for caja crates only
/// - Default: `info,caja=debug`
///
/// Returns `false` when a global subscriber was already installed; that
/// subscriber stays in place.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,caja=debug"));

    match tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        Ok(()) => true,
        Err(err) => {
            debug!(error = %err, "Tracing subscriber already installed, keeping it");
            false
        }
    }
}
