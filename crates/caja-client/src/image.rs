//! # Product Image Fallback
//!
//! Fetches a product's image from the authenticated API and degrades to a
//! placeholder on any failure.
//!
//! ## Fetch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load(product_id)                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TokenStore::token() ── None ──────────────────────► Placeholder        │
//! │       │ Some(token)                                                     │
//! │       ▼                                                                 │
//! │  GET {base_url}/products/{id}/image                                     │
//! │  Authorization: Bearer <token>                                          │
//! │       │                                                                 │
//! │       ├── transport error / non-2xx ───────────────► Placeholder        │
//! │       │                                                                 │
//! │       ├── Content-Type: application/json                                │
//! │       │      { "url": "…" } ──── usable url ───────► Ready(Url)         │
//! │       │                   └─── missing / bad ──────► Placeholder        │
//! │       │                                                                 │
//! │       └── anything else (image bytes) ─────────────► Ready(Bytes)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no retry. A screen asks again when it shows a different product.
//! Requests are tagged through [`ImageSlot`] so a slow answer for a product
//! the screen has already moved away from is dropped.

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use caja_core::ProductId;

use crate::auth::TokenStore;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::state::ImageSlot;

// =============================================================================
// Image State
// =============================================================================

/// Where the screen should take the image from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImageSource {
    /// Resolved through the JSON indirection.
    Url { url: String },
    /// Raw image returned by the endpoint itself.
    Bytes { content_type: String, data: Vec<u8> },
}

/// Why the placeholder is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderReason {
    MissingToken,
    /// Failure outside the request itself, e.g. the token store erroring.
    Unavailable,
    /// Non-success HTTP status.
    Status(u16),
    Transport,
    MissingRedirectUrl,
    InvalidPayload,
    InvalidUrl,
}

impl From<&ClientError> for PlaceholderReason {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::MissingToken => PlaceholderReason::MissingToken,
            ClientError::Status { status, .. } => PlaceholderReason::Status(*status),
            ClientError::Http(_) => PlaceholderReason::Transport,
            ClientError::MissingRedirectUrl => PlaceholderReason::MissingRedirectUrl,
            ClientError::InvalidPayload(_) => PlaceholderReason::InvalidPayload,
            ClientError::InvalidUrl(_) => PlaceholderReason::InvalidUrl,
            ClientError::InvalidConfig(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::Core(_) => PlaceholderReason::Unavailable,
        }
    }
}

/// Three-state image result seen by the screen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ImageState {
    #[default]
    Loading,
    Ready { source: ImageSource },
    Placeholder { reason: PlaceholderReason },
}

impl ImageState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ImageState::Loading)
    }
}

/// JSON body of the indirection response.
#[derive(Debug, Deserialize)]
struct RedirectPayload {
    url: Option<String>,
}

// =============================================================================
// Image Fetcher
// =============================================================================

/// Authenticated client for the product image endpoint.
pub struct ImageFetcher {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("base_url", &self.config.api.base_url)
            .finish_non_exhaustive()
    }
}

impl ImageFetcher {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    /// Fetches the image for a product, surfacing every failure as an error.
    pub async fn fetch(&self, product_id: ProductId) -> ClientResult<ImageSource> {
        let token = self.tokens.token().await?.ok_or(ClientError::MissingToken)?;
        let url = self.config.image_url(product_id)?;

        debug!(product_id, url = %url, "Requesting product image");
        let response = self.http.get(url.clone()).bearer_auth(&token).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = response.bytes().await?;

        if is_json(&content_type) {
            let payload: RedirectPayload = serde_json::from_slice(&body)
                .map_err(|e| ClientError::InvalidPayload(e.to_string()))?;
            let target = payload
                .url
                .filter(|u| !u.trim().is_empty())
                .ok_or(ClientError::MissingRedirectUrl)?;
            // Relative targets resolve against the endpoint that returned them.
            let resolved = url.join(&target)?;
            return Ok(ImageSource::Url {
                url: resolved.to_string(),
            });
        }

        Ok(ImageSource::Bytes {
            content_type,
            data: body.to_vec(),
        })
    }

    /// Fetches the image, downgrading any failure to a placeholder.
    pub async fn load(&self, product_id: ProductId) -> ImageState {
        match self.fetch(product_id).await {
            Ok(source) => {
                info!(product_id, "Product image ready");
                ImageState::Ready { source }
            }
            Err(err) => {
                warn!(product_id, error = %err, "Product image unavailable, showing placeholder");
                ImageState::Placeholder {
                    reason: PlaceholderReason::from(&err),
                }
            }
        }
    }

    /// Loads an image into a screen's slot.
    ///
    /// Returns `false` when the slot moved on to another request while this
    /// one was in flight; the late result is dropped.
    pub async fn load_into(&self, slot: &Mutex<ImageSlot>, product_id: ProductId) -> bool {
        let ticket = slot.lock().await.begin(product_id);
        let state = self.load(product_id).await;
        slot.lock().await.resolve(ticket, state)
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use axum::extract::Path;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use std::net::SocketAddr;
    use std::time::Duration;

    const TOKEN: &str = "secret";
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G'];

    async fn image_endpoint(Path(id): Path<i64>, headers: HeaderMap) -> Response {
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            == Some("Bearer secret");
        if !authorized {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        match id {
            1 => ([(header::CONTENT_TYPE, "image/png")], PNG).into_response(),
            2 => Json(serde_json::json!({ "url": "https://cdn.example.com/p/2.png" })).into_response(),
            3 => Json(serde_json::json!({ "url": "" })).into_response(),
            4 => Json(serde_json::json!({ "other": true })).into_response(),
            5 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            6 => Json(serde_json::json!({ "url": "/static/6.png" })).into_response(),
            7 => {
                tokio::time::sleep(Duration::from_millis(300)).await;
                ([(header::CONTENT_TYPE, "image/png")], PNG).into_response()
            }
            8 => ([(header::CONTENT_TYPE, "application/json; charset=utf-8")], "not json").into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn spawn_server() -> SocketAddr {
        let app = Router::new().route("/api/products/{id}/image", get(image_endpoint));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn fetcher(addr: SocketAddr, tokens: MemoryTokenStore) -> ImageFetcher {
        let mut config = ClientConfig::default();
        config.api.base_url = format!("http://{}/api", addr);
        ImageFetcher::new(config, Arc::new(tokens)).unwrap()
    }

    #[tokio::test]
    async fn test_raw_image_bytes() {
        let addr = spawn_server().await;
        let fetcher = fetcher(addr, MemoryTokenStore::with_token(TOKEN));

        let state = fetcher.load(1).await;
        assert_eq!(
            state,
            ImageState::Ready {
                source: ImageSource::Bytes {
                    content_type: "image/png".to_string(),
                    data: PNG.to_vec(),
                }
            }
        );
    }

    #[tokio::test]
    async fn test_json_indirection_retargets() {
        let addr = spawn_server().await;
        let fetcher = fetcher(addr, MemoryTokenStore::with_token(TOKEN));

        let state = fetcher.load(2).await;
        assert_eq!(
            state,
            ImageState::Ready {
                source: ImageSource::Url {
                    url: "https://cdn.example.com/p/2.png".to_string()
                }
            }
        );
    }

    #[tokio::test]
    async fn test_relative_redirect_resolves_against_endpoint() {
        let addr = spawn_server().await;
        let fetcher = fetcher(addr, MemoryTokenStore::with_token(TOKEN));

        let source = fetcher.fetch(6).await.unwrap();
        assert_eq!(
            source,
            ImageSource::Url {
                url: format!("http://{}/static/6.png", addr)
            }
        );
    }

    #[tokio::test]
    async fn test_missing_token_skips_request() {
        let addr = spawn_server().await;
        let fetcher = fetcher(addr, MemoryTokenStore::new());

        assert_eq!(
            fetcher.load(1).await,
            ImageState::Placeholder {
                reason: PlaceholderReason::MissingToken
            }
        );
    }

    #[tokio::test]
    async fn test_placeholder_reasons() {
        let addr = spawn_server().await;
        let fetcher = fetcher(addr, MemoryTokenStore::with_token(TOKEN));

        let cases = [
            (3, PlaceholderReason::MissingRedirectUrl),
            (4, PlaceholderReason::MissingRedirectUrl),
            (5, PlaceholderReason::Status(500)),
            (8, PlaceholderReason::InvalidPayload),
            (99, PlaceholderReason::Status(404)),
        ];
        for (id, reason) in cases {
            assert_eq!(
                fetcher.load(id).await,
                ImageState::Placeholder { reason },
                "product {}",
                id
            );
        }
    }

    #[tokio::test]
    async fn test_wrong_token_is_placeholder() {
        let addr = spawn_server().await;
        let fetcher = fetcher(addr, MemoryTokenStore::with_token("expired"));

        assert_eq!(
            fetcher.load(1).await,
            ImageState::Placeholder {
                reason: PlaceholderReason::Status(401)
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_placeholder() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = fetcher(addr, MemoryTokenStore::with_token(TOKEN));
        assert_eq!(
            fetcher.load(1).await,
            ImageState::Placeholder {
                reason: PlaceholderReason::Transport
            }
        );
    }

    #[tokio::test]
    async fn test_stale_response_is_dropped() {
        let addr = spawn_server().await;
        let fetcher = Arc::new(fetcher(addr, MemoryTokenStore::with_token(TOKEN)));
        let slot = Arc::new(Mutex::new(ImageSlot::new()));

        let slow = {
            let fetcher = Arc::clone(&fetcher);
            let slot = Arc::clone(&slot);
            tokio::spawn(async move { fetcher.load_into(&slot, 7).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(fetcher.load_into(&slot, 2).await);
        assert!(!slow.await.unwrap());

        let slot = slot.lock().await;
        assert_eq!(slot.product_id(), Some(2));
        assert!(matches!(
            slot.state(),
            ImageState::Ready {
                source: ImageSource::Url { .. }
            }
        ));
    }

    #[test]
    fn test_is_json() {
        assert!(is_json("application/json"));
        assert!(is_json("Application/JSON; charset=utf-8"));
        assert!(is_json("application/problem+json"));
        assert!(!is_json("image/png"));
        assert!(!is_json(""));
    }

    #[test]
    fn test_state_serializes_tagged() {
        let json = serde_json::to_value(ImageState::Placeholder {
            reason: PlaceholderReason::MissingToken,
        })
        .unwrap();
        assert_eq!(json["state"], "placeholder");
        assert_eq!(json["reason"], "missingToken");
    }
}
