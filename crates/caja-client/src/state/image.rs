//! # Image Slot
//!
//! The image a screen is currently showing, plus a generation counter so
//! that only the latest request may write into it.
//!
//! ```text
//! begin(1) ──► ticket g=1 ───────────── slow ───────────► resolve(g=1) ✗ dropped
//! begin(2) ──► ticket g=2 ──► resolve(g=2) ✓ applied
//! ```

use tracing::debug;

use caja_core::ProductId;

use crate::image::ImageState;

/// Handle for one in-flight image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTicket {
    product_id: ProductId,
    generation: u64,
}

impl ImageTicket {
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageSlot {
    generation: u64,
    product_id: Option<ProductId>,
    state: ImageState,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the slot at a product and marks it loading.
    ///
    /// Any ticket issued before this one becomes stale.
    pub fn begin(&mut self, product_id: ProductId) -> ImageTicket {
        self.generation += 1;
        self.product_id = Some(product_id);
        self.state = ImageState::Loading;

        ImageTicket {
            product_id,
            generation: self.generation,
        }
    }

    /// Stores a result if the ticket is still current.
    pub fn resolve(&mut self, ticket: ImageTicket, state: ImageState) -> bool {
        if ticket.generation != self.generation {
            debug!(
                product_id = ticket.product_id,
                current = ?self.product_id,
                "Discarding stale image response"
            );
            return false;
        }

        self.state = state;
        true
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }
}
