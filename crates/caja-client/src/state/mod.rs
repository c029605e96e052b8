//! # State Module
//!
//! Shared mutable state held by the app shell and handed to commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────────┐  │
//! │  │    SessionState      │        │    ImageSlot (one per screen)    │  │
//! │  │                      │        │                                  │  │
//! │  │  Arc<Mutex<          │        │  product_id                      │  │
//! │  │    SaleSession       │        │  generation ◄── bumped by begin  │  │
//! │  │  >>                  │        │  state: Loading/Ready/Placeholder│  │
//! │  └──────────────────────┘        └──────────────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: std Mutex, never held across an await                 │
//! │  • ImageSlot: owner wraps it in tokio Mutex; lock released during I/O  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod image;
mod session;

pub use image::{ImageSlot, ImageTicket};
pub use session::SessionState;
