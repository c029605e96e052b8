//! # Session State
//!
//! The sale session shared between screens.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>` because several commands may
//! touch it, only one should change it at a time, and the shell may run
//! commands concurrently. Every caller gets the same session; there is no
//! other way to reach a cart.

use std::sync::{Arc, Mutex};

use caja_core::SaleSession;

/// Thread-safe handle to the current sale session.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<SaleSession>>,
}

impl SessionState {
    /// Creates state holding a fresh, empty session.
    pub fn new() -> Self {
        Self::from_session(SaleSession::new())
    }

    pub fn from_session(session: SaleSession) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = state.with_session(|s| s.cart().totals());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SaleSession) -> R,
    {
        let session = self.session.lock().expect("Sale session mutex poisoned");
        f(&session)
    }

    /// Executes a function with write access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_session_mut(|s| s.cart_mut().add_item(&product, 1));
    /// ```
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SaleSession) -> R,
    {
        let mut session = self.session.lock().expect("Sale session mutex poisoned");
        f(&mut session)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
