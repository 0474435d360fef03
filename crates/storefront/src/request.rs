//! Request tokens for render targets.
//!
//! Refreshes can overlap. Each refresh takes a token before it goes to the
//! network and renders only if its token is still the newest one when the
//! response arrives, so a slow stale response never overwrites a newer
//! render.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one in-flight refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Issues tokens for one render target.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Start a new request, invalidating every earlier token.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` belongs to the newest request.
    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
