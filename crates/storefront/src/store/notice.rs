//! Checkout success notification.
//!
//! A one-shot notice with two states, `Idle` and `Shown`. It closes when
//! dismissed or once [`NOTICE_AUTO_HIDE`] has elapsed, whichever comes first.

use std::time::Duration;

use tokio::time::Instant;

/// Text shown after a successful checkout.
pub const NOTICE_MESSAGE: &str = "Order Placed Successfully !";

/// How long the notice stays open without being dismissed.
pub const NOTICE_AUTO_HIDE: Duration = Duration::from_secs(4);

/// Delay before the cart page navigates back to the catalog after checkout.
pub const CHECKOUT_REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// Checkout notice state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutNotice {
    #[default]
    Idle,
    Shown {
        since: Instant,
    },
}

impl CheckoutNotice {
    /// Open the notice at `now`. Re-showing restarts the auto-hide timer.
    pub fn show(&mut self, now: Instant) {
        *self = Self::Shown { since: now };
    }

    /// Close the notice. Returns true if it was open.
    pub fn dismiss(&mut self) -> bool {
        std::mem::take(self) != Self::Idle
    }

    /// Close the notice if its auto-hide time has passed at `now`.
    ///
    /// Returns true if this call closed it.
    pub fn expire(&mut self, now: Instant) -> bool {
        if matches!(self, Self::Shown { .. }) && !self.is_visible_at(now) {
            *self = Self::Idle;
            return true;
        }
        false
    }

    /// Whether the notice is open at `now`.
    #[must_use]
    pub fn is_visible_at(&self, now: Instant) -> bool {
        match self {
            Self::Idle => false,
            Self::Shown { since } => now.saturating_duration_since(*since) < NOTICE_AUTO_HIDE,
        }
    }
}
