//! Client-side cart store.
//!
//! The store mirrors the API's cart. It never edits the cart itself: the only
//! way the cart changes is by applying a complete API response.
//!
//! # Sequencing
//!
//! Every request takes a [`Ticket`] from a monotonically increasing counter
//! before it is sent. When the response arrives it is applied only if its
//! ticket is newer than the last settled one; an older response that arrives
//! late is discarded as stale. A failed request settles its ticket without
//! touching the cart.
//!
//! # Subscribers
//!
//! Views subscribe through a `tokio::sync::watch` channel and receive the full
//! [`CartSnapshot`] after every settled request or notice change.

pub mod notice;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mobile_store_core::{Cart, CartAction};
use tokio::sync::watch;
use tokio::time::Instant;

pub use notice::{CHECKOUT_REDIRECT_DELAY, CheckoutNotice, NOTICE_AUTO_HIDE, NOTICE_MESSAGE};

/// State of a request as seen by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<T> {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Success(T),
    /// The latest request failed with this message.
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    /// Build a settled state from a request result.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The failure message, if the latest request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Which cart call a ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Update(CartAction),
    Checkout,
}

/// Sequence number handed out when a request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket must be settled with apply or fail"]
pub struct Ticket {
    seq: u64,
    operation: Operation,
}

impl Ticket {
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }
}

/// What happened to a settled response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The response replaced the cart.
    Applied,
    /// The failure was recorded; the cart is unchanged.
    Failed,
    /// A newer request had already settled; the response was dropped.
    Stale,
}

/// Everything a cart view renders.
#[derive(Debug, Clone, Default)]
pub struct CartSnapshot {
    /// The cart from the last applied response.
    pub cart: Cart,
    /// State of the most recent request.
    pub request: RequestState<Operation>,
    /// Checkout success notice.
    pub notice: CheckoutNotice,
    /// Newest ticket handed out.
    pub issued: u64,
    /// Newest ticket settled (applied or failed).
    pub settled: u64,
}

impl CartSnapshot {
    /// True while a request newer than the last settled one is in flight.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.issued > self.settled
    }
}

/// Shared cart store.
///
/// Cheap to clone; clones share the same state and subscribers.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    next_seq: AtomicU64,
    state: watch::Sender<CartSnapshot>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(CartSnapshot::default());
        Self {
            inner: Arc::new(CartStoreInner {
                next_seq: AtomicU64::new(0),
                state,
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.state.subscribe()
    }

    /// Start a request: hand out the next ticket and mark the store loading.
    pub fn begin(&self, operation: Operation) -> Ticket {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_modify(|s| {
            s.issued = s.issued.max(seq);
            s.request = RequestState::Loading;
        });
        Ticket { seq, operation }
    }

    /// Apply an API response for `ticket`, replacing the whole cart.
    pub fn apply(&self, ticket: Ticket, cart: Cart) -> Settled {
        let mut outcome = Settled::Stale;
        self.inner.state.send_if_modified(|s| {
            if ticket.seq <= s.settled {
                return false;
            }
            s.settled = ticket.seq;
            s.cart = cart;
            s.request = if s.has_pending() {
                RequestState::Loading
            } else {
                RequestState::Success(ticket.operation)
            };
            outcome = Settled::Applied;
            true
        });
        log_settled(ticket, outcome);
        outcome
    }

    /// Record a failed request for `ticket`. The cart is left as it was.
    ///
    /// While a newer request is still outstanding the state stays `Loading`;
    /// that request's outcome decides what is shown.
    pub fn fail(&self, ticket: Ticket, message: impl Into<String>) -> Settled {
        let message = message.into();
        let mut outcome = Settled::Stale;
        self.inner.state.send_if_modified(|s| {
            if ticket.seq <= s.settled {
                return false;
            }
            s.settled = ticket.seq;
            s.request = if s.has_pending() {
                RequestState::Loading
            } else {
                RequestState::Failed(message)
            };
            outcome = Settled::Failed;
            true
        });
        log_settled(ticket, outcome);
        outcome
    }

    /// Open the checkout notice and schedule its auto-hide.
    pub fn show_notice(&self) {
        let now = Instant::now();
        self.inner.state.send_modify(|s| s.notice.show(now));

        let store = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(now + NOTICE_AUTO_HIDE).await;
            store.expire_notice(Instant::now());
        });
    }

    /// Close the checkout notice. Returns true if it was open.
    pub fn dismiss_notice(&self) -> bool {
        self.inner.state.send_if_modified(|s| s.notice.dismiss())
    }

    /// Close the notice if its auto-hide time has passed at `now`.
    pub fn expire_notice(&self, now: Instant) -> bool {
        self.inner.state.send_if_modified(|s| s.notice.expire(now))
    }

    /// Whether the checkout notice is open right now.
    #[must_use]
    pub fn notice_visible(&self) -> bool {
        self.inner.state.borrow().notice.is_visible_at(Instant::now())
    }
}

fn log_settled(ticket: Ticket, outcome: Settled) {
    match outcome {
        Settled::Applied => tracing::debug!(seq = ticket.seq, operation = ?ticket.operation, "Cart response applied"),
        Settled::Failed => tracing::warn!(seq = ticket.seq, operation = ?ticket.operation, "Cart request failed"),
        Settled::Stale => tracing::debug!(seq = ticket.seq, operation = ?ticket.operation, "Discarded stale cart response"),
    }
}
