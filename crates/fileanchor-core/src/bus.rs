//! # Lifecycle Bus
//!
//! Synchronous publish/subscribe registry for [`LifecycleEvent`]s.
//!
//! One bus is constructed per process and shared by `Arc`; there is no
//! global instance. Handlers subscribe per [`EventKind`] (or to every
//! kind) and are invoked on the publishing thread, in registration order.
//!
//! ## Invariants
//!
//! - Publishing never fails. A handler that returns `Err` or panics is
//!   logged at `warn` and skipped; the remaining handlers still run.
//! - `publish` snapshots the matching handlers and releases the registry
//!   lock before invoking them, so concurrent publishes do not serialize
//!   on handler execution and a handler may itself subscribe or
//!   unsubscribe without deadlocking.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{trace, warn};

use crate::event::{EventKind, LifecycleEvent};

/// Error a handler reports back to the bus. Only ever logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    /// Build a handler error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An observer of lifecycle events.
///
/// Implementations must not block: they run inline on the task that is
/// driving the submission.
pub trait LifecycleHandler: Send + Sync {
    /// React to a published event.
    fn handle(&self, event: &LifecycleEvent) -> Result<(), HandlerError>;
}

impl<F> LifecycleHandler for F
where
    F: Fn(&LifecycleEvent) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, event: &LifecycleEvent) -> Result<(), HandlerError> {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscription-{}", self.0)
    }
}

struct Registration {
    id: SubscriptionId,
    /// `None` matches every kind.
    kind: Option<EventKind>,
    handler: Arc<dyn LifecycleHandler>,
}

/// Process-wide lifecycle event registry.
pub struct LifecycleBus {
    registrations: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl LifecycleBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            registrations: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a bus with a [`crate::LogSubscriber`] registered for every
    /// event kind.
    pub fn with_logging() -> Self {
        let bus = Self::new();
        bus.subscribe_all(crate::log::LogSubscriber);
        bus
    }

    /// Register `handler` for events of `kind`.
    pub fn subscribe<H>(&self, kind: EventKind, handler: H) -> SubscriptionId
    where
        H: LifecycleHandler + 'static,
    {
        self.register(Some(kind), Arc::new(handler))
    }

    /// Register `handler` for events of every kind.
    pub fn subscribe_all<H>(&self, handler: H) -> SubscriptionId
    where
        H: LifecycleHandler + 'static,
    {
        self.register(None, Arc::new(handler))
    }

    /// Register an already shared handler for `kind` (or every kind when
    /// `None`). Lets one observer instance be inspected by the caller
    /// after it has been handed to the bus.
    pub fn subscribe_shared(
        &self,
        kind: Option<EventKind>,
        handler: Arc<dyn LifecycleHandler>,
    ) -> SubscriptionId {
        self.register(kind, handler)
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut regs = self.registrations.write();
        let before = regs.len();
        regs.retain(|r| r.id != id);
        regs.len() != before
    }

    /// Deliver `event` to every matching handler.
    ///
    /// Returns the number of handlers that completed without error.
    pub fn publish(&self, event: &LifecycleEvent) -> usize {
        let kind = event.kind();
        let snapshot: Vec<(SubscriptionId, Arc<dyn LifecycleHandler>)> = self
            .registrations
            .read()
            .iter()
            .filter(|r| r.kind.map_or(true, |k| k == kind))
            .map(|r| (r.id, Arc::clone(&r.handler)))
            .collect();

        trace!(%kind, handlers = snapshot.len(), "publishing lifecycle event");

        let mut delivered = 0;
        for (id, handler) in snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    warn!(subscription = %id, %kind, error = %e, "lifecycle handler failed");
                }
                Err(payload) => {
                    warn!(
                        subscription = %id,
                        %kind,
                        panic = %panic_message(payload.as_ref()),
                        "lifecycle handler panicked"
                    );
                }
            }
        }
        delivered
    }

    /// Number of registered subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registrations.read().len()
    }

    fn register(
        &self,
        kind: Option<EventKind>,
        handler: Arc<dyn LifecycleHandler>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registrations.write().push(Registration { id, kind, handler });
        id
    }
}

impl Default for LifecycleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LifecycleBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
