//! Process-wide event fan-out
//!
//! Every editor window (and the application itself) subscribes once and gets
//! its own mailbox. Publishing only hands the event to each mailbox; receiver
//! logic always runs on the receiver's side, so an Apply in one window can
//! never re-enter another window's in-progress handler.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::{debug, trace};

/// Payload-free notifications shared by the whole process
///
/// Receivers treat these as cues to re-read shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The committed preferences were replaced
    ConfigurationChanged,
    /// The editor is shutting down; windows should close
    EditorQuitting,
}

/// Identifies one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    tx: UnboundedSender<AppEvent>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Cloneable handle to the process-wide channel
#[derive(Clone, Default)]
pub struct Broadcaster {
    registry: Arc<Mutex<Registry>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a new mailbox
    pub fn subscribe(&self) -> Mailbox {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = self.registry();
        let id = SubscriberId(registry.next_id);
        registry.next_id += 1;
        registry.subscribers.push(Subscriber { id, tx });
        debug!(subscriber = id.0, total = registry.subscribers.len(), "Subscribed to broadcasts");
        Mailbox { id, rx }
    }

    /// Remove a mailbox explicitly
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut registry = self.registry();
        registry.subscribers.retain(|s| s.id != id);
        debug!(
            subscriber = id.0,
            total = registry.subscribers.len(),
            "Unsubscribed from broadcasts"
        );
    }

    /// Deliver `event` to every live mailbox without waiting for receivers
    ///
    /// Returns the number of mailboxes the event was handed to. Mailboxes
    /// whose receiver is gone are pruned.
    pub fn publish(&self, event: AppEvent) -> usize {
        let mut registry = self.registry();
        registry.subscribers.retain(|s| s.tx.send(event).is_ok());
        let delivered = registry.subscribers.len();
        trace!(?event, delivered, "Published broadcast");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry().subscribers.len()
    }
}

/// Receiving end owned by one subscriber
pub struct Mailbox {
    id: SubscriberId,
    rx: UnboundedReceiver<AppEvent>,
}

impl Mailbox {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Next event, waiting if none is pending
    ///
    /// `None` once every `Broadcaster` handle is gone.
    pub async fn recv(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Next pending event without waiting
    pub fn try_recv(&mut self) -> Option<AppEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain every pending event, collapsing adjacent duplicates
    ///
    /// Two configuration changes published back to back only need one
    /// re-read of the committed snapshot.
    pub fn drain(&mut self) -> Vec<AppEvent> {
        let mut events: Vec<AppEvent> = Vec::new();
        while let Some(event) = self.try_recv() {
            if events.last() != Some(&event) {
                events.push(event);
            }
        }
        events
    }
}
