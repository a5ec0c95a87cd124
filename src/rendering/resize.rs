//! Container resize observation
//!
//! The host owns a [`ResizeNotifier`] for each surface and reports size
//! changes to it. Renderers hold a [`ResizeSubscription`]; dropping the
//! subscription detaches it, so a torn-down map never receives updates.

use crate::prelude::HashMap;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::{Arc, Mutex, Weak};

/// Container size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    senders: HashMap<u64, Sender<ContainerSize>>,
}

#[derive(Clone, Default)]
pub struct ResizeNotifier {
    inner: Arc<Mutex<Subscribers>>,
}

impl ResizeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> ResizeSubscription {
        let (tx, rx) = unbounded();
        let id = match self.inner.lock() {
            Ok(mut subscribers) => {
                let id = subscribers.next_id;
                subscribers.next_id += 1;
                subscribers.senders.insert(id, tx);
                id
            }
            Err(_) => {
                log::error!("resize notifier lock poisoned; subscription is inert");
                u64::MAX
            }
        };

        ResizeSubscription {
            id,
            notifier: Arc::downgrade(&self.inner),
            rx,
        }
    }

    /// Sends the new size to every live subscriber
    pub fn notify(&self, width: f64, height: f64) {
        let size = ContainerSize { width, height };
        if let Ok(mut subscribers) = self.inner.lock() {
            subscribers
                .senders
                .retain(|_, tx| tx.send(size).is_ok());
            log::trace!(
                "resize {}x{} to {} subscribers",
                width,
                height,
                subscribers.senders.len()
            );
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .map(|subscribers| subscribers.senders.len())
            .unwrap_or(0)
    }
}

/// Live registration with a [`ResizeNotifier`]; unsubscribes on drop
pub struct ResizeSubscription {
    id: u64,
    notifier: Weak<Mutex<Subscribers>>,
    rx: Receiver<ContainerSize>,
}

impl ResizeSubscription {
    /// Most recent size reported since the last call, skipping older ones
    pub fn latest(&self) -> Option<ContainerSize> {
        self.rx.try_iter().last()
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.notifier.upgrade() {
            if let Ok(mut subscribers) = inner.lock() {
                subscribers.senders.remove(&self.id);
            }
        }
    }
}
