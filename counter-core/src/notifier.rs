// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Delivery of events to any number of subscribers.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

/// Forwards events to every live subscriber.
pub struct Notifier<Event> {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Event>>>,
}

impl<Event> Default for Notifier<Event> {
    fn default() -> Self {
        Notifier {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<Event> Notifier<Event>
where
    Event: Clone,
{
    /// Registers a new subscriber, returning the receiving end of its event queue.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Event> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Sends `event` to all subscribers, dropping the ones that went away.
    pub fn notify(&self, event: &Event) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    /// The number of subscribers that were alive at the last notification.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
