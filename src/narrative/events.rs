//! Typed, single-consumer event queues

use std::collections::VecDeque;

/// FIFO of events from one emitter.
///
/// The emitter pushes during its update; the owner drains once per frame.
#[derive(Debug)]
pub struct EventChannel<E> {
    queue: VecDeque<E>,
}

impl<E> EventChannel<E> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn emit(&mut self, event: E) {
        self.queue.push_back(event);
    }

    /// Take every pending event in emission order
    pub fn drain(&mut self) -> impl Iterator<Item = E> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}
