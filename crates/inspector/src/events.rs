//! Single-threaded event queue between interactive handles and controllers.

use std::collections::VecDeque;

use crate::handle::HandleId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectorEvent {
    /// The user finished manipulating a handle
    HandleChanged(HandleId),
}

/// FIFO of pending events. An event already waiting in the queue is not
/// queued twice, so a burst of drags results in one recompute.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<InspectorEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when an identical event was already pending
    pub fn push(&mut self, event: InspectorEvent) -> bool {
        if self.pending.contains(&event) {
            return false;
        }
        self.pending.push_back(event);
        true
    }

    pub fn pop(&mut self) -> Option<InspectorEvent> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_coalesce() {
        let mut q = EventQueue::new();
        assert!(q.push(InspectorEvent::HandleChanged(HandleId(0))));
        assert!(!q.push(InspectorEvent::HandleChanged(HandleId(0))));
        assert!(q.push(InspectorEvent::HandleChanged(HandleId(1))));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(InspectorEvent::HandleChanged(HandleId(0))));
        assert_eq!(q.pop(), Some(InspectorEvent::HandleChanged(HandleId(1))));
        assert!(q.pop().is_none());
    }
}
