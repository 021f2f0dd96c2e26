//! Bounded queue of editor events handed to the host.
//!
//! Events pushed during a frame stay available until the host drains them or
//! until the frame after next starts, whichever comes first.

use core_events::EditorEvent;
use std::collections::VecDeque;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct EventQueue {
    events: VecDeque<EditorEvent>,
    capacity: usize,
    /// Events already present when the current frame started.
    carried: usize,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
            carried: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, ev: EditorEvent) {
        if self.events.len() >= self.capacity {
            let dropped = self.events.pop_front();
            self.carried = self.carried.saturating_sub(1);
            warn!(target: "editor.dispatch", capacity = self.capacity, ?dropped, "event_queue_overflow");
        }
        self.events.push_back(ev);
    }

    /// Discard events left over from before the previous frame.
    pub fn begin_frame(&mut self) {
        self.events.drain(..self.carried);
        self.carried = self.events.len();
    }

    pub fn drain(&mut self) -> Vec<EditorEvent> {
        self.carried = 0;
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undrained_events_survive_one_frame() {
        let mut q = EventQueue::new(8);
        q.begin_frame();
        q.push(EditorEvent::Submit);
        q.begin_frame();
        assert_eq!(q.len(), 1);
        q.push(EditorEvent::Change);
        q.begin_frame();
        assert_eq!(q.drain(), vec![EditorEvent::Change]);
    }

    #[test]
    fn drain_clears() {
        let mut q = EventQueue::new(8);
        q.push(EditorEvent::Up);
        assert_eq!(q.drain(), vec![EditorEvent::Up]);
        assert!(q.is_empty());
        q.begin_frame();
        assert!(q.is_empty());
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut q = EventQueue::new(2);
        q.push(EditorEvent::Up);
        q.push(EditorEvent::Down);
        q.push(EditorEvent::Change);
        assert_eq!(q.drain(), vec![EditorEvent::Down, EditorEvent::Change]);
    }
}
