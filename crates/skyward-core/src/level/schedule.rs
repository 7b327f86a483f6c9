//! Tick listener registration with deferred removal.
//!
//! Behaviors may ask to be removed from inside their own tick. The schedule
//! therefore never mutates its active set while a tick is iterating it:
//! [`TickSchedule::unregister`] only queues the id, and
//! [`TickSchedule::flush`] applies the queue at the tick boundary.
//!
//! # Example
//!
//! ```
//! use skyward_core::entity::BodyId;
//! use skyward_core::level::TickSchedule;
//!
//! let mut schedule = TickSchedule::new();
//! schedule.register(BodyId::new(2));
//! schedule.register(BodyId::new(1));
//!
//! schedule.unregister(BodyId::new(2));
//! assert_eq!(schedule.len(), 2);
//!
//! assert_eq!(schedule.flush(), vec![BodyId::new(2)]);
//! assert_eq!(schedule.active().collect::<Vec<_>>(), vec![BodyId::new(1)]);
//! ```

use std::collections::BTreeSet;

use crate::entity::BodyId;

/// Ordered set of bodies whose behaviors run every tick.
#[derive(Debug, Clone, Default)]
pub struct TickSchedule {
    active: BTreeSet<BodyId>,
    pending_removal: Vec<BodyId>,
}

impl TickSchedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body. Returns `false` if it was already registered.
    pub fn register(&mut self, body: BodyId) -> bool {
        self.active.insert(body)
    }

    /// Queues a body for removal at the next [`flush`](Self::flush).
    ///
    /// Unknown bodies and bodies already queued are ignored.
    pub fn unregister(&mut self, body: BodyId) {
        if self.active.contains(&body) && !self.pending_removal.contains(&body) {
            self.pending_removal.push(body);
        }
    }

    /// Applies queued removals and returns the removed bodies in queue order.
    pub fn flush(&mut self) -> Vec<BodyId> {
        let removed = std::mem::take(&mut self.pending_removal);
        for body in &removed {
            self.active.remove(body);
        }
        removed
    }

    /// Returns `true` if the body is registered and not queued for removal.
    #[must_use]
    pub fn is_active(&self, body: BodyId) -> bool {
        self.active.contains(&body) && !self.pending_removal.contains(&body)
    }

    /// Registered bodies in ascending id order, including queued ones.
    pub fn active(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.active.iter().copied()
    }

    /// Number of registered bodies, including queued ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Drops every registration and every queued removal.
    pub fn clear(&mut self) {
        self.active.clear();
        self.pending_removal.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let mut s = TickSchedule::new();
        assert!(s.register(BodyId::new(1)));
        assert!(!s.register(BodyId::new(1)));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn removal_waits_for_flush() {
        let mut s = TickSchedule::new();
        s.register(BodyId::new(1));
        s.unregister(BodyId::new(1));
        assert!(!s.is_active(BodyId::new(1)));
        assert_eq!(s.active().count(), 1);

        s.flush();
        assert!(s.is_empty());
    }

    #[test]
    fn duplicate_and_unknown_removals_ignored() {
        let mut s = TickSchedule::new();
        s.register(BodyId::new(1));
        s.unregister(BodyId::new(1));
        s.unregister(BodyId::new(1));
        s.unregister(BodyId::new(9));
        assert_eq!(s.flush(), vec![BodyId::new(1)]);
        assert!(s.flush().is_empty());
    }

    #[test]
    fn iteration_is_ordered() {
        let mut s = TickSchedule::new();
        for id in [5, 1, 3] {
            s.register(BodyId::new(id));
        }
        let order: Vec<u64> = s.active().map(BodyId::as_u64).collect();
        assert_eq!(order, vec![1, 3, 5]);
    }

    #[test]
    fn clear_drops_pending() {
        let mut s = TickSchedule::new();
        s.register(BodyId::new(1));
        s.unregister(BodyId::new(1));
        s.clear();
        assert!(s.is_empty());
        assert!(s.flush().is_empty());
    }
}
