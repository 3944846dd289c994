// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_model::{PendingPosition, RecordId};

// What the queue needs to know about the hosting view: whether it is
// attached to a populated snapshot yet, and how to move its cursor.
pub trait PositionSurface {
    fn is_ready(&self) -> bool;

    fn apply_position(&mut self, current: RecordId, selected: &[RecordId]) -> bool;

    fn clear_position(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Applied,
    Cleared,
    Queued,
}

// Holds a requested position while the surface is not yet realized and
// re-applies it on every readiness poll. Requests coalesce: the latest
// one wins. A disposed surface simply abandons the pending request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeferredPositioningQueue {
    pending: Option<PendingPosition>,
}

impl DeferredPositioningQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingPosition> {
        self.pending.as_ref()
    }

    pub fn request(
        &mut self,
        current: RecordId,
        selected: Vec<RecordId>,
        surface: &mut dyn PositionSurface,
    ) -> RequestOutcome {
        if current.is_none() {
            // "No selection" applies synchronously and supersedes anything
            // still waiting; it is never queued.
            self.pending = None;
            surface.clear_position();
            return RequestOutcome::Cleared;
        }
        if surface.is_ready() && surface.apply_position(current, &selected) {
            self.pending = None;
            return RequestOutcome::Applied;
        }
        self.pending = Some(PendingPosition::new(current, selected));
        RequestOutcome::Queued
    }

    // Called right after attachment and on every idle tick.
    pub fn flush_if_ready(&mut self, surface: &mut dyn PositionSurface) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };
        if !surface.is_ready() {
            return false;
        }
        if surface.apply_position(pending.current, &pending.selected) {
            self.pending = None;
            return true;
        }
        false
    }

    pub fn abandon(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{DeferredPositioningQueue, PositionSurface, RequestOutcome};
    use docket_model::RecordId;

    #[derive(Default)]
    struct FakeSurface {
        ready: bool,
        position: Option<(RecordId, Vec<RecordId>)>,
        clears: usize,
    }

    impl PositionSurface for FakeSurface {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn apply_position(&mut self, current: RecordId, selected: &[RecordId]) -> bool {
            self.position = Some((current, selected.to_vec()));
            true
        }

        fn clear_position(&mut self) {
            self.position = None;
            self.clears += 1;
        }
    }

    #[test]
    fn request_queues_until_the_surface_is_ready() {
        let mut queue = DeferredPositioningQueue::new();
        let mut surface = FakeSurface::default();

        let outcome = queue.request(RecordId::new(3), vec![RecordId::new(3)], &mut surface);
        assert_eq!(outcome, RequestOutcome::Queued);
        assert!(surface.position.is_none());
        assert!(!queue.flush_if_ready(&mut surface));

        surface.ready = true;
        assert!(queue.flush_if_ready(&mut surface));
        assert_eq!(
            surface.position,
            Some((RecordId::new(3), vec![RecordId::new(3)]))
        );
        assert!(queue.pending().is_none());
        // Nothing left to flush on the next idle tick.
        assert!(!queue.flush_if_ready(&mut surface));
    }

    #[test]
    fn later_request_overwrites_the_earlier_one() {
        let mut queue = DeferredPositioningQueue::new();
        let mut surface = FakeSurface::default();

        queue.request(RecordId::new(3), vec![], &mut surface);
        queue.request(RecordId::new(8), vec![RecordId::new(8)], &mut surface);

        surface.ready = true;
        assert!(queue.flush_if_ready(&mut surface));
        assert_eq!(
            surface.position,
            Some((RecordId::new(8), vec![RecordId::new(8)]))
        );
    }

    #[test]
    fn zero_current_clears_immediately_and_drops_pending() {
        let mut queue = DeferredPositioningQueue::new();
        let mut surface = FakeSurface::default();

        queue.request(RecordId::new(3), vec![], &mut surface);
        let outcome = queue.request(RecordId::NONE, vec![], &mut surface);
        assert_eq!(outcome, RequestOutcome::Cleared);
        assert_eq!(surface.clears, 1);
        assert!(queue.pending().is_none());
    }

    #[test]
    fn abandoned_request_never_applies() {
        let mut queue = DeferredPositioningQueue::new();
        let mut surface = FakeSurface::default();

        queue.request(RecordId::new(3), vec![], &mut surface);
        queue.abandon();

        surface.ready = true;
        assert!(!queue.flush_if_ready(&mut surface));
        assert!(surface.position.is_none());
    }
}
