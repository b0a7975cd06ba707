use super::error::InputError;
use super::snapshot::{PointerSlot, PointerSnapshot};
use super::types::{PointerId, PointerSample, TouchEvent, MAX_POINTERS};

/// Outcome of applying one touch event.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ApplyReport {
    /// Slots written by the event.
    pub updated: usize,
    /// Samples discarded because their id was out of range.
    pub dropped: usize,
}

/// Turns a stream of touch events into a dense, index-stable pointer table.
///
/// Owned by the input context. The render context only ever sees copies produced
/// by [`PointerTracker::snapshot`].
#[derive(Debug, Clone)]
pub struct PointerTracker {
    slots: [PointerSlot; MAX_POINTERS],
    events_applied: u64,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            slots: [PointerSlot::CLEARED; MAX_POINTERS],
            events_applied: 0,
        }
    }

    fn check(id: PointerId) -> Result<(), InputError> {
        if id < MAX_POINTERS {
            Ok(())
        } else {
            Err(InputError::OutOfRange {
                id,
                capacity: MAX_POINTERS,
            })
        }
    }

    /// Records a pointer going down at `(x, y)`.
    pub fn on_pointer_down(&mut self, id: PointerId, x: f32, y: f32) -> Result<(), InputError> {
        Self::check(id)?;
        self.slots[id] = PointerSlot::active(x, y);
        Ok(())
    }

    /// Overwrites the position of pointer `id`.
    pub fn on_pointer_move(&mut self, id: PointerId, x: f32, y: f32) -> Result<(), InputError> {
        Self::check(id)?;
        self.slots[id] = PointerSlot::active(x, y);
        Ok(())
    }

    /// Retracts pointer `id`.
    ///
    /// The slot is parked when another pointer is still down and cleared when it was
    /// the last one.
    pub fn on_pointer_up(&mut self, id: PointerId) -> Result<(), InputError> {
        Self::check(id)?;
        let others_active = self
            .slots
            .iter()
            .enumerate()
            .any(|(i, s)| i != id && s.is_active());

        self.slots[id] = if others_active {
            PointerSlot::PARKED
        } else {
            PointerSlot::CLEARED
        };
        Ok(())
    }

    /// Retracts every slot; no pointer remains down after a cancelled gesture.
    pub fn on_cancel(&mut self) {
        self.slots = [PointerSlot::CLEARED; MAX_POINTERS];
    }

    /// Applies one event. Out-of-range samples are logged and dropped.
    ///
    /// A move batch writes every in-range sample it carries before returning, so a
    /// snapshot taken afterwards never mixes two batches.
    pub fn apply(&mut self, event: &TouchEvent) -> ApplyReport {
        let mut report = ApplyReport::default();

        let record = |r: Result<(), InputError>, report: &mut ApplyReport| match r {
            Ok(()) => report.updated += 1,
            Err(e) => {
                log::debug!("dropping {} sample: {e}", event.action());
                report.dropped += 1;
            }
        };

        match event {
            TouchEvent::Down(PointerSample { id, x, y })
            | TouchEvent::PointerDown(PointerSample { id, x, y }) => {
                record(self.on_pointer_down(*id, *x, *y), &mut report);
            }
            TouchEvent::Move(batch) => {
                for PointerSample { id, x, y } in batch {
                    record(self.on_pointer_move(*id, *x, *y), &mut report);
                }
            }
            TouchEvent::PointerUp(id) | TouchEvent::Up(id) => {
                record(self.on_pointer_up(*id), &mut report);
            }
            TouchEvent::Cancel => {
                self.on_cancel();
                report.updated = MAX_POINTERS;
            }
        }

        self.events_applied += 1;
        report
    }

    /// Fixed-size copy of the current table.
    #[inline]
    pub fn snapshot(&self) -> PointerSnapshot {
        PointerSnapshot::new(self.slots, self.events_applied)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use smallvec::smallvec;

    use super::*;
    use crate::input::snapshot::{Pointer, SlotPhase, CLEARED_POSITION, PARKED_POSITION};
    use crate::input::PointerBatch;

    fn sample(id: PointerId, x: f32, y: f32) -> PointerSample {
        PointerSample::new(id, x, y)
    }

    // ── down / up ────────────────────────────────────────────────────────

    #[test]
    fn starts_fully_cleared() {
        let t = PointerTracker::new();
        let snap = t.snapshot();
        assert!(snap.slots().iter().all(|s| *s == PointerSlot::CLEARED));
        assert_eq!(snap.active_count(), 0);
        assert_eq!(snap.sequence(), 0);
    }

    #[test]
    fn down_records_position() {
        let mut t = PointerTracker::new();
        t.on_pointer_down(3, 10.0, 20.0).unwrap();
        let slot = t.snapshot().slots()[3];
        assert_eq!(slot.position, Vec2::new(10.0, 20.0));
        assert_eq!(slot.phase, SlotPhase::Active);
    }

    #[test]
    fn out_of_range_is_rejected_and_table_unchanged() {
        let mut t = PointerTracker::new();
        let before = t.snapshot();
        let err = t.on_pointer_down(MAX_POINTERS, 1.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            InputError::OutOfRange {
                id: MAX_POINTERS,
                capacity: MAX_POINTERS
            }
        );
        assert_eq!(t.snapshot().slots(), before.slots());
        assert!(t.on_pointer_up(99).is_err());
    }

    #[test]
    fn lifting_last_pointer_clears_slot() {
        let mut t = PointerTracker::new();
        t.apply(&TouchEvent::Down(sample(2, 50.0, 60.0)));
        t.apply(&TouchEvent::Up(2));
        let slot = t.snapshot().slots()[2];
        assert_eq!(slot.position, CLEARED_POSITION);
        assert_eq!(slot.phase, SlotPhase::Cleared);
    }

    #[test]
    fn lifting_with_others_down_parks_slot() {
        let mut t = PointerTracker::new();
        t.apply(&TouchEvent::Down(sample(0, 5.0, 5.0)));
        t.apply(&TouchEvent::PointerDown(sample(2, 50.0, 60.0)));
        t.apply(&TouchEvent::PointerUp(2));

        let snap = t.snapshot();
        assert_eq!(snap.slots()[2].position, PARKED_POSITION);
        assert_eq!(snap.slots()[2].phase, SlotPhase::Parked);
        assert!(snap.slots()[0].is_active());
    }

    #[test]
    fn pointer_view_reports_sentinels_and_active_flag() {
        let mut t = PointerTracker::new();
        t.apply(&TouchEvent::Down(sample(0, 5.0, 7.0)));
        t.apply(&TouchEvent::PointerDown(sample(1, 50.0, 60.0)));
        t.apply(&TouchEvent::PointerUp(1));

        let pointers: Vec<Pointer> = t.snapshot().pointers().collect();
        assert_eq!(pointers.len(), MAX_POINTERS);
        assert_eq!(pointers[0], Pointer { id: 0, x: 5.0, y: 7.0, active: true });
        assert_eq!(pointers[1], Pointer { id: 1, x: 0.0, y: 0.0, active: false });
        assert_eq!(pointers[2], Pointer { id: 2, x: -1.0, y: -1.0, active: false });
        assert!(pointers.iter().enumerate().all(|(i, p)| p.id == i));
    }

    #[test]
    fn retraction_follows_live_state_not_action_kind() {
        // An `Up` while another slot is active still parks.
        let mut t = PointerTracker::new();
        t.apply(&TouchEvent::Down(sample(0, 5.0, 5.0)));
        t.apply(&TouchEvent::PointerDown(sample(1, 6.0, 6.0)));
        t.apply(&TouchEvent::Up(1));
        assert_eq!(t.snapshot().slots()[1].phase, SlotPhase::Parked);
    }

    #[test]
    fn touch_at_origin_is_still_active() {
        let mut t = PointerTracker::new();
        t.apply(&TouchEvent::Down(sample(0, 0.0, 0.0)));
        let snap = t.snapshot();
        assert_eq!(snap.slots()[0].position, PARKED_POSITION);
        assert!(snap.slots()[0].is_active());
        assert_eq!(snap.active().count(), 1);
    }

    #[test]
    fn cancel_clears_everything() {
        let mut t = PointerTracker::new();
        t.apply(&TouchEvent::Down(sample(0, 5.0, 5.0)));
        t.apply(&TouchEvent::PointerDown(sample(4, 6.0, 6.0)));
        t.apply(&TouchEvent::Cancel);
        assert_eq!(t.active_count(), 0);
        assert!(t.snapshot().slots().iter().all(|s| *s == PointerSlot::CLEARED));
    }

    // ── move batches ─────────────────────────────────────────────────────

    #[test]
    fn move_batch_updates_every_present_slot() {
        let mut t = PointerTracker::new();
        t.apply(&TouchEvent::Down(sample(0, 1.0, 1.0)));
        t.apply(&TouchEvent::PointerDown(sample(1, 2.0, 2.0)));
        t.apply(&TouchEvent::PointerDown(sample(2, 3.0, 3.0)));

        let report = t.apply(&TouchEvent::Move(smallvec![
            sample(0, 10.0, 11.0),
            sample(1, 20.0, 21.0),
            sample(2, 30.0, 31.0),
        ]));
        assert_eq!(report, ApplyReport { updated: 3, dropped: 0 });

        let snap = t.snapshot();
        assert_eq!(snap.slots()[0].position, Vec2::new(10.0, 11.0));
        assert_eq!(snap.slots()[1].position, Vec2::new(20.0, 21.0));
        assert_eq!(snap.slots()[2].position, Vec2::new(30.0, 31.0));
    }

    #[test]
    fn move_batch_leaves_absent_slots_alone() {
        let mut t = PointerTracker::new();
        t.apply(&TouchEvent::Down(sample(0, 1.0, 1.0)));
        t.apply(&TouchEvent::PointerDown(sample(1, 2.0, 2.0)));
        t.apply(&TouchEvent::PointerDown(sample(5, 7.0, 8.0)));
        t.apply(&TouchEvent::PointerUp(1));

        let before = t.snapshot();
        t.apply(&TouchEvent::Move(smallvec![sample(0, 100.0, 100.0)]));
        let after = t.snapshot();

        for id in 1..MAX_POINTERS {
            assert_eq!(after.slots()[id], before.slots()[id], "slot {id} changed");
        }
        assert_eq!(after.slots()[0].position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn move_batch_drops_only_out_of_range_samples() {
        let mut t = PointerTracker::new();
        let report = t.apply(&TouchEvent::Move(smallvec![
            sample(0, 1.0, 2.0),
            sample(MAX_POINTERS + 3, 9.0, 9.0),
            sample(1, 3.0, 4.0),
        ]));
        assert_eq!(report, ApplyReport { updated: 2, dropped: 1 });
        assert_eq!(t.active_count(), 2);
    }

    #[test]
    fn batch_property_over_scripted_sequence() {
        // Deterministic pseudo-random script of down/move/up events; after every
        // move, present slots match the batch and absent slots are untouched.
        let mut t = PointerTracker::new();
        let mut seed: u32 = 0x1234_5678;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed
        };

        for _ in 0..2_000 {
            let id = (next() as usize) % MAX_POINTERS;
            match next() % 3 {
                0 => {
                    t.apply(&TouchEvent::PointerDown(sample(id, 1.0, 1.0)));
                }
                1 => {
                    let before = t.snapshot();
                    let mut batch = PointerBatch::new();
                    for i in 0..MAX_POINTERS {
                        if next() % 2 == 0 {
                            batch.push(sample(i, (next() % 1000) as f32, (next() % 1000) as f32));
                        }
                    }
                    t.apply(&TouchEvent::Move(batch.clone()));
                    let after = t.snapshot();
                    for i in 0..MAX_POINTERS {
                        match batch.iter().find(|s| s.id == i) {
                            Some(s) => {
                                assert_eq!(after.slots()[i].position, Vec2::new(s.x, s.y));
                                assert!(after.slots()[i].is_active());
                            }
                            None => assert_eq!(after.slots()[i], before.slots()[i]),
                        }
                    }
                }
                _ => {
                    t.apply(&TouchEvent::PointerUp(id));
                }
            }
        }
    }

    #[test]
    fn sequence_counts_applied_events() {
        let mut t = PointerTracker::new();
        t.apply(&TouchEvent::Down(sample(0, 1.0, 1.0)));
        t.apply(&TouchEvent::Move(smallvec![sample(0, 2.0, 2.0)]));
        t.apply(&TouchEvent::Up(0));
        assert_eq!(t.snapshot().sequence(), 3);
    }
}
