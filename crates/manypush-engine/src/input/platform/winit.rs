use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent};

use crate::input::{PointerBatch, PointerId, PointerSample, TouchEvent, MAX_POINTERS};

/// Platform id used for the emulated touch driven by the left mouse button.
pub const MOUSE_TOUCH_ID: u64 = u64::MAX;

#[derive(Debug, Copy, Clone)]
struct ActiveTouch {
    platform_id: u64,
    x: f32,
    y: f32,
}

/// Translates winit touch and mouse events into batch-style [`TouchEvent`]s.
///
/// winit reports each contact separately with an opaque `u64` id. This keeps the
/// latest position of every contact, assigns each one the lowest free dense slot id,
/// and emits moves that carry all active pointers.
///
/// Positions stay in physical pixels so they share a frame with the surface size.
#[derive(Debug, Default)]
pub struct TouchTranslator {
    slots: [Option<ActiveTouch>; MAX_POINTERS],
    cursor: Option<(f32, f32)>,
    mouse_down: bool,
}

impl TouchTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates a window event. Returns `None` for events that do not affect touches.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<TouchEvent> {
        match event {
            WindowEvent::Touch(Touch {
                phase, location, id, ..
            }) => {
                let (x, y) = to_f32(*location);
                self.touch(*phase, *id, x, y)
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = to_f32(*position);
                self.cursor = Some((x, y));
                if self.mouse_down {
                    self.touch(TouchPhase::Moved, MOUSE_TOUCH_ID, x, y)
                } else {
                    None
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.cursor.unwrap_or((0.0, 0.0));
                match state {
                    ElementState::Pressed if !self.mouse_down => {
                        self.mouse_down = true;
                        self.touch(TouchPhase::Started, MOUSE_TOUCH_ID, x, y)
                    }
                    ElementState::Released if self.mouse_down => {
                        self.mouse_down = false;
                        self.touch(TouchPhase::Ended, MOUSE_TOUCH_ID, x, y)
                    }
                    _ => None,
                }
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                if self.mouse_down {
                    self.mouse_down = false;
                    self.touch(TouchPhase::Cancelled, MOUSE_TOUCH_ID, 0.0, 0.0)
                } else {
                    None
                }
            }

            _ => None,
        }
    }

    /// Applies one platform contact update.
    pub fn touch(&mut self, phase: TouchPhase, platform_id: u64, x: f32, y: f32) -> Option<TouchEvent> {
        let existing = self.slot_of(platform_id);

        match (phase, existing) {
            (TouchPhase::Started, None) => {
                let Some(slot) = self.slots.iter().position(Option::is_none) else {
                    log::warn!("touch table full ({MAX_POINTERS} slots); ignoring contact {platform_id}");
                    return None;
                };
                self.slots[slot] = Some(ActiveTouch { platform_id, x, y });
                let sample = PointerSample::new(slot, x, y);
                if self.active_count() == 1 {
                    Some(TouchEvent::Down(sample))
                } else {
                    Some(TouchEvent::PointerDown(sample))
                }
            }

            (TouchPhase::Started | TouchPhase::Moved, Some(slot)) => {
                if let Some(t) = self.slots[slot].as_mut() {
                    t.x = x;
                    t.y = y;
                }
                Some(TouchEvent::Move(self.batch()))
            }

            (TouchPhase::Ended, Some(slot)) => {
                self.slots[slot] = None;
                if self.active_count() > 0 {
                    Some(TouchEvent::PointerUp(slot))
                } else {
                    Some(TouchEvent::Up(slot))
                }
            }

            (TouchPhase::Cancelled, Some(slot)) => {
                self.slots[slot] = None;
                if self.active_count() > 0 {
                    Some(TouchEvent::PointerUp(slot))
                } else {
                    Some(TouchEvent::Cancel)
                }
            }

            // Moves or lifts for contacts we never admitted (table was full).
            (_, None) => None,
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    fn slot_of(&self, platform_id: u64) -> Option<PointerId> {
        self.slots
            .iter()
            .position(|s| s.is_some_and(|t| t.platform_id == platform_id))
    }

    fn batch(&self) -> PointerBatch {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, s)| s.map(|t| PointerSample::new(id, t.x, t.y)))
            .collect()
    }
}

fn to_f32(pos: PhysicalPosition<f64>) -> (f32, f32) {
    (pos.x as f32, pos.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_contact_is_down_then_pointer_down() {
        let mut tr = TouchTranslator::new();
        assert_eq!(
            tr.touch(TouchPhase::Started, 77, 1.0, 2.0),
            Some(TouchEvent::Down(PointerSample::new(0, 1.0, 2.0)))
        );
        assert_eq!(
            tr.touch(TouchPhase::Started, 12, 3.0, 4.0),
            Some(TouchEvent::PointerDown(PointerSample::new(1, 3.0, 4.0)))
        );
    }

    #[test]
    fn move_carries_every_active_pointer() {
        let mut tr = TouchTranslator::new();
        tr.touch(TouchPhase::Started, 10, 1.0, 1.0);
        tr.touch(TouchPhase::Started, 20, 2.0, 2.0);
        tr.touch(TouchPhase::Started, 30, 3.0, 3.0);

        let Some(TouchEvent::Move(batch)) = tr.touch(TouchPhase::Moved, 20, 9.0, 9.0) else {
            panic!("expected a move batch");
        };
        assert_eq!(
            batch.as_slice(),
            &[
                PointerSample::new(0, 1.0, 1.0),
                PointerSample::new(1, 9.0, 9.0),
                PointerSample::new(2, 3.0, 3.0),
            ]
        );
    }

    #[test]
    fn lift_reports_pointer_up_then_up() {
        let mut tr = TouchTranslator::new();
        tr.touch(TouchPhase::Started, 10, 1.0, 1.0);
        tr.touch(TouchPhase::Started, 20, 2.0, 2.0);
        assert_eq!(tr.touch(TouchPhase::Ended, 10, 0.0, 0.0), Some(TouchEvent::PointerUp(0)));
        assert_eq!(tr.touch(TouchPhase::Ended, 20, 0.0, 0.0), Some(TouchEvent::Up(1)));
        assert_eq!(tr.active_count(), 0);
    }

    #[test]
    fn freed_slot_is_reused_lowest_first() {
        let mut tr = TouchTranslator::new();
        tr.touch(TouchPhase::Started, 10, 1.0, 1.0);
        tr.touch(TouchPhase::Started, 20, 2.0, 2.0);
        tr.touch(TouchPhase::Ended, 10, 0.0, 0.0);
        assert_eq!(
            tr.touch(TouchPhase::Started, 30, 5.0, 5.0),
            Some(TouchEvent::PointerDown(PointerSample::new(0, 5.0, 5.0)))
        );
    }

    #[test]
    fn cancel_of_last_contact_cancels_gesture() {
        let mut tr = TouchTranslator::new();
        tr.touch(TouchPhase::Started, 10, 1.0, 1.0);
        assert_eq!(tr.touch(TouchPhase::Cancelled, 10, 0.0, 0.0), Some(TouchEvent::Cancel));
    }

    #[test]
    fn contacts_beyond_capacity_are_ignored() {
        let mut tr = TouchTranslator::new();
        for id in 0..MAX_POINTERS as u64 {
            assert!(tr.touch(TouchPhase::Started, id, 0.0, 0.0).is_some());
        }
        assert_eq!(tr.touch(TouchPhase::Started, 999, 0.0, 0.0), None);
        assert_eq!(tr.touch(TouchPhase::Moved, 999, 1.0, 1.0), None);
        assert_eq!(tr.touch(TouchPhase::Ended, 999, 1.0, 1.0), None);
    }

    #[test]
    fn unknown_contact_lift_is_ignored() {
        let mut tr = TouchTranslator::new();
        assert_eq!(tr.touch(TouchPhase::Ended, 5, 0.0, 0.0), None);
    }

    #[test]
    fn left_mouse_button_emulates_a_touch() {
        let device_id = winit::event::DeviceId::dummy();
        let mut tr = TouchTranslator::new();

        let hover = WindowEvent::CursorMoved {
            device_id,
            position: PhysicalPosition::new(10.0, 20.0),
        };
        assert_eq!(tr.translate(&hover), None);

        let press = WindowEvent::MouseInput {
            device_id,
            state: ElementState::Pressed,
            button: MouseButton::Left,
        };
        assert_eq!(
            tr.translate(&press),
            Some(TouchEvent::Down(PointerSample::new(0, 10.0, 20.0)))
        );

        let drag = WindowEvent::CursorMoved {
            device_id,
            position: PhysicalPosition::new(30.0, 40.0),
        };
        let Some(TouchEvent::Move(batch)) = tr.translate(&drag) else {
            panic!("expected a move batch");
        };
        assert_eq!(batch.as_slice(), &[PointerSample::new(0, 30.0, 40.0)]);

        let release = WindowEvent::MouseInput {
            device_id,
            state: ElementState::Released,
            button: MouseButton::Left,
        };
        assert_eq!(tr.translate(&release), Some(TouchEvent::Up(0)));
        assert_eq!(tr.active_count(), 0);
    }
}
