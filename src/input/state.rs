//! Input state management
//!
//! Polls mouse and touch (macroquad) once per frame and reduces them to a
//! single pointer with press/release edges, plus camera orbit and zoom.

use macroquad::prelude::*;

/// One frame of the primary pointer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub down: bool,
    /// Went down this frame
    pub pressed: bool,
    /// Went up this frame
    pub released: bool,
}

/// Raw device readings before edge detection
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPointer {
    pub x: f32,
    pub y: f32,
    pub down: bool,
    pub orbit_down: bool,
    pub wheel: f32,
}

/// Camera controls derived from the secondary button and wheel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    pub orbit_dx: f32,
    pub orbit_dy: f32,
    pub zoom: f32,
}

/// Tracks pointer state across frames
#[derive(Debug, Default)]
pub struct InputState {
    was_down: bool,
    last: (f32, f32),
    pointer: PointerSample,
    camera: CameraInput,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call once per frame before reading the pointer
    pub fn poll(&mut self) {
        self.advance(read_devices());
    }

    /// Fold one frame of raw readings into the tracked state
    pub fn advance(&mut self, raw: RawPointer) -> PointerSample {
        let pointer = PointerSample {
            x: raw.x,
            y: raw.y,
            down: raw.down,
            pressed: raw.down && !self.was_down,
            released: !raw.down && self.was_down,
        };

        self.camera = if raw.orbit_down {
            CameraInput {
                orbit_dx: raw.x - self.last.0,
                orbit_dy: raw.y - self.last.1,
                zoom: raw.wheel,
            }
        } else {
            CameraInput { zoom: raw.wheel, ..Default::default() }
        };

        self.was_down = raw.down;
        self.last = (raw.x, raw.y);
        self.pointer = pointer;
        pointer
    }

    pub fn pointer(&self) -> PointerSample {
        self.pointer
    }

    pub fn camera(&self) -> CameraInput {
        self.camera
    }
}

/// Mouse, with the first active touch taking precedence
fn read_devices() -> RawPointer {
    let (mx, my) = mouse_position();
    let (_, wheel) = mouse_wheel();
    let mut raw = RawPointer {
        x: mx,
        y: my,
        down: is_mouse_button_down(MouseButton::Left),
        orbit_down: is_mouse_button_down(MouseButton::Right),
        wheel,
    };

    if let Some(touch) = touches().into_iter().next() {
        raw.x = touch.position.x;
        raw.y = touch.position.y;
        raw.down = !matches!(touch.phase, TouchPhase::Ended | TouchPhase::Cancelled);
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(x: f32, y: f32, down: bool) -> RawPointer {
        RawPointer { x, y, down, ..Default::default() }
    }

    #[test]
    fn test_press_and_release_edges() {
        let mut input = InputState::new();

        let p = input.advance(raw(10.0, 10.0, true));
        assert!(p.pressed && p.down && !p.released);

        let p = input.advance(raw(12.0, 10.0, true));
        assert!(!p.pressed && p.down);

        let p = input.advance(raw(14.0, 10.0, false));
        assert!(p.released && !p.down);

        let p = input.advance(raw(14.0, 10.0, false));
        assert!(!p.released);
    }

    #[test]
    fn test_orbit_delta_only_while_held() {
        let mut input = InputState::new();
        input.advance(RawPointer { x: 100.0, y: 50.0, orbit_down: true, ..Default::default() });
        input.advance(RawPointer { x: 110.0, y: 45.0, orbit_down: true, wheel: 1.0, ..Default::default() });
        assert_eq!(input.camera(), CameraInput { orbit_dx: 10.0, orbit_dy: -5.0, zoom: 1.0 });

        input.advance(RawPointer { x: 200.0, y: 45.0, ..Default::default() });
        assert_eq!(input.camera().orbit_dx, 0.0);
    }
}
