//! Pointer drag to rotation.
//!
//! Horizontal travel turns the cubes about Y and vertical travel about X, at
//! [`DEFAULT_SENSITIVITY`] radians per pixel unless configured otherwise.

use glam::Vec2;
use winit::event::{ElementState, WindowEvent};

use crate::transform::RotationState;

/// Radians of rotation per pixel of pointer travel.
pub const DEFAULT_SENSITIVITY: f32 = 0.005;

/// What the caller should do after an input event was processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResponse {
    /// Nothing visible changed.
    Idle,
    /// Rotation changed; render right away instead of waiting for the next frame.
    RenderNow,
}

/// Drag tracking and the rotation it accumulates.
///
/// The render side reads [`InputState::rotation`]; everything else here is
/// private to the drag logic.
#[derive(Clone, Debug)]
pub struct InputState {
    /// Accumulated rotation. Z is never driven by input.
    pub rotation: RotationState,
    sensitivity: f32,
    dragging: bool,
    last_pointer: Vec2,
    cursor: Vec2,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVITY)
    }
}

impl InputState {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            rotation: RotationState::default(),
            sensitivity,
            dragging: false,
            last_pointer: Vec2::ZERO,
            cursor: Vec2::ZERO,
        }
    }

    /// Returns true while a pointer button is held.
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Starts a drag at `position`.
    pub fn pointer_down(&mut self, position: Vec2) {
        self.dragging = true;
        self.last_pointer = position;
        self.cursor = position;
    }

    /// Ends the current drag, if any.
    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Applies pointer motion. Only moves while dragging count.
    pub fn pointer_moved(&mut self, position: Vec2) -> InputResponse {
        self.cursor = position;
        if !self.dragging {
            return InputResponse::Idle;
        }

        let delta = position - self.last_pointer;
        self.rotation.x += self.sensitivity * delta.y;
        self.rotation.y += self.sensitivity * delta.x;
        self.last_pointer = position;

        InputResponse::RenderNow
    }

    /// Process a window event and update drag and rotation state.
    ///
    /// Any mouse button starts a drag. Button events carry no coordinates, so
    /// the last reported cursor position is used as the press point.
    pub fn handle_event(&mut self, event: &WindowEvent) -> InputResponse {
        match event {
            WindowEvent::MouseInput { state, .. } => {
                match state {
                    ElementState::Pressed => self.pointer_down(self.cursor),
                    ElementState::Released => self.pointer_up(),
                }
                InputResponse::Idle
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(Vec2::new(position.x as f32, position.y as f32))
            }
            _ => InputResponse::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::event::{DeviceId, MouseButton};

    #[test]
    fn horizontal_drag_turns_about_y() {
        let mut input = InputState::default();
        input.pointer_down(Vec2::new(0.0, 0.0));

        let response = input.pointer_moved(Vec2::new(100.0, 0.0));

        assert_eq!(response, InputResponse::RenderNow);
        assert_eq!(input.rotation.y, 0.5);
        assert_eq!(input.rotation.x, 0.0);
        assert_eq!(input.rotation.z, 0.0);
    }

    #[test]
    fn vertical_drag_turns_about_x() {
        let mut input = InputState::default();
        input.pointer_down(Vec2::new(10.0, 10.0));
        input.pointer_moved(Vec2::new(10.0, 30.0));

        assert!((input.rotation.x - 0.1).abs() < 1e-6);
        assert_eq!(input.rotation.y, 0.0);
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let mut input = InputState::default();
        let response = input.pointer_moved(Vec2::new(250.0, 80.0));

        assert_eq!(response, InputResponse::Idle);
        assert_eq!(input.rotation, RotationState::default());
    }

    #[test]
    fn release_stops_rotation() {
        let mut input = InputState::default();
        input.pointer_down(Vec2::ZERO);
        input.pointer_moved(Vec2::new(20.0, 0.0));
        input.pointer_up();
        let before = input.rotation;

        assert_eq!(input.pointer_moved(Vec2::new(200.0, 200.0)), InputResponse::Idle);
        assert_eq!(input.rotation, before);
        assert!(!input.dragging());
    }

    #[test]
    fn deltas_are_relative_to_last_move() {
        let mut input = InputState::new(0.01);
        input.pointer_down(Vec2::ZERO);
        input.pointer_moved(Vec2::new(10.0, 0.0));
        input.pointer_moved(Vec2::new(30.0, 0.0));

        // 10 px then 20 px, not 10 + 30
        assert!((input.rotation.y - 0.3).abs() < 1e-6);
    }

    #[test]
    fn rotation_accumulates_across_drags() {
        let mut input = InputState::default();
        for _ in 0..3 {
            input.pointer_down(Vec2::new(50.0, 50.0));
            input.pointer_moved(Vec2::new(150.0, 50.0));
            input.pointer_up();
        }
        assert!((input.rotation.y - 1.5).abs() < 1e-6);
    }

    fn cursor_moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: unsafe { DeviceId::dummy() },
            position: PhysicalPosition::new(x, y),
        }
    }

    fn mouse_button(state: ElementState, button: MouseButton) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: unsafe { DeviceId::dummy() },
            state,
            button,
        }
    }

    #[test]
    fn press_uses_last_cursor_position() {
        let mut input = InputState::default();
        assert_eq!(input.handle_event(&cursor_moved(10.0, 10.0)), InputResponse::Idle);
        assert_eq!(
            input.handle_event(&mouse_button(ElementState::Pressed, MouseButton::Right)),
            InputResponse::Idle
        );
        assert!(input.dragging());

        let response = input.handle_event(&cursor_moved(110.0, 10.0));

        assert_eq!(response, InputResponse::RenderNow);
        assert_eq!(input.rotation.y, 0.5);
        assert_eq!(input.rotation.x, 0.0);
    }

    #[test]
    fn button_release_ends_drag() {
        let mut input = InputState::default();
        input.handle_event(&cursor_moved(10.0, 10.0));
        input.handle_event(&mouse_button(ElementState::Pressed, MouseButton::Left));
        input.handle_event(&cursor_moved(10.0, 50.0));
        input.handle_event(&mouse_button(ElementState::Released, MouseButton::Left));
        let before = input.rotation;

        assert_eq!(input.handle_event(&cursor_moved(90.0, 90.0)), InputResponse::Idle);
        assert_eq!(input.rotation, before);
        assert!(!input.dragging());
    }

    #[test]
    fn unrelated_events_are_idle() {
        let mut input = InputState::default();
        input.pointer_down(Vec2::ZERO);
        assert_eq!(input.handle_event(&WindowEvent::Focused(false)), InputResponse::Idle);
        assert!(input.dragging());
    }
}
