//! Per-frame input gathered from window events.
//!
//! The event loop feeds winit events into [`InputState`]; once per frame
//! [`InputState::frame`] drains the accumulated deltas into a [`FrameInput`]
//! that the director consumes. Nothing here is global: the shading override
//! travels with the frame.

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::gfx::uniforms::ShadingLayer;

/// Everything one frame of animation depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Seconds since start
    pub time: f32,
    /// Cursor motion since the previous frame, in pixels
    pub cursor_delta: (f32, f32),
    /// Scroll since the previous frame, in lines; positive is up
    pub scroll: f32,
    /// Forces every object's shading layer while set
    pub shading_override: Option<ShadingLayer>,
}

/// Number keys 1-5 force a shading layer while held.
///
/// With several keys down the most recently pressed one wins; releasing it
/// falls back to the latest key still held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadingKeys {
    /// Held layers, oldest press first
    held: Vec<ShadingLayer>,
}

impl ShadingKeys {
    pub fn layer_for_key(code: KeyCode) -> Option<ShadingLayer> {
        match code {
            KeyCode::Digit1 => Some(ShadingLayer::BlinnPhong),
            KeyCode::Digit2 => Some(ShadingLayer::NormalMap),
            KeyCode::Digit3 => Some(ShadingLayer::TextureMap),
            KeyCode::Digit4 => Some(ShadingLayer::TexturedFlat),
            KeyCode::Digit5 => Some(ShadingLayer::TexturedShaded),
            _ => None,
        }
    }

    /// Returns whether the key was one of ours. Key repeat re-presses are
    /// ignored.
    pub fn handle_key(&mut self, code: KeyCode, state: ElementState) -> bool {
        let Some(layer) = Self::layer_for_key(code) else {
            return false;
        };
        match state {
            ElementState::Pressed => {
                if !self.held.contains(&layer) {
                    self.held.push(layer);
                }
            }
            ElementState::Released => self.held.retain(|&held| held != layer),
        }
        true
    }

    pub fn process_keyed_event(&mut self, event: &KeyEvent) -> bool {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.handle_key(code, event.state)
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<ShadingLayer> {
        self.held.last().copied()
    }
}

/// Accumulates device events between frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub shading_keys: ShadingKeys,
    cursor_delta: (f32, f32),
    scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::MouseMotion { delta } => {
                self.cursor_delta.0 += delta.0 as f32;
                self.cursor_delta.1 += delta.1 as f32;
            }
            DeviceEvent::MouseWheel { delta } => {
                self.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, lines) => *lines,
                    // roughly one line per 20 pixels
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 20.0,
                };
            }
            _ => (),
        }
    }

    pub fn process_keyed_event(&mut self, event: &KeyEvent) -> bool {
        self.shading_keys.process_keyed_event(event)
    }

    /// Builds the frame's input and resets the accumulated deltas.
    pub fn frame(&mut self, time: f32) -> FrameInput {
        let input = FrameInput {
            time,
            cursor_delta: self.cursor_delta,
            scroll: self.scroll,
            shading_override: self.shading_keys.current(),
        };
        self.cursor_delta = (0.0, 0.0);
        self.scroll = 0.0;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_sets_release_clears() {
        let mut keys = ShadingKeys::default();
        assert!(keys.handle_key(KeyCode::Digit4, ElementState::Pressed));
        assert_eq!(keys.current(), Some(ShadingLayer::TexturedFlat));
        assert!(keys.handle_key(KeyCode::Digit4, ElementState::Released));
        assert_eq!(keys.current(), None);
    }

    #[test]
    fn test_release_falls_back_to_held_key() {
        let mut keys = ShadingKeys::default();
        keys.handle_key(KeyCode::Digit2, ElementState::Pressed);
        keys.handle_key(KeyCode::Digit4, ElementState::Pressed);
        assert_eq!(keys.current(), Some(ShadingLayer::TexturedFlat));
        keys.handle_key(KeyCode::Digit4, ElementState::Released);
        assert_eq!(keys.current(), Some(ShadingLayer::NormalMap));

        // releasing an older key keeps the newer one
        keys.handle_key(KeyCode::Digit5, ElementState::Pressed);
        keys.handle_key(KeyCode::Digit2, ElementState::Released);
        assert_eq!(keys.current(), Some(ShadingLayer::TexturedShaded));
        keys.handle_key(KeyCode::Digit5, ElementState::Released);
        assert_eq!(keys.current(), None);
    }

    #[test]
    fn test_key_repeat_does_not_stack() {
        let mut keys = ShadingKeys::default();
        keys.handle_key(KeyCode::Digit3, ElementState::Pressed);
        keys.handle_key(KeyCode::Digit3, ElementState::Pressed);
        keys.handle_key(KeyCode::Digit3, ElementState::Released);
        assert_eq!(keys.current(), None);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut keys = ShadingKeys::default();
        keys.handle_key(KeyCode::Digit2, ElementState::Pressed);
        assert!(!keys.handle_key(KeyCode::KeyG, ElementState::Pressed));
        assert_eq!(keys.current(), Some(ShadingLayer::NormalMap));
    }

    #[test]
    fn test_frame_drains_deltas() {
        let mut state = InputState::new();
        state.process_device_event(&DeviceEvent::MouseMotion { delta: (3.0, -2.0) });
        state.process_device_event(&DeviceEvent::MouseMotion { delta: (1.0, 0.0) });
        state.process_device_event(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 2.0),
        });
        let first = state.frame(0.5);
        assert_eq!(first.cursor_delta, (4.0, -2.0));
        assert_eq!(first.scroll, 2.0);
        assert_eq!(first.time, 0.5);

        let second = state.frame(0.6);
        assert_eq!(second.cursor_delta, (0.0, 0.0));
        assert_eq!(second.scroll, 0.0);
    }
}
