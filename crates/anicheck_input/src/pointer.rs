use strum::EnumCount;

use crate::{
    buttons::{words_for, ButtonAction, ButtonIndex, ButtonState},
    Axial,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumCount)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

const WORDS: usize = words_for(PointerButton::COUNT);

impl ButtonIndex for PointerButton {
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Button(PointerButton, ButtonAction),
    Move,
    /// The pointer left the canvas. Any pressed button is considered released.
    Leave,
    /// Pixel amounts scrolled horizontally and vertically.
    Wheel(Axial<f32>),
}

/// A single pointer event as delivered by the host, keeping the coordinate
/// of the place where the event took place in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub coordinate: Axial<f32>,
    pub action: PointerAction,
}

impl PointerEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            coordinate: Axial::new(x, y),
            action: PointerAction::Button(PointerButton::Primary, ButtonAction::Down),
        }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self {
            coordinate: Axial::new(x, y),
            action: PointerAction::Button(PointerButton::Primary, ButtonAction::Up),
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            coordinate: Axial::new(x, y),
            action: PointerAction::Move,
        }
    }

    pub fn leave(x: f32, y: f32) -> Self {
        Self {
            coordinate: Axial::new(x, y),
            action: PointerAction::Leave,
        }
    }

    pub fn wheel(dx: f32, dy: f32) -> Self {
        Self {
            coordinate: Axial::default(),
            action: PointerAction::Wheel(Axial::new(dx, dy)),
        }
    }
}

#[derive(Default)]
pub struct Pointer {
    /// Button states
    pub buttons: ButtonState<PointerButton, WORDS>,

    /// Current cursor position in pixels relative to the canvas
    pub position: Axial<f32>,

    /// The coordinate difference between the last two events in pixels
    pub motion: Axial<f32>,

    /// Wheel amounts accumulated since the last flush
    pub wheel: Axial<f32>,
}

impl Pointer {
    pub fn handle(&mut self, event: &PointerEvent) {
        match event.action {
            PointerAction::Button(button, action) => {
                self.buttons.apply(button, action);
                self.move_to(event.coordinate);
            }
            PointerAction::Move => self.move_to(event.coordinate),
            PointerAction::Leave => {
                self.buttons.release_all();
                self.move_to(event.coordinate);
            }
            PointerAction::Wheel(delta) => {
                self.wheel.x += delta.x;
                self.wheel.y += delta.y;
            }
        }
    }

    /// Remembers the current button state and resets per-frame deltas.
    pub fn flush(&mut self) {
        self.buttons.end_frame();
        self.motion = Axial::default();
        self.wheel = Axial::default();
    }

    fn move_to(&mut self, coordinate: Axial<f32>) {
        self.motion = Axial::new(
            coordinate.x - self.position.x,
            coordinate.y - self.position.y,
        );
        self.position = coordinate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_press_and_release() {
        let mut pointer = Pointer::default();
        pointer.handle(&PointerEvent::down(10., 20.));

        assert!(pointer.buttons.is_held(PointerButton::Primary));
        assert!(pointer.buttons.just_pressed(PointerButton::Primary));
        assert_eq!(pointer.position, Axial::new(10., 20.));

        pointer.flush();
        assert!(!pointer.buttons.just_pressed(PointerButton::Primary));

        pointer.handle(&PointerEvent::up(12., 20.));
        assert!(pointer.buttons.just_released(PointerButton::Primary));
        assert_eq!(pointer.motion, Axial::new(2., 0.));
    }

    #[test]
    fn test_leave_releases_buttons() {
        let mut pointer = Pointer::default();
        pointer.handle(&PointerEvent::down(0., 0.));
        pointer.handle(&PointerEvent::leave(-5., 3.));

        assert!(!pointer.buttons.any_held());
        assert_eq!(pointer.position, Axial::new(-5., 3.));
    }

    #[test]
    fn test_wheel_accumulates_until_flush() {
        let mut pointer = Pointer::default();
        pointer.handle(&PointerEvent::wheel(0., 30.));
        pointer.handle(&PointerEvent::wheel(0., 15.));
        assert_eq!(pointer.wheel, Axial::new(0., 45.));

        pointer.flush();
        assert_eq!(pointer.wheel, Axial::default());
    }
}
