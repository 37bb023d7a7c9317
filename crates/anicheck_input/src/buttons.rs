use std::marker::PhantomData;

use bitvec::prelude::BitArray;

/// Number of `u32` words holding one bit per button.
pub const fn words_for(buttons: usize) -> usize {
    buttons.div_ceil(u32::BITS as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Down,
    Up,
}

/// Maps a button to its bit.
pub trait ButtonIndex: Copy {
    fn index(self) -> usize;
}

/// Which buttons are held now and which were held at the end of the
/// previous frame, so that presses and releases can be told apart from holds.
pub struct ButtonState<B, const WORDS: usize> {
    held: BitArray<[u32; WORDS]>,
    held_before: BitArray<[u32; WORDS]>,
    _button: PhantomData<B>,
}

impl<B, const WORDS: usize> Default for ButtonState<B, WORDS> {
    fn default() -> Self {
        Self {
            held: BitArray::ZERO,
            held_before: BitArray::ZERO,
            _button: PhantomData,
        }
    }
}

impl<B: ButtonIndex, const WORDS: usize> ButtonState<B, WORDS> {
    pub(crate) fn apply(&mut self, button: B, action: ButtonAction) {
        self.held.set(button.index(), action == ButtonAction::Down);
    }

    pub(crate) fn release_all(&mut self) {
        self.held = BitArray::ZERO;
    }

    pub(crate) fn end_frame(&mut self) {
        self.held_before = self.held;
    }

    pub fn is_held(&self, button: B) -> bool {
        self.held[button.index()]
    }

    /// Went down during this frame.
    pub fn just_pressed(&self, button: B) -> bool {
        let i = button.index();
        self.held[i] && !self.held_before[i]
    }

    /// Went up during this frame.
    pub fn just_released(&self, button: B) -> bool {
        let i = button.index();
        !self.held[i] && self.held_before[i]
    }

    pub fn any_held(&self) -> bool {
        self.held.any()
    }
}
