use derive_more::{Deref, DerefMut};

/// A queue of notifications produced by the inspector for whoever drives
/// the user interface. The owner is expected to drain it after each
/// handled input or command.
#[derive(Debug, Deref, DerefMut)]
pub struct Events<E>(Vec<E>);

impl<E> Default for Events<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<E> Events<E> {
    pub fn send(&mut self, event: E) {
        self.0.push(event);
    }

    /// Takes every pending event, leaving the queue empty.
    pub fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.0)
    }
}
