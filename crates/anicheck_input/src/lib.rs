use derive_more::Constructor;

pub mod buttons;
pub mod pointer;

/// A pair of values along the horizontal and vertical screen axes.
#[derive(Constructor, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Axial<T> {
    pub x: T,
    pub y: T,
}
