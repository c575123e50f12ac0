//! Pointer tracking and hover highlighting.

pub mod hover;
pub mod pointer;

pub use hover::{CursorStyle, HoverDetector, HoverOutcome};
pub use pointer::PointerState;
