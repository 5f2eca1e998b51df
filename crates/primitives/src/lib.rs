//! Core data types shared across slidesync crates.
//!
//! Everything here is plain data plus the small amount of derivation logic
//! needed to turn a cursor location into a slide coordinate.

mod position;
mod selection;
mod slide;

pub use position::Position;
pub use selection::{CursorLocation, EditorId, Selection};
pub use slide::{Slide, SlideBoundaries};
