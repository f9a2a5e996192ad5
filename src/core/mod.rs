//! Buffer Core Module
//!
//! Platform-independent text state. This module contains:
//! - Lines with their rendered (tab-expanded) form
//! - Per-character highlight tags
//! - The buffer: an ordered list of lines with a dirty flag
//!
//! Rendering of a line is recomputed in full on every change, so the
//! rendered form and its tags can never drift from the stored text.

mod buffer;
mod highlight;
mod line;

pub use buffer::Buffer;
pub use highlight::{Highlight, DEFAULT_FG};
pub use line::{Line, DEFAULT_TAB_STOP};
