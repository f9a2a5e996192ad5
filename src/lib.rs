//! Mochi Edit Library
//!
//! A small terminal text editor in the kilo tradition, talking to the
//! terminal with raw VT100/xterm escape sequences and no curses library.
//!
//! - `tty`: raw mode, byte reads with an idle timeout, window size
//! - `input`: escape-sequence decoding into [`input::Key`]s
//! - `core`: lines, their rendered form and highlight tags
//! - `view`: cursor, scrolling and render-column mapping
//! - `search`: incremental search sessions
//! - `renderer`: frame assembly
//! - `storage`: loading and saving files
//! - `editor`: the controller tying it all together
//! - `app`: configuration, CLI arguments and logging
//! - `headless`: a scripted terminal for tests and benchmarks

pub mod app;
pub mod core;
pub mod editor;
pub mod headless;
pub mod input;
pub mod renderer;
pub mod search;
pub mod storage;
pub mod tty;
pub mod view;
