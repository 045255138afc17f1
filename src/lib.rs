//! ansimirc - Convert ANSI art to mIRC art and back, or render either to PNG

pub mod ansi;
pub mod canvas;
pub mod color;
pub mod config;
pub mod font;
pub mod format;
pub mod mirc;
pub mod render;
pub mod sauce;

pub use canvas::Canvas;
pub use config::Config;
pub use format::{decode, detect_format, encode, DecodeError, DecodeOptions, EncodeOptions, Format};
