//! Channel layer for interactive output accumulation.
//!
//! This module owns the buffer that collects raw terminal bytes and the
//! tail-bounded substring search used for prompt detection.

mod buffer;

pub use buffer::PromptBuffer;
