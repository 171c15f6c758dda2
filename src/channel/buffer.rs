//! Prompt buffer with tail-bounded substring search.
//!
//! Prompts always appear at the end of whatever the device has sent so
//! far, so only the last `search_depth` bytes are searched rather than
//! the entire accumulated output. For large captures this keeps prompt
//! polling cheap.

use bytes::BytesMut;
use memchr::memmem;

/// Buffer accumulating raw terminal output between prompt transitions.
///
/// Prompt detection is plain substring search over the buffer tail —
/// interactive terminals give no framing, and the trigger strings are
/// literal words from the device's login sequence, not patterns.
#[derive(Debug)]
pub struct PromptBuffer {
    /// The accumulated output.
    buffer: BytesMut,

    /// How many bytes from the end to search for prompt substrings.
    search_depth: usize,
}

impl PromptBuffer {
    /// Create a new prompt buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            search_depth,
        }
    }

    /// Append newly read bytes.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Search the buffer tail for a literal substring.
    pub fn contains(&self, needle: &str) -> bool {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        memmem::find(&self.buffer[start..], needle.as_bytes()).is_some()
    }

    /// Take the accumulated contents as text (lossy UTF-8) and reset.
    pub fn take_string(&mut self) -> String {
        let bytes = self.buffer.split();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Discard everything accumulated so far.
    ///
    /// Called on every prompt transition so stale bytes cannot
    /// re-trigger the next state's substring.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for PromptBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_contains() {
        let mut buffer = PromptBuffer::new(100);
        buffer.push(b"core-sw1 login\nUser");
        assert!(buffer.contains("User"));
        assert!(!buffer.contains("Password"));
    }

    #[test]
    fn test_contains_only_searches_tail() {
        let mut buffer = PromptBuffer::new(10);
        buffer.push(b"User");
        buffer.push(&[b'x'; 100]);
        // The trigger is outside the search window now.
        assert!(!buffer.contains("User"));
    }

    #[test]
    fn test_contains_spans_pushes() {
        let mut buffer = PromptBuffer::new(100);
        buffer.push(b"Pass");
        buffer.push(b"word: ");
        assert!(buffer.contains("Password"));
    }

    #[test]
    fn test_take_string_resets() {
        let mut buffer = PromptBuffer::new(100);
        buffer.push(b"some output");
        assert_eq!(buffer.take_string(), "some output");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_clear_discards_triggers() {
        let mut buffer = PromptBuffer::new(100);
        buffer.push(b"User");
        buffer.clear();
        assert!(!buffer.contains("User"));
        assert_eq!(buffer.len(), 0);
    }
}
