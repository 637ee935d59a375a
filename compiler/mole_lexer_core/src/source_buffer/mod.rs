//! Owned input chunk with a forward-only cursor.
//!
//! The scanner never sees more than one chunk at a time. Callers that feed
//! input in pieces replace the whole buffer between chunks and carry the
//! line/column/offset continuity through a snapshot, so the cursor here is
//! always relative to the start of the current chunk.
//!
//! # Invariant
//!
//! `pos` only moves forward and always sits on a UTF-8 character boundary
//! within `0..=text.len()`. Replacing the buffer is the only way to rewind.

/// Owned input chunk plus a cursor into it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
    /// Byte index of the next unread character.
    pos: usize,
}

impl SourceBuffer {
    /// Create a buffer positioned at the start of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        SourceBuffer {
            text: text.into(),
            pos: 0,
        }
    }

    /// The whole chunk, including the already-consumed prefix.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Cursor position (byte index into the chunk).
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The unread remainder of the chunk.
    #[inline]
    pub fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    /// The character under the cursor, if any.
    #[inline]
    pub fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Advance the cursor by `len` bytes.
    ///
    /// # Contract
    ///
    /// `len` must not run past the end of the chunk and must land on a
    /// character boundary. Match lengths reported by the scanner's matchers
    /// satisfy both.
    #[inline]
    pub fn advance(&mut self, len: usize) {
        debug_assert!(
            self.pos + len <= self.text.len(),
            "advance by {len} overruns chunk of {} bytes at {}",
            self.text.len(),
            self.pos
        );
        debug_assert!(
            self.text.is_char_boundary(self.pos + len),
            "advance by {len} splits a UTF-8 character"
        );
        self.pos += len;
    }

    /// Extract `start..end` of the chunk.
    ///
    /// Both bounds are byte indices into the chunk and must lie on
    /// character boundaries.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &str {
        debug_assert!(start <= end, "slice start {start} exceeds end {end}");
        &self.text[start..end]
    }
}
