//! Byte / character offset conversion for a single line.
//!
//! Hosts report caret and selection columns as UTF-8 **byte offsets**, while rules and the
//! context handler must only ever cut a line on character boundaries. [`CharIndex`] maps between
//! the two spaces.
//!
//! A byte offset that falls inside a multi-byte character maps to the character *after* it, i.e.
//! the partially covered character counts as covered. This is what makes a host column pointing at
//! the second byte of `"あ"` select the whole character.

/// Precomputed character → byte table for one line of text.
#[derive(Debug, Clone)]
pub struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    /// Build the index for `text`.
    pub fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    /// Number of characters (code points) in the line.
    pub fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    /// Byte offset of the character at `char_offset` (clamped to the end of the line).
    pub fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .copied()
            .unwrap_or(self.text_len)
    }

    /// Character offset for `byte_offset` (clamped to the end of the line).
    pub fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }

    /// Round `byte_offset` up to the nearest character boundary.
    pub fn snap_byte(&self, byte_offset: usize) -> usize {
        self.char_to_byte(self.byte_to_char(byte_offset))
    }
}

/// Convert a character offset in `line` to a byte offset.
pub fn to_byte_offset(line: &str, char_offset: usize) -> usize {
    line.char_indices()
        .nth(char_offset)
        .map(|(b, _)| b)
        .unwrap_or(line.len())
}

/// Convert a byte offset in `line` to a character offset.
pub fn to_char_offset(line: &str, byte_offset: usize) -> usize {
    CharIndex::new(line).byte_to_char(byte_offset)
}

/// Replace `line[from..to]` (byte offsets on character boundaries) with `substitute`.
pub fn splice(line: &str, from: usize, to: usize, substitute: &str) -> String {
    let mut out = String::with_capacity(line.len() - (to - from) + substitute.len());
    out.push_str(&line[..from]);
    out.push_str(substitute);
    out.push_str(&line[to..]);
    out
}
