//! Range replacement on text buffers addressed in UTF-16 code units.
//!
//! Editing surfaces report caret and selection offsets in UTF-16 units, so
//! every offset handed to this module is converted to a byte index before the
//! string is touched. Offsets that land past the end of the buffer or between
//! the two halves of a surrogate pair are rejected instead of clamped.

use crate::error::SpliceError;

use super::types::TextRange;

pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Converts a UTF-16 offset into a byte index into `s`.
pub fn byte_index(s: &str, offset: usize) -> Result<usize, SpliceError> {
    let mut units = 0;
    for (idx, ch) in s.char_indices() {
        if units == offset {
            return Ok(idx);
        }
        units += ch.len_utf16();
        if units > offset {
            return Err(SpliceError::SplitsCodePoint { offset });
        }
    }
    if units == offset {
        Ok(s.len())
    } else {
        Err(SpliceError::OutOfBounds { offset, len: units })
    }
}

/// Byte range for a half-open UTF-16 range, validating `from <= to <= len`.
pub fn byte_range(s: &str, range: TextRange) -> Result<std::ops::Range<usize>, SpliceError> {
    if range.from > range.to {
        return Err(SpliceError::Inverted {
            from: range.from,
            to: range.to,
        });
    }
    let start = byte_index(s, range.from)?;
    let end = byte_index(s, range.to)?;
    Ok(start..end)
}

pub fn slice(s: &str, range: TextRange) -> Result<&str, SpliceError> {
    let bytes = byte_range(s, range)?;
    Ok(&s[bytes])
}

/// `buffer[0:from) + text + buffer[to:)`.
pub fn splice(buffer: &str, from: usize, to: usize, text: &str) -> Result<String, SpliceError> {
    let bytes = byte_range(buffer, TextRange::new(from, to))?;
    let mut out = String::with_capacity(buffer.len() - bytes.len() + text.len());
    out.push_str(&buffer[..bytes.start]);
    out.push_str(text);
    out.push_str(&buffer[bytes.end..]);
    Ok(out)
}

/// True when `range` can be spliced into `buffer` as-is.
pub fn fits(buffer: &str, range: TextRange) -> bool {
    byte_range(buffer, range).is_ok()
}
