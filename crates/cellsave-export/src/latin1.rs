//! Byte-string conversion.
//!
//! A byte string is a `String` whose every character has a code point
//! in `0..=255`, one character per byte.  Binary spreadsheet content
//! reaches the download action in this form because the producer
//! interface is string-based.
//!
//! [`to_bytes`] is strict: a character above `U+00FF` is an error, never
//! a truncated byte.

/// A character in a byte string does not fit in one byte.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ByteStringError {
    /// The character at `index` (counted in characters, not bytes)
    /// has a code point above `U+00FF`.
    #[error("character {character:?} at index {index} is outside the byte range 0-255")]
    OutOfRange {
        /// Character index into the input string.
        index: usize,
        /// The offending character.
        character: char,
    },
}

/// Convert a byte string into bytes.
///
/// Byte `i` of the output is the code point of character `i` of
/// `text`, so the output length equals `text.chars().count()`.
///
/// # Errors
///
/// Returns [`ByteStringError::OutOfRange`] for the first character
/// whose code point is above `U+00FF`.
///
/// # Examples
///
/// ```
/// use cellsave_export::latin1;
///
/// assert_eq!(latin1::to_bytes("\u{41}\u{42}").unwrap(), vec![0x41, 0x42]);
/// assert!(latin1::to_bytes("\u{100}").is_err());
/// ```
pub fn to_bytes(text: &str) -> Result<Vec<u8>, ByteStringError> {
    // Each char is at least one UTF-8 byte, so `len()` is an upper bound.
    let mut bytes = Vec::with_capacity(text.len());
    for (index, character) in text.chars().enumerate() {
        let byte =
            u8::try_from(u32::from(character)).map_err(|_| ByteStringError::OutOfRange {
                index,
                character,
            })?;
        bytes.push(byte);
    }
    Ok(bytes)
}

/// Convert bytes into a byte string.
///
/// The inverse of [`to_bytes`]: each byte becomes the character with the
/// same code point.  Producers use this to hand binary workbook data to
/// a spreadsheet download action.
#[must_use]
pub fn from_bytes(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
