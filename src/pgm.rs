//! Binary PGM (P5) grayscale reader/writer (spec §6.1, collaborator).
//!
//! Specified only at the format-boundary level: width must equal height,
//! both must be powers of two, `max_value` must not exceed 255, and
//! exactly one whitespace byte separates the max-value line from the pixel
//! data. Violations surface as format errors, distinct from I/O errors.

use std::io::{Read, Write};

use crate::error::{CodecError, Result};
use crate::raster::PixelBuffer;

/// Reads a binary P5 PGM image, validating it against the codec's
/// constraints (square, power-of-two side, 8-bit depth).
pub fn read(input: &mut impl Read) -> Result<PixelBuffer> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;
    let mut cursor = Cursor { bytes: &bytes, pos: 0 };

    let magic = cursor.take_token()?;
    if magic != "P5" {
        return Err(CodecError::format(format!(
            "expected PGM magic \"P5\", got {magic:?}"
        )));
    }
    let width: usize = cursor
        .take_token()?
        .parse()
        .map_err(|_| CodecError::format("malformed PGM width"))?;
    let height: usize = cursor
        .take_token()?
        .parse()
        .map_err(|_| CodecError::format("malformed PGM height"))?;
    let max_value: u32 = cursor
        .take_token()?
        .parse()
        .map_err(|_| CodecError::format("malformed PGM max value"))?;

    if width != height {
        return Err(CodecError::size(format!(
            "PGM is not square: {width}x{height}"
        )));
    }
    if width == 0 || !width.is_power_of_two() {
        return Err(CodecError::size(format!(
            "PGM side {width} is not a positive power of two"
        )));
    }
    if max_value > 255 {
        return Err(CodecError::size(format!(
            "PGM max value {max_value} exceeds 255"
        )));
    }

    // Exactly one whitespace byte follows the max-value token.
    if cursor.pos >= cursor.bytes.len() {
        return Err(CodecError::format("truncated PGM header"));
    }
    cursor.pos += 1;

    let pixel_count = width * height;
    let remaining = &cursor.bytes[cursor.pos..];
    if remaining.len() != pixel_count {
        return Err(CodecError::format(format!(
            "expected {pixel_count} pixel bytes, found {}",
            remaining.len()
        )));
    }

    PixelBuffer::new(width, remaining.to_vec())
}

/// Writes `buf` as a binary P5 PGM image.
pub fn write(buf: &PixelBuffer, out: &mut impl Write) -> Result<()> {
    let side = buf.side();
    out.write_all(format!("P5\n{side} {side}\n255\n").as_bytes())?;
    out.write_all(buf.data())?;
    Ok(())
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take_token(&mut self) -> Result<String> {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        let start = self.pos;
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(CodecError::format("truncated PGM header"));
        }
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }
}
