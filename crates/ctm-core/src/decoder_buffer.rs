use crate::status::CtmError;

/// Sequential reader over a packed stream block.
///
/// Every failure is reported as [`CtmError::LzmaError`]: a block that does
/// not parse is an entropy-coder fault, whatever the cause.
///
/// # Example
///
/// ```
/// use ctm_core::decoder_buffer::DecoderBuffer;
///
/// let data = [0x2A, 0xAC, 0x02];
/// let mut buffer = DecoderBuffer::new(&data);
///
/// assert_eq!(buffer.decode_u8().unwrap(), 0x2A);
/// assert_eq!(buffer.decode_varint().unwrap(), 300);
/// assert_eq!(buffer.remaining_size(), 0);
/// ```
pub struct DecoderBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DecoderBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current read position in bytes.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes remaining in the buffer.
    pub fn remaining_size(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn decode_u8(&mut self) -> Result<u8, CtmError> {
        let b = *self.data.get(self.pos).ok_or_else(|| end_of_block(1, 0))?;
        self.pos += 1;
        Ok(b)
    }

    /// Decodes a little-endian u32.
    pub fn decode_u32(&mut self) -> Result<u32, CtmError> {
        let bytes = self.decode_slice(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Decodes a LEB128 varint of at most 64 bits.
    pub fn decode_varint(&mut self) -> Result<u64, CtmError> {
        let mut val = 0u64;
        let mut shift = 0;
        loop {
            let b = self.decode_u8()?;
            if shift >= 64 || (shift == 63 && (b & 0x7F) > 1) {
                return Err(CtmError::LzmaError("varint overflows 64 bits".into()));
            }
            val |= ((b & 0x7F) as u64) << shift;
            if (b & 0x80) == 0 {
                break;
            }
            shift += 7;
        }
        Ok(val)
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn decode_slice(&mut self, len: usize) -> Result<&'a [u8], CtmError> {
        if len > self.remaining_size() {
            return Err(end_of_block(len, self.remaining_size()));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}

fn end_of_block(need: usize, have: usize) -> CtmError {
    CtmError::LzmaError(format!(
        "unexpected end of packed block: need {} bytes, have {}",
        need, have
    ))
}
