use crate::status::CtmError;

pub const ANS_IO_BASE: u32 = 256;

/// Byte-wise rANS state writer. Bytes are emitted in encoding order and
/// consumed by [`AnsDecoder`] from the end, so symbols must be encoded in
/// reverse.
pub struct AnsCoder {
    pub buf: Vec<u8>,
    pub state: u32,
    pub l_base: u32,
}

impl AnsCoder {
    pub fn new(l_base: u32) -> Self {
        Self {
            buf: Vec::new(),
            state: l_base,
            l_base,
        }
    }

    /// Appends the final state (1 to 4 bytes, size tag in the top two bits
    /// of the last byte).
    pub fn write_end(&mut self) -> Result<usize, CtmError> {
        let state = self.state - self.l_base;
        if state < (1 << 6) {
            self.buf.push(state as u8);
        } else if state < (1 << 14) {
            self.buf.push((state & 0xFF) as u8);
            self.buf.push(((0x01 << 6) + ((state >> 8) & 0x3F)) as u8);
        } else if state < (1 << 22) {
            self.buf.push((state & 0xFF) as u8);
            self.buf.push(((state >> 8) & 0xFF) as u8);
            self.buf.push(((0x02 << 6) + ((state >> 16) & 0x3F)) as u8);
        } else if state < (1 << 30) {
            self.buf.push((state & 0xFF) as u8);
            self.buf.push(((state >> 8) & 0xFF) as u8);
            self.buf.push(((state >> 16) & 0xFF) as u8);
            self.buf.push(((0x03 << 6) + ((state >> 24) & 0x3F)) as u8);
        } else {
            return Err(CtmError::InternalError(format!(
                "ANS state is too large to be serialized: {}",
                state
            )));
        }
        Ok(self.buf.len())
    }

    pub fn data(&self) -> &[u8] {
        &self.buf
    }
}

pub struct AnsDecoder<'a> {
    pub buf: &'a [u8],
    pub buf_offset: usize,
    pub state: u32,
    pub l_base: u32,
}

impl<'a> AnsDecoder<'a> {
    /// Reads the final encoder state from the end of `buf`.
    pub fn read_init(buf: &'a [u8], l_base: u32) -> Result<Self, CtmError> {
        let truncated = || CtmError::LzmaError("truncated ANS state".into());
        let (&last, rest) = buf.split_last().ok_or_else(truncated)?;
        let extra = (last >> 6) as usize;
        if rest.len() < extra {
            return Err(truncated());
        }
        let mut state = (last & 0x3F) as u32;
        let mut buf_offset = rest.len();
        for _ in 0..extra {
            buf_offset -= 1;
            state = (state << 8) | buf[buf_offset] as u32;
        }
        let state = state + l_base;
        // The encoder never leaves [l_base, l_base * IO_BASE).
        if state >= l_base * ANS_IO_BASE {
            return Err(CtmError::LzmaError(format!("ANS state {} out of range", state)));
        }
        Ok(Self {
            buf,
            buf_offset,
            state,
            l_base,
        })
    }

    pub fn read_normalize(&mut self) {
        while self.state < self.l_base && self.buf_offset > 0 {
            self.buf_offset -= 1;
            self.state = (self.state * ANS_IO_BASE) | (self.buf[self.buf_offset] as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip_for_every_width() {
        let l_base = 1 << 14;
        for extra in [0u32, 100, 20_000, 3_000_000] {
            let mut coder = AnsCoder::new(l_base);
            coder.state = l_base + extra;
            coder.write_end().unwrap();
            let decoder = AnsDecoder::read_init(coder.data(), l_base).unwrap();
            assert_eq!(decoder.state, l_base + extra);
            assert_eq!(decoder.buf_offset, 0);
        }
    }

    #[test]
    fn test_read_init_rejects_bad_input() {
        assert!(AnsDecoder::read_init(&[], 1 << 14).is_err());
        // Tag says three extra bytes, only one present.
        assert!(AnsDecoder::read_init(&[0x00, 0xC0], 1 << 14).is_err());
        // Four-byte state far beyond l_base * 256.
        assert!(AnsDecoder::read_init(&[0xFF, 0xFF, 0xFF, 0xFF], 1 << 14).is_err());
    }
}
