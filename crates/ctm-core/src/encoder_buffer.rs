/// In-memory byte sink used while building packed streams, before their
/// final size is known and they can be written to the output stream.
#[derive(Debug, Clone, Default)]
pub struct EncoderBuffer {
    buffer: Vec<u8>,
}

impl EncoderBuffer {
    /// Create a new empty encoder buffer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a buffer with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Get the current buffer data
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer size
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }

    pub fn encode_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Little-endian u32
    pub fn encode_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// LEB128 variable-length unsigned integer
    pub fn encode_varint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.buffer.push(byte);
                break;
            }
            self.buffer.push(byte | 0x80);
        }
    }

    pub fn encode_data(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_buffer_creation() {
        let buf = EncoderBuffer::with_capacity(64);
        assert_eq!(buf.size(), 0);
        assert!(buf.data().is_empty());
    }

    #[test]
    fn test_u32_is_little_endian() {
        let mut buf = EncoderBuffer::new();
        buf.encode_u32(0x12345678);
        assert_eq!(buf.data(), &[0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_varint() {
        let mut buf = EncoderBuffer::new();
        buf.encode_varint(0);
        buf.encode_varint(127);
        buf.encode_varint(128);
        buf.encode_varint(300);
        assert_eq!(buf.data(), &[0x00, 0x7F, 0x80, 0x01, 0xAC, 0x02]);
    }

    #[test]
    fn test_into_vec() {
        let mut buf = EncoderBuffer::new();
        buf.encode_data(&[1, 2, 3]);
        buf.encode_u8(4);
        assert_eq!(buf.size(), 4);
        assert_eq!(buf.into_vec(), vec![1, 2, 3, 4]);
    }
}
