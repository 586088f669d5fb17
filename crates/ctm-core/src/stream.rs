//! Stream abstraction shared by every codec.
//!
//! The codecs only see [`StreamWriter`] and [`StreamReader`], thin
//! little-endian wrappers over `dyn Write` / `dyn Read`. Files, in-memory
//! buffers and caller callbacks are all adapted to those two traits here.

use std::io::{self, Read, Write};
use std::ops::Deref;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::status::{bad_format, CtmError, Status, StatusResult};
use crate::version::fourcc_to_string;

pub struct StreamWriter<'a> {
    inner: &'a mut dyn Write,
    bytes_written: u64,
}

impl<'a> StreamWriter<'a> {
    pub fn new(inner: &'a mut dyn Write) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn write_u32(&mut self, value: u32) -> Status {
        self.inner.write_u32::<LittleEndian>(value)?;
        self.bytes_written += 4;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Status {
        self.inner.write_f32::<LittleEndian>(value)?;
        self.bytes_written += 4;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Status {
        self.inner.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    pub fn write_tag(&mut self, tag: u32) -> Status {
        log::trace!("chunk {} at offset {}", fourcc_to_string(tag), self.bytes_written);
        self.write_u32(tag)
    }

    /// `u32 length` + UTF-8 bytes; a missing string is written as empty.
    pub fn write_string(&mut self, value: Option<&str>) -> Status {
        let bytes = value.unwrap_or_default().as_bytes();
        let len = u32::try_from(bytes.len())
            .map_err(|_| CtmError::InvalidArgument("string longer than 4 GiB".into()))?;
        self.write_u32(len)?;
        self.write_bytes(bytes)
    }

    pub fn write_u32_slice(&mut self, values: &[u32]) -> Status {
        for &v in values {
            self.write_u32(v)?;
        }
        Ok(())
    }

    pub fn write_f32_slice(&mut self, values: &[f32]) -> Status {
        for &v in values {
            self.write_f32(v)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Status {
        self.inner.flush()?;
        Ok(())
    }
}

pub struct StreamReader<'a> {
    inner: &'a mut dyn Read,
    bytes_read: u64,
}

impl<'a> StreamReader<'a> {
    pub fn new(inner: &'a mut dyn Read) -> Self {
        Self {
            inner,
            bytes_read: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn read_u32(&mut self) -> StatusResult<u32> {
        let v = self.inner.read_u32::<LittleEndian>()?;
        self.bytes_read += 4;
        Ok(v)
    }

    pub fn read_f32(&mut self) -> StatusResult<f32> {
        let v = self.inner.read_f32::<LittleEndian>()?;
        self.bytes_read += 4;
        Ok(v)
    }

    /// Reads exactly `len` bytes. Memory grows with the data actually
    /// present, so a corrupt length cannot trigger a huge allocation.
    pub fn read_bytes(&mut self, len: usize) -> StatusResult<Vec<u8>> {
        let mut bytes = Vec::new();
        Read::take(&mut *self.inner, len as u64).read_to_end(&mut bytes)?;
        self.bytes_read += bytes.len() as u64;
        if bytes.len() != len {
            return Err(bad_format(format!(
                "truncated stream: wanted {} bytes, got {}",
                len,
                bytes.len()
            )));
        }
        Ok(bytes)
    }

    /// Reads a chunk tag and fails with BAD_FORMAT unless it is `expected`.
    pub fn expect_tag(&mut self, expected: u32) -> Status {
        let tag = self.read_u32()?;
        if tag != expected {
            return Err(bad_format(format!(
                "expected chunk {}, found {}",
                fourcc_to_string(expected),
                fourcc_to_string(tag)
            )));
        }
        Ok(())
    }

    /// Empty strings read back as `None`.
    pub fn read_string(&mut self) -> StatusResult<Option<String>> {
        let len = self.read_u32()? as usize;
        if len == 0 {
            return Ok(None);
        }
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| bad_format(format!("invalid UTF-8 string: {}", e)))
    }

    pub fn read_u32_vec(&mut self, count: usize) -> StatusResult<Vec<u32>> {
        let bytes = self.read_bytes(byte_len(count)?)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    pub fn read_f32_vec(&mut self, count: usize) -> StatusResult<Vec<f32>> {
        let bytes = self.read_bytes(byte_len(count)?)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}

fn byte_len(count: usize) -> StatusResult<usize> {
    count
        .checked_mul(4)
        .ok_or_else(|| CtmError::OutOfMemory(format!("{} words", count)))
}

/// Adapts a write callback. The callback returns how many bytes it
/// accepted; anything short of the full slice is a write failure. After a
/// failure the callback is never invoked again.
pub struct CallbackWriter<F> {
    callback: F,
    failed: bool,
}

impl<F: FnMut(&[u8]) -> usize> CallbackWriter<F> {
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            failed: false,
        }
    }
}

impl<F: FnMut(&[u8]) -> usize> Write for CallbackWriter<F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "write callback already failed",
            ));
        }
        if buf.is_empty() {
            return Ok(0);
        }
        let written = (self.callback)(buf);
        if written < buf.len() {
            self.failed = true;
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("write callback accepted {} of {} bytes", written, buf.len()),
            ));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Adapts a read callback. The callback fills the slice it is given and
/// returns the number of bytes produced; 0 means end of data.
pub struct CallbackReader<F> {
    callback: F,
}

impl<F: FnMut(&mut [u8]) -> usize> CallbackReader<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: FnMut(&mut [u8]) -> usize> Read for CallbackReader<F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = (self.callback)(buf);
        Ok(n.min(buf.len()))
    }
}

/// Serialized mesh returned by
/// [`Context::save_to_buffer`](crate::context::Context::save_to_buffer).
/// Owns its bytes; dropping it frees them.
#[derive(Debug, PartialEq, Eq)]
pub struct MeshBuffer {
    data: Vec<u8>,
}

impl MeshBuffer {
    pub(crate) fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl Deref for MeshBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for MeshBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
