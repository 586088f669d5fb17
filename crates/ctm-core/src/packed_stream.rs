//! Packed integer and float streams.
//!
//! A stream of `count` elements with `components` 32-bit words each is split
//! into byte planes (most significant plane first, then component, then
//! element) so that the slowly varying high bytes form long uniform runs.
//! The planes are then entropy coded with rANS. Block layout:
//!
//! ```text
//! u8     scheme      0 = stored, 1 = one rANS table, 2 = one table per plane
//! varint raw_len     bytes after unpacking, always 4 * count * components
//! [u8    precision]  rANS precision bits (schemes 1 and 2)
//! body
//! ```
//!
//! In the file every block is preceded by its length as a u32.

use crate::decoder_buffer::DecoderBuffer;
use crate::encoder_buffer::EncoderBuffer;
use crate::rans_symbol_coding::{
    rans_precision_for_level, MAX_RANS_PRECISION_BITS, MIN_RANS_PRECISION_BITS,
};
use crate::rans_symbol_decoder::RAnsSymbolDecoder;
use crate::rans_symbol_encoder::RAnsSymbolEncoder;
use crate::status::{CtmError, Status, StatusResult};
use crate::stream::{StreamReader, StreamWriter};

const SCHEME_STORED: u8 = 0;
const SCHEME_RANS: u8 = 1;
const SCHEME_RANS_PER_PLANE: u8 = 2;

const NUM_PLANES: usize = 4;

/// Levels at or above this also try one frequency table per byte plane.
const PER_PLANE_MIN_LEVEL: u32 = 5;

/// Largest accepted ratio of unpacked bytes to block bytes. Bounds the
/// memory and work a tiny block with a large declared length can demand.
const MAX_EXPANSION: u64 = 1 << 20;

fn within_expansion_limit(raw_len: u64, block_len: usize) -> bool {
    raw_len <= (block_len as u64).saturating_mul(MAX_EXPANSION)
}

/// Maps a signed value to an unsigned one with small magnitudes first.
#[inline]
pub fn zigzag_encode(x: i32) -> u32 {
    ((x << 1) ^ (x >> 31)) as u32
}

#[inline]
pub fn zigzag_decode(u: u32) -> i32 {
    ((u >> 1) as i32) ^ -((u & 1) as i32)
}

pub fn encode_packed_ints(
    values: &[i32],
    components: usize,
    signed: bool,
    compression_level: u32,
) -> StatusResult<Vec<u8>> {
    let words: Vec<u32> = if signed {
        values.iter().map(|&v| zigzag_encode(v)).collect()
    } else {
        values.iter().map(|&v| v as u32).collect()
    };
    encode_words(&words, components, compression_level)
}

pub fn decode_packed_ints(
    block: &[u8],
    count: usize,
    components: usize,
    signed: bool,
) -> StatusResult<Vec<i32>> {
    let words = decode_words(block, count, components)?;
    Ok(if signed {
        words.into_iter().map(zigzag_decode).collect()
    } else {
        words.into_iter().map(|w| w as i32).collect()
    })
}

/// Floats are packed by their bit patterns, so the stream is lossless.
pub fn encode_packed_floats(
    values: &[f32],
    components: usize,
    compression_level: u32,
) -> StatusResult<Vec<u8>> {
    let words: Vec<u32> = values.iter().map(|v| v.to_bits()).collect();
    encode_words(&words, components, compression_level)
}

pub fn decode_packed_floats(block: &[u8], count: usize, components: usize) -> StatusResult<Vec<f32>> {
    let words = decode_words(block, count, components)?;
    Ok(words.into_iter().map(f32::from_bits).collect())
}

/// Writes `u32 length` + packed block.
pub fn write_packed_ints(
    out: &mut StreamWriter,
    values: &[i32],
    components: usize,
    signed: bool,
    compression_level: u32,
) -> Status {
    let block = encode_packed_ints(values, components, signed, compression_level)?;
    write_block(out, &block)
}

pub fn write_packed_floats(
    out: &mut StreamWriter,
    values: &[f32],
    components: usize,
    compression_level: u32,
) -> Status {
    let block = encode_packed_floats(values, components, compression_level)?;
    write_block(out, &block)
}

pub fn read_packed_ints(
    input: &mut StreamReader,
    count: usize,
    components: usize,
    signed: bool,
) -> StatusResult<Vec<i32>> {
    let block = read_block(input)?;
    decode_packed_ints(&block, count, components, signed)
}

pub fn read_packed_floats(
    input: &mut StreamReader,
    count: usize,
    components: usize,
) -> StatusResult<Vec<f32>> {
    let block = read_block(input)?;
    decode_packed_floats(&block, count, components)
}

fn write_block(out: &mut StreamWriter, block: &[u8]) -> Status {
    let len = u32::try_from(block.len())
        .map_err(|_| CtmError::InternalError("packed block exceeds 4 GiB".into()))?;
    out.write_u32(len)?;
    out.write_bytes(block)
}

fn read_block(input: &mut StreamReader) -> StatusResult<Vec<u8>> {
    let len = input.read_u32()?;
    input.read_bytes(len as usize)
}

fn interleave(words: &[u32], components: usize) -> Vec<u8> {
    let count = words.len() / components;
    let mut bytes = vec![0u8; words.len() * NUM_PLANES];
    for (n, &word) in words.iter().enumerate() {
        let (i, j) = (n / components, n % components);
        for k in 0..NUM_PLANES {
            let plane = NUM_PLANES - 1 - k;
            bytes[k * words.len() + j * count + i] = (word >> (8 * plane)) as u8;
        }
    }
    bytes
}

fn deinterleave(bytes: &[u8], count: usize, components: usize) -> Vec<u32> {
    let len = count * components;
    let mut words = vec![0u32; len];
    for (n, word) in words.iter_mut().enumerate() {
        let (i, j) = (n / components, n % components);
        for k in 0..NUM_PLANES {
            let plane = NUM_PLANES - 1 - k;
            *word |= (bytes[k * len + j * count + i] as u32) << (8 * plane);
        }
    }
    words
}

fn encode_words(words: &[u32], components: usize, compression_level: u32) -> StatusResult<Vec<u8>> {
    if components == 0 || words.len() % components != 0 {
        return Err(CtmError::InternalError(format!(
            "{} words do not split into {} components",
            words.len(),
            components
        )));
    }
    let raw = interleave(words, components);

    let mut best = EncoderBuffer::with_capacity(raw.len() + 8);
    best.encode_u8(SCHEME_STORED);
    best.encode_varint(raw.len() as u64);
    best.encode_data(&raw);

    if compression_level == 0 || raw.is_empty() {
        return Ok(best.into_vec());
    }

    let mut candidates =
        vec![encode_rans_block(&raw, &[raw.as_slice()], SCHEME_RANS, compression_level)?];
    if compression_level >= PER_PLANE_MIN_LEVEL {
        let plane_len = raw.len() / NUM_PLANES;
        let planes: Vec<&[u8]> = raw.chunks(plane_len).collect();
        candidates.push(encode_rans_block(
            &raw,
            &planes,
            SCHEME_RANS_PER_PLANE,
            compression_level,
        )?);
    }
    // Blocks the decoder would refuse are skipped; stored always fits.
    let raw_len = raw.len() as u64;
    for candidate in candidates {
        if candidate.size() < best.size() && within_expansion_limit(raw_len, candidate.size()) {
            best = candidate;
        }
    }
    log::trace!(
        "packed {} words into {} bytes (scheme {})",
        words.len(),
        best.size(),
        best.data()[0]
    );
    Ok(best.into_vec())
}

fn encode_rans_block(
    raw: &[u8],
    parts: &[&[u8]],
    scheme: u8,
    compression_level: u32,
) -> StatusResult<EncoderBuffer> {
    let mut frequencies = [0u64; 256];
    for &b in raw {
        frequencies[b as usize] += 1;
    }
    let unique = frequencies.iter().filter(|&&f| f > 0).count() as u32;
    let precision_bits = rans_precision_for_level(unique, compression_level);

    let mut buffer = EncoderBuffer::with_capacity(raw.len() / 2 + 16);
    buffer.encode_u8(scheme);
    buffer.encode_varint(raw.len() as u64);
    buffer.encode_u8(precision_bits as u8);
    for part in parts {
        match precision_bits {
            12 => encode_bytes_typed::<12>(part, &mut buffer)?,
            13 => encode_bytes_typed::<13>(part, &mut buffer)?,
            14 => encode_bytes_typed::<14>(part, &mut buffer)?,
            15 => encode_bytes_typed::<15>(part, &mut buffer)?,
            16 => encode_bytes_typed::<16>(part, &mut buffer)?,
            17 => encode_bytes_typed::<17>(part, &mut buffer)?,
            18 => encode_bytes_typed::<18>(part, &mut buffer)?,
            19 => encode_bytes_typed::<19>(part, &mut buffer)?,
            20 => encode_bytes_typed::<20>(part, &mut buffer)?,
            _ => {
                return Err(CtmError::InternalError(format!(
                    "unsupported rANS precision {}",
                    precision_bits
                )))
            }
        }
    }
    Ok(buffer)
}

fn encode_bytes_typed<const PRECISION_BITS: u32>(
    bytes: &[u8],
    buffer: &mut EncoderBuffer,
) -> Status {
    let mut frequencies = [0u64; 256];
    for &b in bytes {
        frequencies[b as usize] += 1;
    }
    let mut encoder = RAnsSymbolEncoder::<PRECISION_BITS>::new();
    encoder.create(&frequencies, buffer)?;
    encoder.start_encoding();
    // rANS is last-in first-out.
    for &b in bytes.iter().rev() {
        encoder.encode_symbol(b as u32);
    }
    encoder.end_encoding(buffer)
}

fn decode_words(block: &[u8], count: usize, components: usize) -> StatusResult<Vec<u32>> {
    let expected_len = count
        .checked_mul(components)
        .and_then(|n| n.checked_mul(NUM_PLANES))
        .ok_or_else(|| CtmError::OutOfMemory(format!("{} x {} words", count, components)))?;

    let mut buffer = DecoderBuffer::new(block);
    let scheme = buffer.decode_u8()?;
    let raw_len = buffer.decode_varint()?;
    if raw_len != expected_len as u64 {
        return Err(CtmError::LzmaError(format!(
            "packed stream holds {} bytes, expected {}",
            raw_len, expected_len
        )));
    }
    if !within_expansion_limit(raw_len, block.len()) {
        return Err(CtmError::LzmaError(format!(
            "{} byte block cannot unpack to {} bytes",
            block.len(),
            raw_len
        )));
    }

    let mut raw = Vec::new();
    raw.try_reserve_exact(expected_len)?;
    match scheme {
        SCHEME_STORED => raw.extend_from_slice(buffer.decode_slice(expected_len)?),
        SCHEME_RANS | SCHEME_RANS_PER_PLANE => {
            let precision_bits = buffer.decode_u8()? as u32;
            let parts = if scheme == SCHEME_RANS { 1 } else { NUM_PLANES };
            let part_len = expected_len / parts;
            for _ in 0..parts {
                decode_bytes(precision_bits, &mut buffer, part_len, &mut raw)?;
            }
        }
        other => {
            return Err(CtmError::LzmaError(format!("unknown packing scheme {}", other)));
        }
    }
    if buffer.remaining_size() != 0 {
        return Err(CtmError::LzmaError(format!(
            "{} trailing bytes after packed stream",
            buffer.remaining_size()
        )));
    }
    Ok(deinterleave(&raw, count, components))
}

fn decode_bytes(
    precision_bits: u32,
    buffer: &mut DecoderBuffer,
    len: usize,
    out: &mut Vec<u8>,
) -> Status {
    if !(MIN_RANS_PRECISION_BITS..=MAX_RANS_PRECISION_BITS).contains(&precision_bits) {
        return Err(CtmError::LzmaError(format!(
            "invalid rANS precision {}",
            precision_bits
        )));
    }
    match precision_bits {
        12 => decode_bytes_typed::<12>(buffer, len, out),
        13 => decode_bytes_typed::<13>(buffer, len, out),
        14 => decode_bytes_typed::<14>(buffer, len, out),
        15 => decode_bytes_typed::<15>(buffer, len, out),
        16 => decode_bytes_typed::<16>(buffer, len, out),
        17 => decode_bytes_typed::<17>(buffer, len, out),
        18 => decode_bytes_typed::<18>(buffer, len, out),
        19 => decode_bytes_typed::<19>(buffer, len, out),
        _ => decode_bytes_typed::<20>(buffer, len, out),
    }
}

fn decode_bytes_typed<const PRECISION_BITS: u32>(
    buffer: &mut DecoderBuffer,
    len: usize,
    out: &mut Vec<u8>,
) -> Status {
    let mut decoder = RAnsSymbolDecoder::<PRECISION_BITS>::new();
    decoder.create(buffer)?;
    if decoder.num_symbols() > 256 {
        return Err(CtmError::LzmaError("byte stream table has more than 256 symbols".into()));
    }
    decoder.start_decoding(buffer)?;
    out.extend((0..len).map(|_| decoder.decode_symbol() as u8));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag() {
        for v in [0, 1, -1, 2, -2, i32::MAX, i32::MIN] {
            assert_eq!(zigzag_decode(zigzag_encode(v)), v);
        }
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
    }

    #[test]
    fn test_interleave_layout() {
        // Two elements, two components.
        let words = [0x0102_0304, 0x0506_0708, 0x090A_0B0C, 0x0D0E_0F10];
        let bytes = interleave(&words, 2);
        assert_eq!(&bytes[0..4], &[0x01, 0x09, 0x05, 0x0D]);
        assert_eq!(&bytes[12..16], &[0x04, 0x0C, 0x08, 0x10]);
        assert_eq!(deinterleave(&bytes, 2, 2), words.to_vec());
    }

    #[test]
    fn test_every_level_roundtrips() {
        let values: Vec<i32> = (0..300).map(|i| (i % 17) - 8).collect();
        for level in 0..=9 {
            let block = encode_packed_ints(&values, 3, true, level).unwrap();
            let decoded = decode_packed_ints(&block, 100, 3, true).unwrap();
            assert_eq!(decoded, values, "level {}", level);
        }
    }

    #[test]
    fn test_level_zero_is_stored() {
        let values = vec![0i32; 64];
        let block = encode_packed_ints(&values, 1, false, 0).unwrap();
        assert_eq!(block[0], SCHEME_STORED);
        let coded = encode_packed_ints(&values, 1, false, 5).unwrap();
        assert_ne!(coded[0], SCHEME_STORED);
        assert!(coded.len() < block.len());
    }

    #[test]
    fn test_floats_are_lossless() {
        let values = vec![0.1f32, -3.5, 1.0e-7, f32::MAX, 0.0, -0.0];
        let block = encode_packed_floats(&values, 2, 9).unwrap();
        let decoded = decode_packed_floats(&block, 3, 2).unwrap();
        for (a, b) in values.iter().zip(&decoded) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_empty_stream() {
        let block = encode_packed_ints(&[], 3, false, 9).unwrap();
        assert!(decode_packed_ints(&block, 0, 3, false).unwrap().is_empty());
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let block = encode_packed_ints(&[1, 2, 3], 1, false, 5).unwrap();
        let err = decode_packed_ints(&block, 4, 1, false).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::LzmaError);
    }

    #[test]
    fn test_oversized_declared_length_is_rejected() {
        let count = 1usize << 28;
        let mut header = EncoderBuffer::new();
        header.encode_u8(SCHEME_RANS);
        header.encode_varint(count as u64 * NUM_PLANES as u64);
        header.encode_u8(12);
        let err = decode_packed_ints(header.data(), count, 1, false).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::LzmaError);
    }

    #[test]
    fn test_expansion_limit() {
        assert!(within_expansion_limit(0, 0));
        assert!(within_expansion_limit(MAX_EXPANSION * 10, 10));
        assert!(!within_expansion_limit(MAX_EXPANSION * 10 + 1, 10));
        assert!(within_expansion_limit(u64::MAX, usize::MAX));
    }

    #[test]
    fn test_constant_stream_stays_decodable() {
        let values = vec![0i32; 4096];
        let block = encode_packed_ints(&values, 1, false, 9).unwrap();
        assert!(within_expansion_limit(4096 * 4, block.len()));
        assert_eq!(decode_packed_ints(&block, 4096, 1, false).unwrap(), values);
    }

    #[test]
    fn test_corrupt_block_is_rejected() {
        let values: Vec<i32> = (0..200).collect();
        let mut block = encode_packed_ints(&values, 1, false, 5).unwrap();
        block.truncate(block.len() / 2);
        assert!(decode_packed_ints(&block, 200, 1, false).is_err());
        assert!(decode_packed_ints(&[7, 0], 0, 1, false).is_err());
    }
}
