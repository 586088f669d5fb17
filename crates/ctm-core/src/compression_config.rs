use std::fmt;

use crate::status::{invalid_argument, CtmError};
use crate::version::fourcc;

/// Compression method recorded in the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionMethod {
    /// Uncompressed arrays, bit exact.
    Raw,
    /// Lossless: canonical triangle order plus entropy coded streams.
    #[default]
    Mg1,
    /// Lossy: spatially sorted, quantized, predicted streams.
    Mg2,
}

impl CompressionMethod {
    pub const ALL: [CompressionMethod; 3] =
        [CompressionMethod::Raw, CompressionMethod::Mg1, CompressionMethod::Mg2];

    pub const fn fourcc(self) -> u32 {
        match self {
            CompressionMethod::Raw => fourcc(b"RAW\0"),
            CompressionMethod::Mg1 => fourcc(b"MG1\0"),
            CompressionMethod::Mg2 => fourcc(b"MG2\0"),
        }
    }

    pub fn from_fourcc(tag: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.fourcc() == tag)
    }

    /// Stable numeric value used by the query interface.
    pub const fn to_raw(self) -> u32 {
        match self {
            CompressionMethod::Raw => 0x0201,
            CompressionMethod::Mg1 => 0x0202,
            CompressionMethod::Mg2 => 0x0203,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CompressionMethod::Raw => "RAW",
            CompressionMethod::Mg1 => "MG1",
            CompressionMethod::Mg2 => "MG2",
        }
    }
}

impl TryFrom<u32> for CompressionMethod {
    type Error = CtmError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|m| m.to_raw() == raw)
            .ok_or_else(|| invalid_argument(format!("unknown compression method {:#06x}", raw)))
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for CompressionMethod {
    type Err = CtmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| invalid_argument(format!("unknown compression method {:?}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc_roundtrip() {
        for m in CompressionMethod::ALL {
            assert_eq!(CompressionMethod::from_fourcc(m.fourcc()), Some(m));
            assert_eq!(CompressionMethod::try_from(m.to_raw()).unwrap(), m);
            assert_eq!(m.name().parse::<CompressionMethod>().unwrap(), m);
        }
        assert_eq!(CompressionMethod::from_fourcc(fourcc(b"MG3\0")), None);
        assert!(CompressionMethod::try_from(0x0204).is_err());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("mg2".parse::<CompressionMethod>().unwrap(), CompressionMethod::Mg2);
        assert!("lzma".parse::<CompressionMethod>().is_err());
    }
}
