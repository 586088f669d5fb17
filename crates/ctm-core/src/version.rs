// OpenCTM file format constants.
//
// Every tag in the stream is a FourCC: four ASCII bytes read as a
// little-endian u32.

/// Builds a FourCC tag from its four bytes.
pub const fn fourcc(tag: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*tag)
}

/// File magic, "OCTM".
pub const CTM_MAGIC: u32 = fourcc(b"OCTM");

/// The only format version this library reads and writes.
pub const CTM_FORMAT_VERSION: u32 = 6;

/// Header flag: the mesh carries per-vertex normals.
pub const HAS_NORMALS_BIT: u32 = 0x0000_0001;

// =============================================================================
// Chunk tags
// =============================================================================

pub const TAG_UV_INFO: u32 = fourcc(b"UINF");
pub const TAG_ATTRIB_INFO: u32 = fourcc(b"AINF");
pub const TAG_INDICES: u32 = fourcc(b"INDX");
pub const TAG_VERTICES: u32 = fourcc(b"VERT");
pub const TAG_NORMALS: u32 = fourcc(b"NORM");
pub const TAG_TEX_COORDS: u32 = fourcc(b"TEXC");
pub const TAG_ATTRIBS: u32 = fourcc(b"ATTR");
pub const TAG_MG2_HEADER: u32 = fourcc(b"MG2H");
pub const TAG_GRID_INDICES: u32 = fourcc(b"GIDX");

/// Returns true if `version` can be decoded.
#[inline]
pub fn is_supported_version(version: u32) -> bool {
    version == CTM_FORMAT_VERSION
}

/// Renders a FourCC for diagnostics, escaping non-printable bytes.
pub fn fourcc_to_string(tag: u32) -> String {
    tag.to_le_bytes()
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() {
                (b as char).to_string()
            } else {
                format!("\\x{:02x}", b)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc_is_little_endian() {
        assert_eq!(CTM_MAGIC.to_le_bytes(), *b"OCTM");
        assert_eq!(fourcc(b"RAW\0") & 0xFF, b'R' as u32);
    }

    #[test]
    fn test_supported_version() {
        assert!(is_supported_version(6));
        assert!(!is_supported_version(5));
        assert!(!is_supported_version(7));
    }

    #[test]
    fn test_fourcc_to_string() {
        assert_eq!(fourcc_to_string(TAG_INDICES), "INDX");
        assert_eq!(fourcc_to_string(fourcc(b"MG1\0")), "MG1\\x00");
    }
}
