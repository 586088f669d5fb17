use std::io::Read;

use crate::compression_config::CompressionMethod;
use crate::encoder_options::MapCapacity;
use crate::mesh_codec::{codec_for, DecodedMesh};
use crate::status::{bad_format, CtmError, StatusResult};
use crate::stream::StreamReader;
use crate::vertex_map::MAX_ATTRIB_COMPONENTS;
use crate::version::{
    fourcc_to_string, is_supported_version, CTM_MAGIC, HAS_NORMALS_BIT, TAG_ATTRIB_INFO,
    TAG_UV_INFO,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UvMapInfo {
    pub name: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttribMapInfo {
    pub name: Option<String>,
    pub components: usize,
}

/// Everything in a file before the method payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub method: CompressionMethod,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub has_normals: bool,
    pub comment: Option<String>,
    pub uv_maps: Vec<UvMapInfo>,
    pub attrib_maps: Vec<AttribMapInfo>,
}

impl FileHeader {
    pub fn read(input: &mut StreamReader, capacity: MapCapacity) -> StatusResult<Self> {
        let magic = input.read_u32()?;
        if magic != CTM_MAGIC {
            return Err(bad_format(format!(
                "not an OpenCTM stream (magic {})",
                fourcc_to_string(magic)
            )));
        }
        let version = input.read_u32()?;
        if !is_supported_version(version) {
            return Err(CtmError::UnsupportedFormatVersion(version));
        }
        let method_tag = input.read_u32()?;
        let method = CompressionMethod::from_fourcc(method_tag).ok_or_else(|| {
            bad_format(format!("unknown compression method {}", fourcc_to_string(method_tag)))
        })?;

        let vertex_count = input.read_u32()? as usize;
        let triangle_count = input.read_u32()? as usize;
        let uv_map_count = input.read_u32()? as usize;
        let attrib_map_count = input.read_u32()? as usize;
        let flags = input.read_u32()?;
        if vertex_count == 0 || triangle_count == 0 {
            return Err(bad_format(format!(
                "{} vertices and {} triangles in header",
                vertex_count, triangle_count
            )));
        }
        if uv_map_count > capacity.uv_maps || attrib_map_count > capacity.attrib_maps {
            return Err(CtmError::OutOfMemory(format!(
                "{} UV maps and {} attribute maps exceed capacity {}/{}",
                uv_map_count, attrib_map_count, capacity.uv_maps, capacity.attrib_maps
            )));
        }
        let comment = input.read_string()?;

        let mut uv_maps = Vec::with_capacity(uv_map_count);
        if uv_map_count > 0 {
            input.expect_tag(TAG_UV_INFO)?;
            for _ in 0..uv_map_count {
                let name = input.read_string()?;
                let file_name = input.read_string()?;
                uv_maps.push(UvMapInfo { name, file_name });
            }
        }

        let mut attrib_maps = Vec::with_capacity(attrib_map_count);
        if attrib_map_count > 0 {
            input.expect_tag(TAG_ATTRIB_INFO)?;
            for _ in 0..attrib_map_count {
                let name = input.read_string()?;
                let components = input.read_u32()? as usize;
                if components == 0 || components > MAX_ATTRIB_COMPONENTS {
                    return Err(bad_format(format!(
                        "attribute map with {} components",
                        components
                    )));
                }
                attrib_maps.push(AttribMapInfo { name, components });
            }
        }

        Ok(Self {
            method,
            vertex_count,
            triangle_count,
            has_normals: flags & HAS_NORMALS_BIT != 0,
            comment,
            uv_maps,
            attrib_maps,
        })
    }
}

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMesh {
    pub header: FileHeader,
    pub decoded: DecodedMesh,
}

pub struct MeshDecoder {
    capacity: MapCapacity,
}

impl MeshDecoder {
    pub fn new(capacity: MapCapacity) -> Self {
        Self { capacity }
    }

    pub fn decode(&self, source: &mut dyn Read) -> StatusResult<LoadedMesh> {
        let mut input = StreamReader::new(source);
        let header = FileHeader::read(&mut input, self.capacity)?;
        log::debug!(
            "loading {} mesh: {} vertices, {} triangles, {} UV maps, {} attribute maps",
            header.method,
            header.vertex_count,
            header.triangle_count,
            header.uv_maps.len(),
            header.attrib_maps.len()
        );

        let decoded = codec_for(header.method).decode(&header, &mut input)?;
        decoded.mesh.check_integrity()?;
        log::debug!("decoded {} bytes", input.bytes_read());
        Ok(LoadedMesh { header, decoded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::stream::StreamWriter;
    use crate::version::fourcc;

    fn header_bytes(version: u32, method: &[u8; 4], v: u32, t: u32, uv: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut w = StreamWriter::new(&mut bytes);
        w.write_u32(CTM_MAGIC).unwrap();
        w.write_u32(version).unwrap();
        w.write_u32(fourcc(method)).unwrap();
        w.write_u32_slice(&[v, t, uv, 0, 0]).unwrap();
        w.write_string(Some("hi")).unwrap();
        if uv > 0 {
            w.write_tag(TAG_UV_INFO).unwrap();
            for _ in 0..uv {
                w.write_string(Some("uv")).unwrap();
                w.write_string(None).unwrap();
            }
        }
        bytes
    }

    fn read(bytes: &[u8]) -> StatusResult<FileHeader> {
        let mut slice = bytes;
        FileHeader::read(&mut StreamReader::new(&mut slice), MapCapacity::default())
    }

    #[test]
    fn test_reads_header() {
        let header = read(&header_bytes(6, b"MG2\0", 8, 12, 1)).unwrap();
        assert_eq!(header.method, CompressionMethod::Mg2);
        assert_eq!(header.vertex_count, 8);
        assert_eq!(header.triangle_count, 12);
        assert!(!header.has_normals);
        assert_eq!(header.comment.as_deref(), Some("hi"));
        assert_eq!(header.uv_maps[0].name.as_deref(), Some("uv"));
        assert_eq!(header.uv_maps[0].file_name, None);
    }

    #[test]
    fn test_header_errors() {
        let code = |bytes: &[u8]| read(bytes).unwrap_err().code();
        assert_eq!(code(&header_bytes(7, b"MG1\0", 3, 1, 0)), ErrorCode::UnsupportedFormatVersion);
        assert_eq!(code(&header_bytes(6, b"LZMA", 3, 1, 0)), ErrorCode::BadFormat);
        assert_eq!(code(&header_bytes(6, b"RAW\0", 0, 1, 0)), ErrorCode::BadFormat);
        assert_eq!(code(&header_bytes(6, b"RAW\0", 3, 1, 9)), ErrorCode::OutOfMemory);
        assert_eq!(code(&header_bytes(6, b"RAW\0", 3, 1, 0)[..10]), ErrorCode::BadFormat);

        let mut bad_magic = header_bytes(6, b"RAW\0", 3, 1, 0);
        bad_magic[0] = b'X';
        assert_eq!(code(&bad_magic), ErrorCode::BadFormat);
    }
}
