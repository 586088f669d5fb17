use std::io::Write;

use crate::compression_config::CompressionMethod;
use crate::encoder_options::{check_step, EncoderOptions};
use crate::mesh::Mesh;
use crate::mesh_codec::{codec_for, EncodeParams};
use crate::status::{CtmError, Status, StatusResult};
use crate::stream::StreamWriter;
use crate::version::{
    CTM_FORMAT_VERSION, CTM_MAGIC, HAS_NORMALS_BIT, TAG_ATTRIB_INFO, TAG_UV_INFO,
};

/// Writes a mesh as a complete OpenCTM stream.
pub struct MeshEncoder<'a> {
    mesh: &'a Mesh,
    options: &'a EncoderOptions,
}

impl<'a> MeshEncoder<'a> {
    pub fn new(mesh: &'a Mesh, options: &'a EncoderOptions) -> Self {
        Self { mesh, options }
    }

    /// Resolves the quantization settings for this mesh. Relative vertex
    /// precision is only resolved for MG2, the one method that uses it.
    pub fn params(&self) -> StatusResult<EncodeParams> {
        let method = self.options.method();
        let vertex_precision = if method == CompressionMethod::Mg2 {
            self.options.vertex_precision().resolve(self.mesh)?
        } else {
            0.0
        };
        if method == CompressionMethod::Mg2 {
            check_step("normal", self.options.normal_precision())?;
            for map in self.mesh.uv_maps() {
                check_step("UV map", map.precision())?;
            }
            for map in self.mesh.attrib_maps() {
                check_step("attribute map", map.precision())?;
            }
        }
        Ok(EncodeParams {
            compression_level: self.options.level(),
            vertex_precision,
            normal_precision: self.options.normal_precision(),
        })
    }

    /// Returns the number of bytes written. The sink is flushed.
    pub fn encode(&self, sink: &mut dyn Write) -> StatusResult<u64> {
        self.mesh.check_integrity()?;
        let params = self.params()?;
        let method = self.options.method();

        let mut out = StreamWriter::new(sink);
        self.encode_header(&mut out)?;
        codec_for(method).encode(self.mesh, &params, &mut out)?;
        out.flush()?;

        log::debug!(
            "saved {} mesh: {} vertices, {} triangles, {} bytes",
            method,
            self.mesh.num_vertices(),
            self.mesh.num_triangles(),
            out.bytes_written()
        );
        Ok(out.bytes_written())
    }

    fn encode_header(&self, out: &mut StreamWriter) -> Status {
        let mesh = self.mesh;
        out.write_u32(CTM_MAGIC)?;
        out.write_u32(CTM_FORMAT_VERSION)?;
        out.write_u32(self.options.method().fourcc())?;
        out.write_u32(count_u32(mesh.num_vertices())?)?;
        out.write_u32(count_u32(mesh.num_triangles())?)?;
        out.write_u32(count_u32(mesh.uv_maps().len())?)?;
        out.write_u32(count_u32(mesh.attrib_maps().len())?)?;
        out.write_u32(if mesh.has_normals() { HAS_NORMALS_BIT } else { 0 })?;
        out.write_string(self.options.comment())?;

        if !mesh.uv_maps().is_empty() {
            out.write_tag(TAG_UV_INFO)?;
            for map in mesh.uv_maps() {
                out.write_string(map.name())?;
                out.write_string(map.file_name())?;
            }
        }
        if !mesh.attrib_maps().is_empty() {
            out.write_tag(TAG_ATTRIB_INFO)?;
            for map in mesh.attrib_maps() {
                out.write_string(map.name())?;
                out.write_u32(map.components() as u32)?;
            }
        }
        Ok(())
    }
}

fn count_u32(n: usize) -> StatusResult<u32> {
    u32::try_from(n).map_err(|_| CtmError::InvalidMesh(format!("count {} exceeds u32", n)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder_options::MapCapacity;
    use crate::error::ErrorCode;
    use crate::mesh_decoder::MeshDecoder;
    use crate::vertex_map::{AttributeMap, UvMap};

    fn quad() -> Mesh {
        let mut mesh = Mesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2], [0, 2, 3]],
            Some(vec![[0.0, 0.0, 1.0]; 4]),
        );
        mesh.add_uv_map(UvMap::new(
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            Some("diffuse".into()),
            Some("wood.png".into()),
        ));
        mesh.add_attrib_map(
            AttributeMap::new(vec![0.5; 8], 2, Some("weights".into())).unwrap(),
        );
        mesh
    }

    #[test]
    fn test_every_method_roundtrips_header() {
        let mesh = quad();
        for method in CompressionMethod::ALL {
            let mut options = EncoderOptions::new();
            options.set_method(method);
            options.set_comment(Some("quad".into()));
            let mut bytes = Vec::new();
            let written = MeshEncoder::new(&mesh, &options).encode(&mut bytes).unwrap();
            assert_eq!(written, bytes.len() as u64);

            let loaded = MeshDecoder::new(MapCapacity::default())
                .decode(&mut bytes.as_slice())
                .unwrap();
            assert_eq!(loaded.header.method, method);
            assert_eq!(loaded.header.comment.as_deref(), Some("quad"));
            let decoded = loaded.decoded.mesh;
            assert_eq!(decoded.num_vertices(), 4);
            assert_eq!(decoded.uv_maps()[0].file_name(), Some("wood.png"));
            assert_eq!(decoded.attrib_maps()[0].components(), 2);
        }
    }

    #[test]
    fn test_empty_mesh_is_invalid() {
        let options = EncoderOptions::new();
        let err = MeshEncoder::new(&Mesh::default(), &options)
            .encode(&mut Vec::new())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidMesh);
    }

    #[test]
    fn test_relative_precision_only_matters_for_mg2() {
        let flat = Mesh::new(vec![[1.0; 3]; 3], vec![[0, 1, 2]], None);
        let mut options = EncoderOptions::new();
        options.set_vertex_precision_rel(0.01).unwrap();
        options.set_method(CompressionMethod::Mg1);
        assert!(MeshEncoder::new(&flat, &options).encode(&mut Vec::new()).is_ok());
        options.set_method(CompressionMethod::Mg2);
        let err = MeshEncoder::new(&flat, &options).encode(&mut Vec::new()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }
}
