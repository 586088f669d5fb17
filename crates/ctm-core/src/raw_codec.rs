use crate::compression_config::CompressionMethod;
use crate::mesh::Mesh;
use crate::mesh_codec::{
    attrib_map_from_info, flatten, group, scalar_count, uv_map_from_info, DecodedMesh,
    EncodeParams, MeshCodec,
};
use crate::mesh_decoder::FileHeader;
use crate::status::{Status, StatusResult};
use crate::stream::{StreamReader, StreamWriter};
use crate::version::{TAG_ATTRIBS, TAG_INDICES, TAG_NORMALS, TAG_TEX_COORDS, TAG_VERTICES};

/// Plain little-endian arrays in mesh order.
pub struct RawCodec;

impl MeshCodec for RawCodec {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::Raw
    }

    fn encode(&self, mesh: &Mesh, _params: &EncodeParams, out: &mut StreamWriter) -> Status {
        out.write_tag(TAG_INDICES)?;
        out.write_u32_slice(&flatten(mesh.triangles()))?;

        out.write_tag(TAG_VERTICES)?;
        out.write_f32_slice(&flatten(mesh.vertices()))?;

        if let Some(normals) = mesh.normals() {
            out.write_tag(TAG_NORMALS)?;
            out.write_f32_slice(&flatten(normals))?;
        }
        for map in mesh.uv_maps() {
            out.write_tag(TAG_TEX_COORDS)?;
            out.write_f32_slice(&flatten(map.coords()))?;
        }
        for map in mesh.attrib_maps() {
            out.write_tag(TAG_ATTRIBS)?;
            out.write_f32_slice(map.values())?;
        }
        Ok(())
    }

    fn decode(&self, header: &FileHeader, input: &mut StreamReader) -> StatusResult<DecodedMesh> {
        let v = header.vertex_count;

        input.expect_tag(TAG_INDICES)?;
        let indices = input.read_u32_vec(scalar_count(header.triangle_count, 3)?)?;

        input.expect_tag(TAG_VERTICES)?;
        let vertices = input.read_f32_vec(scalar_count(v, 3)?)?;

        let normals = if header.has_normals {
            input.expect_tag(TAG_NORMALS)?;
            Some(group(&input.read_f32_vec(scalar_count(v, 3)?)?))
        } else {
            None
        };

        let mut mesh = Mesh::new(group(&vertices), group(&indices), normals);
        for info in &header.uv_maps {
            input.expect_tag(TAG_TEX_COORDS)?;
            let coords = input.read_f32_vec(scalar_count(v, 2)?)?;
            mesh.add_uv_map(uv_map_from_info(info, group(&coords)));
        }
        for info in &header.attrib_maps {
            input.expect_tag(TAG_ATTRIBS)?;
            let values = input.read_f32_vec(scalar_count(v, info.components)?)?;
            mesh.add_attrib_map(attrib_map_from_info(info, values)?);
        }
        Ok(DecodedMesh::lossless(mesh))
    }
}
