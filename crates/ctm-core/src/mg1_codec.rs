use crate::compression_config::CompressionMethod;
use crate::index_coding::{make_index_deltas, rearrange_triangles, restore_indices};
use crate::mesh::Mesh;
use crate::mesh_codec::{
    attrib_map_from_info, flatten, group, uv_map_from_info, DecodedMesh, EncodeParams, MeshCodec,
};
use crate::mesh_decoder::FileHeader;
use crate::packed_stream::{read_packed_floats, read_packed_ints, write_packed_floats, write_packed_ints};
use crate::status::{Status, StatusResult};
use crate::stream::{StreamReader, StreamWriter};
use crate::version::{TAG_ATTRIBS, TAG_INDICES, TAG_NORMALS, TAG_TEX_COORDS, TAG_VERTICES};

/// Lossless method. Vertex data is kept bit exact; only the triangle list
/// is canonicalised (rotation and order) so that its deltas stay small.
pub struct Mg1Codec;

impl MeshCodec for Mg1Codec {
    fn method(&self) -> CompressionMethod {
        CompressionMethod::Mg1
    }

    fn encode(&self, mesh: &Mesh, params: &EncodeParams, out: &mut StreamWriter) -> Status {
        let level = params.compression_level;

        let mut triangles = mesh.triangles().to_vec();
        rearrange_triangles(&mut triangles);
        let deltas: Vec<i32> = make_index_deltas(&triangles)
            .into_iter()
            .map(|d| d as i32)
            .collect();
        out.write_tag(TAG_INDICES)?;
        write_packed_ints(out, &deltas, 3, false, level)?;

        out.write_tag(TAG_VERTICES)?;
        write_packed_floats(out, &flatten(mesh.vertices()), 3, level)?;

        if let Some(normals) = mesh.normals() {
            out.write_tag(TAG_NORMALS)?;
            write_packed_floats(out, &flatten(normals), 3, level)?;
        }
        for map in mesh.uv_maps() {
            out.write_tag(TAG_TEX_COORDS)?;
            write_packed_floats(out, &flatten(map.coords()), 2, level)?;
        }
        for map in mesh.attrib_maps() {
            out.write_tag(TAG_ATTRIBS)?;
            write_packed_floats(out, map.values(), map.components(), level)?;
        }
        Ok(())
    }

    fn decode(&self, header: &FileHeader, input: &mut StreamReader) -> StatusResult<DecodedMesh> {
        let v = header.vertex_count;

        input.expect_tag(TAG_INDICES)?;
        let deltas: Vec<u32> = read_packed_ints(input, header.triangle_count, 3, false)?
            .into_iter()
            .map(|d| d as u32)
            .collect();
        let triangles = restore_indices(&deltas);

        input.expect_tag(TAG_VERTICES)?;
        let vertices = read_packed_floats(input, v, 3)?;

        let normals = if header.has_normals {
            input.expect_tag(TAG_NORMALS)?;
            Some(group(&read_packed_floats(input, v, 3)?))
        } else {
            None
        };

        let mut mesh = Mesh::new(group(&vertices), triangles, normals);
        for info in &header.uv_maps {
            input.expect_tag(TAG_TEX_COORDS)?;
            let coords = read_packed_floats(input, v, 2)?;
            mesh.add_uv_map(uv_map_from_info(info, group(&coords)));
        }
        for info in &header.attrib_maps {
            input.expect_tag(TAG_ATTRIBS)?;
            let values = read_packed_floats(input, v, info.components)?;
            mesh.add_attrib_map(attrib_map_from_info(info, values)?);
        }
        Ok(DecodedMesh::lossless(mesh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_decoder::AttribMapInfo;
    use crate::vertex_map::AttributeMap;

    #[test]
    fn test_normals_and_attributes_keep_component_order() {
        let normals = vec![[0.0, 0.0, 1.0], [0.6, 0.0, 0.8], [-0.0, -1.0, 0.0]];
        let values: Vec<f32> = (0..9).map(|i| i as f32 * 0.5 - 1.0).collect();
        let mut mesh = Mesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[1, 2, 0]],
            Some(normals.clone()),
        );
        mesh.add_attrib_map(AttributeMap::new(values.clone(), 3, None).unwrap());
        let params = EncodeParams {
            compression_level: 9,
            vertex_precision: 1.0,
            normal_precision: 1.0,
        };
        let mut bytes = Vec::new();
        Mg1Codec
            .encode(&mesh, &params, &mut StreamWriter::new(&mut bytes))
            .unwrap();

        let header = FileHeader {
            method: CompressionMethod::Mg1,
            vertex_count: 3,
            triangle_count: 1,
            has_normals: true,
            comment: None,
            uv_maps: Vec::new(),
            attrib_maps: vec![AttribMapInfo {
                name: None,
                components: 3,
            }],
        };
        let mut slice = bytes.as_slice();
        let decoded = Mg1Codec
            .decode(&header, &mut StreamReader::new(&mut slice))
            .unwrap();
        assert!(slice.is_empty());
        let normal_bits: Vec<[u32; 3]> = decoded
            .mesh
            .normals()
            .unwrap()
            .iter()
            .map(|n| n.map(f32::to_bits))
            .collect();
        let expected: Vec<[u32; 3]> = normals.iter().map(|n| n.map(f32::to_bits)).collect();
        assert_eq!(normal_bits, expected);
        assert_eq!(decoded.mesh.attrib_maps()[0].values(), values.as_slice());
        assert_eq!(decoded.mesh.triangles(), &[[0, 1, 2]]);
    }
}
