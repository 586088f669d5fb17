use crate::compression_config::CompressionMethod;
use crate::mesh::Mesh;
use crate::mesh_decoder::{AttribMapInfo, FileHeader, UvMapInfo};
use crate::mg1_codec::Mg1Codec;
use crate::mg2_codec::Mg2Codec;
use crate::raw_codec::RawCodec;
use crate::status::{CtmError, Status, StatusResult};
use crate::stream::{StreamReader, StreamWriter};
use crate::vertex_map::{AttributeMap, UvMap};

/// Resolved settings handed to a codec.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeParams {
    pub compression_level: u32,
    /// Absolute step; only MG2 uses it.
    pub vertex_precision: f32,
    pub normal_precision: f32,
}

/// A decoded payload plus the quantization steps the file recorded, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMesh {
    pub mesh: Mesh,
    pub vertex_precision: Option<f32>,
    pub normal_precision: Option<f32>,
}

impl DecodedMesh {
    pub fn lossless(mesh: Mesh) -> Self {
        Self {
            mesh,
            vertex_precision: None,
            normal_precision: None,
        }
    }
}

/// The payload half of a file. The common header and the map info chunks
/// are handled by [`MeshEncoder`](crate::mesh_encoder::MeshEncoder) and
/// [`FileHeader`].
pub trait MeshCodec {
    fn method(&self) -> CompressionMethod;

    fn encode(&self, mesh: &Mesh, params: &EncodeParams, out: &mut StreamWriter) -> Status;

    fn decode(&self, header: &FileHeader, input: &mut StreamReader) -> StatusResult<DecodedMesh>;
}

pub fn codec_for(method: CompressionMethod) -> &'static dyn MeshCodec {
    match method {
        CompressionMethod::Raw => &RawCodec,
        CompressionMethod::Mg1 => &Mg1Codec,
        CompressionMethod::Mg2 => &Mg2Codec,
    }
}

pub(crate) fn uv_map_from_info(info: &UvMapInfo, coords: Vec<[f32; 2]>) -> UvMap {
    UvMap::new(coords, info.name.clone(), info.file_name.clone())
}

pub(crate) fn attrib_map_from_info(info: &AttribMapInfo, values: Vec<f32>) -> StatusResult<AttributeMap> {
    AttributeMap::new(values, info.components, info.name.clone())
        .map_err(|e| CtmError::BadFormat(e.to_string()))
}

/// Number of scalars in `count` tuples of `width`, failing on overflow.
pub(crate) fn scalar_count(count: usize, width: usize) -> StatusResult<usize> {
    count
        .checked_mul(width)
        .ok_or_else(|| CtmError::OutOfMemory(format!("{} x {} values", count, width)))
}

pub(crate) fn flatten<T: Copy, const N: usize>(tuples: &[[T; N]]) -> Vec<T> {
    tuples.iter().flatten().copied().collect()
}

pub(crate) fn group<T: Copy + Default, const N: usize>(values: &[T]) -> Vec<[T; N]> {
    values
        .chunks_exact(N)
        .map(|c| {
            let mut tuple = [T::default(); N];
            tuple.copy_from_slice(c);
            tuple
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_for_matches_method() {
        for method in CompressionMethod::ALL {
            assert_eq!(codec_for(method).method(), method);
        }
    }

    #[test]
    fn test_flatten_and_group() {
        let tuples = vec![[1u32, 2, 3], [4, 5, 6]];
        let flat = flatten(&tuples);
        assert_eq!(flat, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(group::<u32, 3>(&flat), tuples);
        assert_eq!(group::<f32, 2>(&[1.0, 2.0, 3.0]), vec![[1.0, 2.0]]);
    }
}
