//! OpenCTM Core Library
//!
//! Reading and writing of compressed triangle meshes in the OpenCTM format.
//! A [`Context`] in export mode takes a mesh plus optional UV and attribute
//! maps and serializes them with the RAW, MG1 or MG2 method; a context in
//! import mode loads any of the three back.
//!
//! ```
//! use ctm_core::{CompressionMethod, Context, Mode};
//!
//! let mut export = Context::new(Mode::Export);
//! export
//!     .define_mesh(
//!         vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!         vec![[0, 1, 2]],
//!         None,
//!     )
//!     .unwrap();
//! export.set_compression_method(CompressionMethod::Mg2).unwrap();
//! let buffer = export.save_to_buffer().unwrap();
//!
//! let mut import = Context::new(Mode::Import);
//! import.load_from_slice(&buffer).unwrap();
//! assert_eq!(import.triangles().unwrap(), &[[0, 1, 2]]);
//! ```

#![allow(clippy::needless_range_loop)]

// =============================================================================
// Mesh model and public surface
// =============================================================================

pub mod compression_config;
pub mod context;
pub mod encoder_options;
pub mod error;
pub mod geometry_indices;
pub mod mesh;
pub mod property;
pub mod status;
pub mod stream;
pub mod version;
pub mod vertex_map;

// =============================================================================
// Codecs
// =============================================================================

pub mod index_coding;
pub mod mesh_codec;
pub mod mesh_decoder;
pub mod mesh_encoder;
pub mod mg1_codec;
pub mod mg2_codec;
pub mod normal_prediction;
pub mod quantization_utils;
pub mod raw_codec;
pub mod space_grid;

// =============================================================================
// Entropy coding
// =============================================================================

pub mod ans;
pub mod decoder_buffer;
pub mod encoder_buffer;
pub mod packed_stream;
pub mod rans_symbol_coding;
pub mod rans_symbol_decoder;
pub mod rans_symbol_encoder;

// =============================================================================
// Re-exports
// =============================================================================

pub use compression_config::CompressionMethod;
pub use context::{Context, ContextState, Mode};
pub use encoder_options::{EncoderOptions, MapCapacity, VertexPrecision};
pub use error::{error_string, error_string_raw, ErrorCode};
pub use geometry_indices::{AttribMapId, UvMapId};
pub use mesh::Mesh;
pub use mesh_codec::{DecodedMesh, MeshCodec};
pub use mesh_decoder::{FileHeader, LoadedMesh, MeshDecoder};
pub use mesh_encoder::MeshEncoder;
pub use property::{MapProperty, Property, PropertyKind, PropertyValue};
pub use status::{CtmError, Status, StatusResult};
pub use stream::MeshBuffer;
pub use vertex_map::{AttributeMap, UvMap};
