use ctm_core::{
    error_string, AttribMapId, CompressionMethod, Context, ContextState, ErrorCode, MapProperty,
    Mode, Property, UvMapId,
};

fn triangle() -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
    (
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![[0, 1, 2]],
    )
}

fn saved(method: CompressionMethod) -> Vec<u8> {
    let (vertices, triangles) = triangle();
    let mut ctx = Context::new(Mode::Export);
    ctx.define_mesh(vertices, triangles, None).unwrap();
    ctx.set_compression_method(method).unwrap();
    ctx.save_to_buffer().unwrap().into_vec()
}

fn load_error(bytes: &[u8]) -> ErrorCode {
    let mut ctx = Context::new(Mode::Import);
    assert!(ctx.load_from_slice(bytes).is_err());
    assert_eq!(ctx.state(), ContextState::Configuring);
    assert!(ctx.mesh().is_none());
    ctx.get_error()
}

#[test]
fn test_bad_magic() {
    let mut bytes = saved(CompressionMethod::Raw);
    bytes[..4].copy_from_slice(b"NOPE");
    assert_eq!(load_error(&bytes), ErrorCode::BadFormat);
}

#[test]
fn test_future_version() {
    let mut bytes = saved(CompressionMethod::Mg1);
    bytes[4..8].copy_from_slice(&99u32.to_le_bytes());
    assert_eq!(load_error(&bytes), ErrorCode::UnsupportedFormatVersion);
}

#[test]
fn test_unknown_method() {
    let mut bytes = saved(CompressionMethod::Raw);
    bytes[8..12].copy_from_slice(b"MG9\0");
    assert_eq!(load_error(&bytes), ErrorCode::BadFormat);
}

#[test]
fn test_truncated_streams() {
    for method in CompressionMethod::ALL {
        let bytes = saved(method);
        for len in [0, 3, 20, bytes.len() / 2, bytes.len() - 1] {
            assert_eq!(
                load_error(&bytes[..len]),
                ErrorCode::BadFormat,
                "{} truncated to {} bytes",
                method,
                len
            );
        }
    }
}

#[test]
fn test_ninth_uv_map_is_rejected() {
    let (vertices, triangles) = triangle();
    let mut ctx = Context::new(Mode::Export);
    ctx.define_mesh(vertices, triangles, None).unwrap();
    for i in 0..8 {
        let id = ctx.add_uv_map(vec![[0.0; 2]; 3], Some(&format!("uv{}", i)), None).unwrap();
        assert_eq!(id, UvMapId(i));
    }
    assert!(ctx.add_uv_map(vec![[0.0; 2]; 3], Some("uv8"), None).is_err());
    assert_eq!(ctx.get_error(), ErrorCode::OutOfMemory);
    assert_eq!(ctx.get_integer(Property::UvMapCount).unwrap(), 8);
}

#[test]
fn test_ninth_attrib_map_is_rejected() {
    let (vertices, triangles) = triangle();
    let mut ctx = Context::new(Mode::Export);
    ctx.define_mesh(vertices, triangles, None).unwrap();
    for i in 0..8 {
        let id = ctx
            .add_attrib_map(vec![i as f32; 6], 2, Some(&format!("attr{}", i)))
            .unwrap();
        assert_eq!(id, AttribMapId(i));
    }
    assert!(ctx.add_attrib_map(vec![0.0; 6], 2, Some("attr8")).is_err());
    assert_eq!(ctx.get_error(), ErrorCode::OutOfMemory);
    assert_eq!(ctx.get_integer(Property::AttribMapCount).unwrap(), 8);
}

#[test]
fn test_short_write_callback_is_called_once() {
    let (vertices, triangles) = triangle();
    let mut ctx = Context::new(Mode::Export);
    ctx.define_mesh(vertices, triangles, None).unwrap();
    let mut calls = 0;
    let result = ctx.save_with(|bytes: &[u8]| {
        calls += 1;
        bytes.len() / 2
    });
    assert!(result.is_err());
    assert_eq!(ctx.get_error(), ErrorCode::FileError);
    assert_eq!(calls, 1);
}

#[test]
fn test_file_with_too_many_maps_for_capacity() {
    let (vertices, triangles) = triangle();
    let mut export = Context::new(Mode::Export);
    export.define_mesh(vertices, triangles, None).unwrap();
    export.add_uv_map(vec![[0.0; 2]; 3], None, None).unwrap();
    export.add_uv_map(vec![[1.0; 2]; 3], None, None).unwrap();
    let bytes = export.save_to_buffer().unwrap();

    let mut import = Context::with_capacity(
        Mode::Import,
        ctm_core::MapCapacity {
            uv_maps: 1,
            attrib_maps: 8,
        },
    );
    assert!(import.load_from_slice(&bytes).is_err());
    assert_eq!(import.get_error(), ErrorCode::OutOfMemory);
}

#[test]
fn test_save_without_vertices() {
    let mut ctx = Context::new(Mode::Export);
    assert!(ctx.define_mesh(Vec::new(), Vec::new(), None).is_err());
    assert_eq!(ctx.get_error(), ErrorCode::InvalidMesh);
    assert!(ctx.save_to_buffer().is_err());
    assert_eq!(ctx.get_error(), ErrorCode::InvalidMesh);
}

#[test]
fn test_invalid_raw_mode() {
    let err = Context::from_raw_mode(0x0200).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}

#[test]
fn test_get_error_reads_and_clears() {
    let mut ctx = Context::new(Mode::Export);
    assert_eq!(ctx.get_error(), ErrorCode::None);
    assert!(ctx.load_from_slice(&[]).is_err());
    assert_eq!(ctx.get_error(), ErrorCode::InvalidOperation);
    assert_eq!(ctx.get_error(), ErrorCode::None);

    // A later success does not erase an unread error.
    assert!(ctx.set_compression_level(10).is_err());
    ctx.set_compression_level(9).unwrap();
    assert_eq!(ctx.get_error(), ErrorCode::InvalidArgument);
}

#[test]
fn test_mode_restrictions() {
    let bytes = saved(CompressionMethod::Mg1);
    let mut import = Context::new(Mode::Import);
    import.load_from_slice(&bytes).unwrap();
    assert!(import.set_compression_method(CompressionMethod::Raw).is_err());
    assert!(import.set_vertex_precision(0.1).is_err());
    assert!(import.set_file_comment(Some("x")).is_err());
    assert!(import.add_uv_map(vec![[0.0; 2]; 3], None, None).is_err());
    assert!(import.save_to_buffer().is_err());
    assert_eq!(import.get_error(), ErrorCode::InvalidOperation);
    assert_eq!(import.get_integer(Property::VertexCount).unwrap(), 3);
}

#[test]
fn test_precision_arguments() {
    let (vertices, triangles) = triangle();
    let mut ctx = Context::new(Mode::Export);
    ctx.define_mesh(vertices, triangles, None).unwrap();
    for bad in [0.0, -1.0, f32::NAN] {
        assert!(ctx.set_vertex_precision(bad).is_err());
        assert!(ctx.set_normal_precision(bad).is_err());
        assert!(ctx.set_vertex_precision_rel(bad).is_err());
    }
    assert!(ctx.set_uv_map_precision(UvMapId(0), 0.1).is_err());
    assert_eq!(ctx.get_error(), ErrorCode::InvalidArgument);
}

#[test]
fn test_wrong_query_types() {
    let bytes = saved(CompressionMethod::Raw);
    let mut ctx = Context::new(Mode::Import);
    ctx.load_from_slice(&bytes).unwrap();

    assert!(ctx.get_float(Property::TriangleCount).is_err());
    assert!(ctx.get_integer(Property::FileComment).is_err());
    assert!(ctx.get_string(Property::VertexCount).is_err());
    assert!(ctx.get_integer(Property::UvMap(UvMapId(0), MapProperty::Components)).is_err());
    assert_eq!(ctx.get_error(), ErrorCode::InvalidArgument);

    // RAW files carry no quantization step.
    assert!(ctx.get_float(Property::VertexPrecision).is_err());
    assert_eq!(ctx.get_string(Property::FileComment).unwrap(), None);
}

#[test]
fn test_error_strings() {
    assert_eq!(error_string(ErrorCode::BadFormat), "CTM_BAD_FORMAT");
    assert_eq!(error_string(ErrorCode::None), "CTM_NONE");
}
