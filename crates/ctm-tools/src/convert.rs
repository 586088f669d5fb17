//! Re-encoding of meshes with new compression settings.

use std::path::Path;

use ctm_core::{
    CompressionMethod, Context, CtmError, Mesh, Mode, StatusResult, VertexPrecision,
};

use crate::error::ToolResult;
use crate::external::{file_extension, CommandRunner, ConverterRegistry};

/// Settings for one conversion. `None` keeps the library default, except
/// for the comment and the map precisions, which default to what the input
/// carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertOptions {
    pub method: Option<CompressionMethod>,
    pub level: Option<u32>,
    pub vertex_precision: Option<VertexPrecision>,
    pub normal_precision: Option<f32>,
    pub uv_precision: Option<f32>,
    pub attrib_precision: Option<f32>,
    pub comment: Option<String>,
    pub strip_normals: bool,
    pub strip_uv_maps: bool,
    pub strip_attrib_maps: bool,
}

/// Builds an export context holding `mesh`, filtered and configured by
/// `options`.
pub fn export_context(
    mesh: &Mesh,
    comment: Option<&str>,
    options: &ConvertOptions,
) -> StatusResult<Context> {
    let mut ctx = Context::new(Mode::Export);
    let normals = if options.strip_normals {
        None
    } else {
        mesh.normals().map(<[_]>::to_vec)
    };
    ctx.define_mesh(mesh.vertices().to_vec(), mesh.triangles().to_vec(), normals)?;

    if !options.strip_uv_maps {
        for map in mesh.uv_maps() {
            let id = ctx.add_uv_map(map.coords().to_vec(), map.name(), map.file_name())?;
            ctx.set_uv_map_precision(id, options.uv_precision.unwrap_or(map.precision()))?;
        }
    }
    if !options.strip_attrib_maps {
        for map in mesh.attrib_maps() {
            let id = ctx.add_attrib_map(map.values().to_vec(), map.components(), map.name())?;
            ctx.set_attrib_map_precision(id, options.attrib_precision.unwrap_or(map.precision()))?;
        }
    }

    if let Some(method) = options.method {
        ctx.set_compression_method(method)?;
    }
    if let Some(level) = options.level {
        ctx.set_compression_level(level)?;
    }
    match options.vertex_precision {
        Some(VertexPrecision::Absolute(step)) => ctx.set_vertex_precision(step)?,
        Some(VertexPrecision::Relative(fraction)) => ctx.set_vertex_precision_rel(fraction)?,
        None => {}
    }
    if let Some(step) = options.normal_precision {
        ctx.set_normal_precision(step)?;
    }
    ctx.set_file_comment(options.comment.as_deref().or(comment))?;
    Ok(ctx)
}

/// Loads a CTM file into an import context.
pub fn load_ctm(path: &Path) -> StatusResult<Context> {
    let mut ctx = Context::new(Mode::Import);
    ctx.load_from_path(path)?;
    Ok(ctx)
}

/// Converts files into CTM, running an external converter first for
/// anything that is not already CTM.
pub struct Converter<'a> {
    registry: &'a ConverterRegistry,
    runner: &'a dyn CommandRunner,
}

impl<'a> Converter<'a> {
    pub fn new(registry: &'a ConverterRegistry, runner: &'a dyn CommandRunner) -> Self {
        Self { registry, runner }
    }

    /// Loads `input`, converting it first when needed.
    pub fn load(&self, input: &Path) -> ToolResult<Context> {
        if file_extension(input) == "ctm" {
            return Ok(load_ctm(input)?);
        }
        let dir = tempfile::tempdir()?;
        let converted = dir.path().join("converted.ctm");
        log::info!("converting {} with an external tool", input.display());
        self.registry.run(self.runner, input, &converted)?;
        Ok(load_ctm(&converted)?)
    }

    /// Returns the number of bytes written to `output`.
    pub fn convert(&self, input: &Path, output: &Path, options: &ConvertOptions) -> ToolResult<u64> {
        let source = self.load(input)?;
        let mesh = source
            .mesh()
            .ok_or_else(|| CtmError::InternalError("load finished without a mesh".into()))?;
        let mut target = export_context(mesh, source.file_comment(), options)?;
        let written = target.save_to_path(output)?;
        log::info!(
            "wrote {} ({} method, {} vertices, {} triangles, {} bytes)",
            output.display(),
            target.compression_method(),
            mesh.num_vertices(),
            mesh.num_triangles(),
            written
        );
        Ok(written)
    }
}
