//! The stateful entry point: one [`Context`] drives one export or import
//! session.
//!
//! Every fallible method returns a [`StatusResult`] and also records the
//! failure code, so callers may either use `?` or check
//! [`Context::get_error`] after the call. Reading the error clears it.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::compression_config::CompressionMethod;
use crate::encoder_options::{check_step, EncoderOptions, MapCapacity, VertexPrecision};
use crate::error::ErrorCode;
use crate::geometry_indices::{AttribMapId, UvMapId};
use crate::mesh::Mesh;
use crate::mesh_decoder::MeshDecoder;
use crate::mesh_encoder::MeshEncoder;
use crate::property::{MapProperty, Property, PropertyKind, PropertyValue};
use crate::status::{invalid_argument, CtmError, Status, StatusResult};
use crate::stream::{CallbackReader, CallbackWriter, MeshBuffer};
use crate::vertex_map::{AttributeMap, UvMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Import,
    Export,
}

impl Mode {
    pub const fn to_raw(self) -> u32 {
        match self {
            Mode::Import => 0x0101,
            Mode::Export => 0x0102,
        }
    }
}

impl TryFrom<u32> for Mode {
    type Error = CtmError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0x0101 => Ok(Mode::Import),
            0x0102 => Ok(Mode::Export),
            _ => Err(invalid_argument(format!("unknown context mode {:#06x}", raw))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Import => "import",
            Mode::Export => "export",
        })
    }
}

/// Export: Configuring -> MeshDefined -> Saved (adding maps goes back to
/// MeshDefined). Import: Configuring -> Loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextState {
    Configuring,
    MeshDefined,
    Loaded,
    Saved,
}

/// Precisions recorded in a loaded file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct FilePrecision {
    vertex: Option<f32>,
    normal: Option<f32>,
}

#[derive(Debug)]
pub struct Context {
    mode: Mode,
    state: ContextState,
    capacity: MapCapacity,
    options: EncoderOptions,
    mesh: Option<Mesh>,
    file_precision: FilePrecision,
    last_error: ErrorCode,
}

impl Context {
    pub fn new(mode: Mode) -> Self {
        Self::with_capacity(mode, MapCapacity::default())
    }

    pub fn with_capacity(mode: Mode, capacity: MapCapacity) -> Self {
        Self {
            mode,
            state: ContextState::Configuring,
            capacity,
            options: EncoderOptions::default(),
            mesh: None,
            file_precision: FilePrecision::default(),
            last_error: ErrorCode::None,
        }
    }

    /// Fails with INVALID_ARGUMENT unless `raw` is the IMPORT or EXPORT value.
    pub fn from_raw_mode(raw: u32) -> StatusResult<Self> {
        Mode::try_from(raw).map(Self::new)
    }

    /// Consumes the context, releasing the mesh and everything it owns.
    pub fn free(self) {}

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn capacity(&self) -> MapCapacity {
        self.capacity
    }

    /// Returns the last recorded error and resets it to NONE.
    pub fn get_error(&mut self) -> ErrorCode {
        std::mem::replace(&mut self.last_error, ErrorCode::None)
    }

    /// Returns the last recorded error without clearing it.
    pub fn last_error(&self) -> ErrorCode {
        self.last_error
    }

    fn record<T>(&mut self, result: StatusResult<T>) -> StatusResult<T> {
        if let Err(err) = &result {
            log::warn!("{} context: {}", self.mode, err);
            self.last_error = err.code();
        }
        result
    }

    fn require_mode(&self, mode: Mode, what: &str) -> Status {
        if self.mode != mode {
            return Err(CtmError::InvalidOperation(format!(
                "{} is not available on an {} context",
                what, self.mode
            )));
        }
        Ok(())
    }

    // Mesh definition.

    /// Defines the mesh to save. Only one mesh may be defined at a time;
    /// call [`Context::clear_mesh`] to start over.
    pub fn define_mesh(
        &mut self,
        vertices: Vec<[f32; 3]>,
        triangles: Vec<[u32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
    ) -> Status {
        let result = self.define_mesh_impl(vertices, triangles, normals);
        self.record(result)
    }

    fn define_mesh_impl(
        &mut self,
        vertices: Vec<[f32; 3]>,
        triangles: Vec<[u32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
    ) -> Status {
        self.require_mode(Mode::Export, "defining a mesh")?;
        if self.mesh.is_some() {
            return Err(CtmError::InvalidOperation("a mesh is already defined".into()));
        }
        if let Some(n) = &normals {
            if n.len() != vertices.len() {
                return Err(invalid_argument(format!(
                    "{} normals for {} vertices",
                    n.len(),
                    vertices.len()
                )));
            }
        }
        let mesh = Mesh::new(vertices, triangles, normals);
        mesh.check_integrity()?;
        self.mesh = Some(mesh);
        self.state = ContextState::MeshDefined;
        Ok(())
    }

    /// Discards the current mesh, if any.
    pub fn clear_mesh(&mut self) {
        self.mesh = None;
        self.file_precision = FilePrecision::default();
        self.state = ContextState::Configuring;
    }

    fn export_mesh_mut(&mut self, what: &str) -> StatusResult<&mut Mesh> {
        self.require_mode(Mode::Export, what)?;
        self.mesh
            .as_mut()
            .ok_or_else(|| CtmError::InvalidOperation(format!("{} needs a defined mesh", what)))
    }

    pub fn add_uv_map(
        &mut self,
        coords: Vec<[f32; 2]>,
        name: Option<&str>,
        file_name: Option<&str>,
    ) -> StatusResult<UvMapId> {
        let result = self.add_uv_map_impl(coords, name, file_name);
        self.record(result)
    }

    fn add_uv_map_impl(
        &mut self,
        coords: Vec<[f32; 2]>,
        name: Option<&str>,
        file_name: Option<&str>,
    ) -> StatusResult<UvMapId> {
        let capacity = self.capacity.uv_maps;
        let mesh = self.export_mesh_mut("adding a UV map")?;
        if coords.len() != mesh.num_vertices() {
            return Err(invalid_argument(format!(
                "{} UV coordinates for {} vertices",
                coords.len(),
                mesh.num_vertices()
            )));
        }
        if mesh.uv_maps().len() >= capacity {
            return Err(CtmError::OutOfMemory(format!("all {} UV map slots are used", capacity)));
        }
        let id = mesh.add_uv_map(UvMap::new(
            coords,
            name.map(str::to_owned),
            file_name.map(str::to_owned),
        ));
        self.state = ContextState::MeshDefined;
        Ok(id)
    }

    /// `values` holds `components` floats per vertex.
    pub fn add_attrib_map(
        &mut self,
        values: Vec<f32>,
        components: usize,
        name: Option<&str>,
    ) -> StatusResult<AttribMapId> {
        let result = self.add_attrib_map_impl(values, components, name);
        self.record(result)
    }

    fn add_attrib_map_impl(
        &mut self,
        values: Vec<f32>,
        components: usize,
        name: Option<&str>,
    ) -> StatusResult<AttribMapId> {
        let capacity = self.capacity.attrib_maps;
        let mesh = self.export_mesh_mut("adding an attribute map")?;
        let map = AttributeMap::new(values, components, name.map(str::to_owned))?;
        if map.len() != mesh.num_vertices() {
            return Err(invalid_argument(format!(
                "{} attribute rows for {} vertices",
                map.len(),
                mesh.num_vertices()
            )));
        }
        if mesh.attrib_maps().len() >= capacity {
            return Err(CtmError::OutOfMemory(format!(
                "all {} attribute map slots are used",
                capacity
            )));
        }
        let id = mesh.add_attrib_map(map);
        self.state = ContextState::MeshDefined;
        Ok(id)
    }

    pub fn named_uv_map(&self, name: &str) -> Option<UvMapId> {
        self.mesh.as_ref()?.find_uv_map(name)
    }

    pub fn named_attrib_map(&self, name: &str) -> Option<AttribMapId> {
        self.mesh.as_ref()?.find_attrib_map(name)
    }

    // Configuration.

    pub fn set_compression_method(&mut self, method: CompressionMethod) -> Status {
        let result = self
            .require_mode(Mode::Export, "setting the compression method")
            .map(|_| self.options.set_method(method));
        self.record(result)
    }

    pub fn set_compression_level(&mut self, level: u32) -> Status {
        let result = self
            .require_mode(Mode::Export, "setting the compression level")
            .and_then(|_| self.options.set_level(level));
        self.record(result)
    }

    pub fn set_vertex_precision(&mut self, step: f32) -> Status {
        let result = self
            .require_mode(Mode::Export, "setting the vertex precision")
            .and_then(|_| self.options.set_vertex_precision(step));
        self.record(result)
    }

    /// Step as a fraction of the bounding box diagonal, resolved on save.
    pub fn set_vertex_precision_rel(&mut self, fraction: f32) -> Status {
        let result = self
            .require_mode(Mode::Export, "setting the vertex precision")
            .and_then(|_| self.options.set_vertex_precision_rel(fraction));
        self.record(result)
    }

    pub fn set_normal_precision(&mut self, step: f32) -> Status {
        let result = self
            .require_mode(Mode::Export, "setting the normal precision")
            .and_then(|_| self.options.set_normal_precision(step));
        self.record(result)
    }

    pub fn set_uv_map_precision(&mut self, id: UvMapId, step: f32) -> Status {
        let result = self.set_uv_map_precision_impl(id, step);
        self.record(result)
    }

    fn set_uv_map_precision_impl(&mut self, id: UvMapId, step: f32) -> Status {
        let map = self
            .export_mesh_mut("setting a UV map precision")?
            .uv_map_mut(id)
            .ok_or_else(|| invalid_argument(format!("no UV map {}", id.index())))?;
        check_step("map", step)?;
        map.set_precision(step);
        Ok(())
    }

    pub fn set_attrib_map_precision(&mut self, id: AttribMapId, step: f32) -> Status {
        let result = self.set_attrib_map_precision_impl(id, step);
        self.record(result)
    }

    fn set_attrib_map_precision_impl(&mut self, id: AttribMapId, step: f32) -> Status {
        let map = self
            .export_mesh_mut("setting an attribute map precision")?
            .attrib_map_mut(id)
            .ok_or_else(|| invalid_argument(format!("no attribute map {}", id.index())))?;
        check_step("map", step)?;
        map.set_precision(step);
        Ok(())
    }

    pub fn set_file_comment(&mut self, comment: Option<&str>) -> Status {
        let result = self
            .require_mode(Mode::Export, "setting the file comment")
            .map(|_| self.options.set_comment(comment.map(str::to_owned)));
        self.record(result)
    }

    // Saving.

    pub fn save_to_writer<W: Write>(&mut self, mut sink: W) -> StatusResult<u64> {
        let result = self.save(&mut sink);
        self.record(result)
    }

    pub fn save_to_path<P: AsRef<Path>>(&mut self, path: P) -> StatusResult<u64> {
        let result = self.save_to_path_impl(path.as_ref());
        self.record(result)
    }

    fn save_to_path_impl(&mut self, path: &Path) -> StatusResult<u64> {
        self.check_can_save()?;
        let file = File::create(path)
            .map_err(|e| CtmError::FileError(format!("{}: {}", path.display(), e)))?;
        self.save(&mut BufWriter::new(file))
    }

    /// Serializes into an owned buffer.
    pub fn save_to_buffer(&mut self) -> StatusResult<MeshBuffer> {
        let mut data = Vec::new();
        let result = self.save(&mut data).map(|_| MeshBuffer::new(data));
        self.record(result)
    }

    /// Streams the output through `write`, which must accept every byte it
    /// is given and return the count; anything less is a FILE_ERROR.
    pub fn save_with<F: FnMut(&[u8]) -> usize>(&mut self, write: F) -> StatusResult<u64> {
        let mut sink = BufWriter::new(CallbackWriter::new(write));
        let result = self.save(&mut sink);
        self.record(result)
    }

    fn check_can_save(&self) -> Status {
        self.require_mode(Mode::Export, "saving")?;
        if self.mesh.is_none() {
            return Err(CtmError::InvalidMesh("no mesh has been defined".into()));
        }
        Ok(())
    }

    fn save(&mut self, sink: &mut dyn Write) -> StatusResult<u64> {
        self.check_can_save()?;
        let Some(mesh) = self.mesh.as_ref() else {
            return Err(CtmError::InvalidMesh("no mesh has been defined".into()));
        };
        let written = MeshEncoder::new(mesh, &self.options).encode(sink)?;
        self.state = ContextState::Saved;
        Ok(written)
    }

    // Loading.

    pub fn load_from_reader<R: Read>(&mut self, mut source: R) -> Status {
        let result = self.load(&mut source);
        self.record(result)
    }

    pub fn load_from_slice(&mut self, data: &[u8]) -> Status {
        let mut source = data;
        let result = self.load(&mut source);
        self.record(result)
    }

    pub fn load_from_path<P: AsRef<Path>>(&mut self, path: P) -> Status {
        let result = self.load_from_path_impl(path.as_ref());
        self.record(result)
    }

    fn load_from_path_impl(&mut self, path: &Path) -> Status {
        self.require_mode(Mode::Import, "loading")?;
        let file = File::open(path)
            .map_err(|e| CtmError::FileError(format!("{}: {}", path.display(), e)))?;
        self.load(&mut BufReader::new(file))
    }

    /// Pulls the input through `read`, which fills the slice it is given
    /// and returns how many bytes it produced (0 at the end of the data).
    pub fn load_with<F: FnMut(&mut [u8]) -> usize>(&mut self, read: F) -> Status {
        let mut source = BufReader::new(CallbackReader::new(read));
        let result = self.load(&mut source);
        self.record(result)
    }

    fn load(&mut self, source: &mut dyn Read) -> Status {
        self.require_mode(Mode::Import, "loading")?;
        self.clear_mesh();
        let loaded = MeshDecoder::new(self.capacity).decode(source)?;
        self.options.set_method(loaded.header.method);
        self.options.set_comment(loaded.header.comment);
        self.file_precision = FilePrecision {
            vertex: loaded.decoded.vertex_precision,
            normal: loaded.decoded.normal_precision,
        };
        self.mesh = Some(loaded.decoded.mesh);
        self.state = ContextState::Loaded;
        Ok(())
    }

    // Typed access.

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn vertices(&self) -> Option<&[[f32; 3]]> {
        self.mesh.as_ref().map(Mesh::vertices)
    }

    pub fn triangles(&self) -> Option<&[[u32; 3]]> {
        self.mesh.as_ref().map(Mesh::triangles)
    }

    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.mesh.as_ref()?.normals()
    }

    pub fn uv_map(&self, id: UvMapId) -> Option<&UvMap> {
        self.mesh.as_ref()?.uv_map(id)
    }

    pub fn attrib_map(&self, id: AttribMapId) -> Option<&AttributeMap> {
        self.mesh.as_ref()?.attrib_map(id)
    }

    pub fn compression_method(&self) -> CompressionMethod {
        self.options.method()
    }

    pub fn file_comment(&self) -> Option<&str> {
        self.options.comment()
    }

    // Queries.

    pub fn query(&mut self, property: Property) -> StatusResult<PropertyValue> {
        let result = self.query_impl(property);
        self.record(result)
    }

    pub fn get_integer(&mut self, property: Property) -> StatusResult<u32> {
        let result = self.query_kind(property, PropertyKind::Integer).and_then(|v| match v {
            PropertyValue::Integer(i) => Ok(i),
            other => Err(type_mismatch(property, &other)),
        });
        self.record(result)
    }

    pub fn get_float(&mut self, property: Property) -> StatusResult<f32> {
        let result = self.query_kind(property, PropertyKind::Float).and_then(|v| match v {
            PropertyValue::Float(f) => Ok(f),
            other => Err(type_mismatch(property, &other)),
        });
        self.record(result)
    }

    pub fn get_string(&mut self, property: Property) -> StatusResult<Option<String>> {
        let result = self.query_kind(property, PropertyKind::Text).and_then(|v| match v {
            PropertyValue::Text(s) => Ok(s),
            other => Err(type_mismatch(property, &other)),
        });
        self.record(result)
    }

    fn query_kind(&self, property: Property, kind: PropertyKind) -> StatusResult<PropertyValue> {
        if property.kind() != kind {
            return Err(invalid_argument(format!(
                "{:?} is not a {:?} property",
                property, kind
            )));
        }
        self.query_impl(property)
    }

    fn mesh_for_query(&self, property: Property) -> StatusResult<&Mesh> {
        self.mesh
            .as_ref()
            .ok_or_else(|| invalid_argument(format!("{:?} needs a mesh", property)))
    }

    /// Fails for import contexts that have not loaded anything yet.
    fn require_configured(&self, property: Property) -> Status {
        if self.mode == Mode::Import && self.state != ContextState::Loaded {
            return Err(invalid_argument(format!("{:?} is unknown before a load", property)));
        }
        Ok(())
    }

    fn query_impl(&self, property: Property) -> StatusResult<PropertyValue> {
        use PropertyValue::{Float, Integer, Text};

        let count = |n: usize| Integer(n as u32);
        Ok(match property {
            Property::VertexCount => count(self.mesh_for_query(property)?.num_vertices()),
            Property::TriangleCount => count(self.mesh_for_query(property)?.num_triangles()),
            Property::HasNormals => Integer(self.mesh_for_query(property)?.has_normals() as u32),
            Property::UvMapCount => count(self.mesh_for_query(property)?.uv_maps().len()),
            Property::AttribMapCount => count(self.mesh_for_query(property)?.attrib_maps().len()),
            Property::CompressionMethod => {
                self.require_configured(property)?;
                Integer(self.options.method().to_raw())
            }
            Property::CompressionLevel => {
                self.require_mode(Mode::Export, "querying the compression level")
                    .map_err(|e| invalid_argument(e.to_string()))?;
                Integer(self.options.level())
            }
            Property::FileComment => {
                self.require_configured(property)?;
                Text(self.options.comment().map(str::to_owned))
            }
            Property::VertexPrecision => Float(self.vertex_precision(property)?),
            Property::NormalPrecision => Float(match self.mode {
                Mode::Export => self.options.normal_precision(),
                Mode::Import => self.file_precision.normal.ok_or_else(|| {
                    invalid_argument("the loaded stream records no normal precision")
                })?,
            }),
            Property::UvMap(id, p) => {
                let map = self
                    .mesh_for_query(property)?
                    .uv_map(id)
                    .ok_or_else(|| invalid_argument(format!("no UV map {}", id.index())))?;
                match p {
                    MapProperty::Name => Text(map.name().map(str::to_owned)),
                    MapProperty::FileName => Text(map.file_name().map(str::to_owned)),
                    MapProperty::Precision => Float(map.precision()),
                    MapProperty::Components => {
                        return Err(invalid_argument("UV maps have no component count"))
                    }
                }
            }
            Property::AttribMap(id, p) => {
                let map = self
                    .mesh_for_query(property)?
                    .attrib_map(id)
                    .ok_or_else(|| invalid_argument(format!("no attribute map {}", id.index())))?;
                match p {
                    MapProperty::Name => Text(map.name().map(str::to_owned)),
                    MapProperty::Precision => Float(map.precision()),
                    MapProperty::Components => count(map.components()),
                    MapProperty::FileName => {
                        return Err(invalid_argument("attribute maps have no file name"))
                    }
                }
            }
        })
    }

    fn vertex_precision(&self, property: Property) -> StatusResult<f32> {
        match self.mode {
            Mode::Import => self
                .file_precision
                .vertex
                .ok_or_else(|| invalid_argument("the loaded stream records no vertex precision")),
            Mode::Export => match self.options.vertex_precision() {
                VertexPrecision::Absolute(step) => Ok(step),
                relative => relative
                    .resolve(self.mesh_for_query(property)?)
                    .map_err(|e| invalid_argument(e.to_string())),
            },
        }
    }
}

fn type_mismatch(property: Property, value: &PropertyValue) -> CtmError {
    invalid_argument(format!("{:?} holds a {:?} value", property, value.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_context() -> Context {
        let mut ctx = Context::new(Mode::Export);
        ctx.define_mesh(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
            None,
        )
        .unwrap();
        ctx
    }

    #[test]
    fn test_mode_from_raw() {
        assert_eq!(Context::from_raw_mode(0x0101).unwrap().mode(), Mode::Import);
        assert_eq!(Context::from_raw_mode(0x0102).unwrap().mode(), Mode::Export);
        assert_eq!(
            Context::from_raw_mode(0x0103).unwrap_err().code(),
            ErrorCode::InvalidArgument
        );
    }

    #[test]
    fn test_get_error_clears() {
        let mut ctx = Context::new(Mode::Import);
        assert!(ctx.set_compression_level(3).is_err());
        assert_eq!(ctx.last_error(), ErrorCode::InvalidOperation);
        assert_eq!(ctx.get_error(), ErrorCode::InvalidOperation);
        assert_eq!(ctx.get_error(), ErrorCode::None);
    }

    #[test]
    fn test_state_transitions() {
        let mut ctx = triangle_context();
        assert_eq!(ctx.state(), ContextState::MeshDefined);
        let err = ctx
            .define_mesh(vec![[0.0; 3]; 3], vec![[0, 1, 2]], None)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidOperation);

        ctx.save_to_buffer().unwrap();
        assert_eq!(ctx.state(), ContextState::Saved);
        ctx.add_uv_map(vec![[0.0, 0.0]; 3], None, None).unwrap();
        assert_eq!(ctx.state(), ContextState::MeshDefined);

        ctx.clear_mesh();
        assert_eq!(ctx.state(), ContextState::Configuring);
        assert!(ctx.mesh().is_none());
        ctx.define_mesh(vec![[0.0; 3]; 3], vec![[0, 1, 2]], None).unwrap();
    }

    #[test]
    fn test_define_mesh_validation() {
        let mut ctx = Context::new(Mode::Export);
        let err = ctx
            .define_mesh(vec![[0.0; 3]; 3], vec![[0, 1, 3]], None)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidMesh);
        let err = ctx
            .define_mesh(vec![[0.0; 3]; 3], vec![[0, 1, 2]], Some(vec![[0.0; 3]; 2]))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(ctx.state(), ContextState::Configuring);

        let mut import = Context::new(Mode::Import);
        let err = import
            .define_mesh(vec![[0.0; 3]; 3], vec![[0, 1, 2]], None)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidOperation);
    }

    #[test]
    fn test_map_capacity() {
        let mut ctx = Context::with_capacity(
            Mode::Export,
            MapCapacity {
                uv_maps: 1,
                attrib_maps: 2,
            },
        );
        ctx.define_mesh(vec![[0.0; 3]; 3], vec![[0, 1, 2]], None).unwrap();
        ctx.add_uv_map(vec![[0.0; 2]; 3], Some("a"), None).unwrap();
        let err = ctx.add_uv_map(vec![[0.0; 2]; 3], Some("b"), None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::OutOfMemory);

        let err = ctx.add_attrib_map(vec![0.0; 5], 1, None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        let id = ctx.add_attrib_map(vec![0.0; 12], 4, Some("w")).unwrap();
        assert_eq!(ctx.named_attrib_map("w"), Some(id));
        assert_eq!(ctx.named_uv_map("b"), None);
    }

    #[test]
    fn test_queries() {
        let mut ctx = triangle_context();
        let uv = ctx.add_uv_map(vec![[0.0; 2]; 3], Some("d"), Some("d.png")).unwrap();
        ctx.set_uv_map_precision(uv, 0.5).unwrap();
        assert_eq!(ctx.get_integer(Property::VertexCount).unwrap(), 3);
        assert_eq!(ctx.get_integer(Property::HasNormals).unwrap(), 0);
        assert_eq!(ctx.get_integer(Property::CompressionLevel).unwrap(), 5);
        assert_eq!(
            ctx.get_integer(Property::CompressionMethod).unwrap(),
            CompressionMethod::Mg1.to_raw()
        );
        assert_eq!(ctx.get_float(Property::VertexPrecision).unwrap(), 1.0 / 1024.0);
        assert_eq!(
            ctx.get_string(Property::UvMap(uv, MapProperty::FileName)).unwrap().as_deref(),
            Some("d.png")
        );
        assert_eq!(ctx.get_float(Property::UvMap(uv, MapProperty::Precision)).unwrap(), 0.5);

        let err = ctx.get_float(Property::VertexCount).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(ctx.get_error(), ErrorCode::InvalidArgument);
        assert!(ctx.get_string(Property::UvMap(UvMapId(3), MapProperty::Name)).is_err());
        assert!(ctx.query(Property::UvMap(uv, MapProperty::Components)).is_err());
    }

    #[test]
    fn test_import_queries_before_load() {
        let mut ctx = Context::new(Mode::Import);
        assert!(ctx.get_integer(Property::VertexCount).is_err());
        assert!(ctx.get_integer(Property::CompressionMethod).is_err());
        assert!(ctx.get_integer(Property::CompressionLevel).is_err());
        assert_eq!(ctx.get_error(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_save_without_mesh() {
        let mut ctx = Context::new(Mode::Export);
        assert_eq!(ctx.save_to_buffer().unwrap_err().code(), ErrorCode::InvalidMesh);
        let mut import = Context::new(Mode::Import);
        assert_eq!(import.save_to_buffer().unwrap_err().code(), ErrorCode::InvalidOperation);
    }
}
