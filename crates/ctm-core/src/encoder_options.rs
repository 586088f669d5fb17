use crate::compression_config::CompressionMethod;
use crate::mesh::Mesh;
use crate::status::{invalid_argument, Status, StatusResult};

pub const DEFAULT_COMPRESSION_LEVEL: u32 = 5;
pub const MAX_COMPRESSION_LEVEL: u32 = 9;
pub const DEFAULT_VERTEX_PRECISION: f32 = 1.0 / 1024.0;
pub const DEFAULT_NORMAL_PRECISION: f32 = 1.0 / 256.0;
pub const DEFAULT_MAP_CAPACITY: usize = 8;

/// Vertex quantization step, either fixed or a fraction of the bounding
/// box diagonal resolved when the mesh is saved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexPrecision {
    Absolute(f32),
    Relative(f32),
}

impl Default for VertexPrecision {
    fn default() -> Self {
        VertexPrecision::Absolute(DEFAULT_VERTEX_PRECISION)
    }
}

impl VertexPrecision {
    /// Absolute step to use for `mesh`.
    pub fn resolve(self, mesh: &Mesh) -> StatusResult<f32> {
        let step = match self {
            VertexPrecision::Absolute(step) => step,
            VertexPrecision::Relative(fraction) => {
                let (min, max) = mesh
                    .bounding_box()
                    .ok_or_else(|| invalid_argument("relative precision needs vertices"))?;
                let diagonal = (0..3)
                    .map(|i| {
                        let d = (max[i] - min[i]) as f64;
                        d * d
                    })
                    .sum::<f64>()
                    .sqrt();
                (fraction as f64 * diagonal) as f32
            }
        };
        check_step("vertex", step)?;
        Ok(step)
    }
}

/// How many UV and attribute maps a context accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapCapacity {
    pub uv_maps: usize,
    pub attrib_maps: usize,
}

impl Default for MapCapacity {
    fn default() -> Self {
        Self {
            uv_maps: DEFAULT_MAP_CAPACITY,
            attrib_maps: DEFAULT_MAP_CAPACITY,
        }
    }
}

/// Settings used when saving a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderOptions {
    method: CompressionMethod,
    level: u32,
    vertex_precision: VertexPrecision,
    normal_precision: f32,
    comment: Option<String>,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            method: CompressionMethod::default(),
            level: DEFAULT_COMPRESSION_LEVEL,
            vertex_precision: VertexPrecision::default(),
            normal_precision: DEFAULT_NORMAL_PRECISION,
            comment: None,
        }
    }
}

impl EncoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    pub fn set_method(&mut self, method: CompressionMethod) {
        self.method = method;
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn set_level(&mut self, level: u32) -> Status {
        if level > MAX_COMPRESSION_LEVEL {
            return Err(invalid_argument(format!(
                "compression level {} is outside 0..={}",
                level, MAX_COMPRESSION_LEVEL
            )));
        }
        self.level = level;
        Ok(())
    }

    pub fn vertex_precision(&self) -> VertexPrecision {
        self.vertex_precision
    }

    pub fn set_vertex_precision(&mut self, step: f32) -> Status {
        check_step("vertex", step)?;
        self.vertex_precision = VertexPrecision::Absolute(step);
        Ok(())
    }

    pub fn set_vertex_precision_rel(&mut self, fraction: f32) -> Status {
        check_step("relative vertex", fraction)?;
        self.vertex_precision = VertexPrecision::Relative(fraction);
        Ok(())
    }

    pub fn normal_precision(&self) -> f32 {
        self.normal_precision
    }

    pub fn set_normal_precision(&mut self, step: f32) -> Status {
        check_step("normal", step)?;
        self.normal_precision = step;
        Ok(())
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }
}

pub(crate) fn check_step(what: &str, step: f32) -> Status {
    if step > 0.0 && step.is_finite() {
        Ok(())
    } else {
        Err(invalid_argument(format!("{} precision {} must be > 0", what, step)))
    }
}
