//! Named per-vertex data streams: UV maps and generic attribute maps.

use crate::status::{invalid_argument, StatusResult};

/// Default quantization step for new UV maps.
pub const DEFAULT_UV_PRECISION: f32 = 1.0 / 4096.0;
/// Default quantization step for new attribute maps.
pub const DEFAULT_ATTRIB_PRECISION: f32 = 1.0 / 256.0;
/// Largest number of components an attribute map may carry.
pub const MAX_ATTRIB_COMPONENTS: usize = 4;

/// Two texture coordinates per vertex, with an optional name and an
/// optional reference to the texture file.
#[derive(Debug, Clone, PartialEq)]
pub struct UvMap {
    name: Option<String>,
    file_name: Option<String>,
    precision: f32,
    coords: Vec<[f32; 2]>,
}

impl UvMap {
    pub fn new(coords: Vec<[f32; 2]>, name: Option<String>, file_name: Option<String>) -> Self {
        Self {
            name,
            file_name,
            precision: DEFAULT_UV_PRECISION,
            coords,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn precision(&self) -> f32 {
        self.precision
    }

    pub fn set_precision(&mut self, precision: f32) {
        self.precision = precision;
    }

    pub fn coords(&self) -> &[[f32; 2]] {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// `components` floats per vertex, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMap {
    name: Option<String>,
    precision: f32,
    components: usize,
    values: Vec<f32>,
}

impl AttributeMap {
    /// Fails if `components` is outside `1..=4` or `values` is not a whole
    /// number of rows.
    pub fn new(values: Vec<f32>, components: usize, name: Option<String>) -> StatusResult<Self> {
        if components == 0 || components > MAX_ATTRIB_COMPONENTS {
            return Err(invalid_argument(format!(
                "attribute maps need 1 to {} components, got {}",
                MAX_ATTRIB_COMPONENTS, components
            )));
        }
        if values.len() % components != 0 {
            return Err(invalid_argument(format!(
                "{} values do not split into rows of {}",
                values.len(),
                components
            )));
        }
        Ok(Self {
            name,
            precision: DEFAULT_ATTRIB_PRECISION,
            components,
            values,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn precision(&self) -> f32 {
        self.precision
    }

    pub fn set_precision(&mut self, precision: f32) {
        self.precision = precision;
    }

    pub fn components(&self) -> usize {
        self.components
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Values of vertex `i`.
    pub fn value(&self, i: usize) -> &[f32] {
        &self.values[i * self.components..(i + 1) * self.components]
    }

    /// Number of vertices covered.
    pub fn len(&self) -> usize {
        self.values.len() / self.components
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
